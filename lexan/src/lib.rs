pub mod error;

pub use error::LexanError;

use regex::Regex;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    line: usize,
    column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone)]
pub struct Token<T> {
    tag: T,
    lexeme: String,
    location: Location,
}

impl<T> Token<T> {
    pub fn tag(&self) -> &T {
        &self.tag
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error<T> {
    AmbiguousMatches(Vec<T>, String, Location),
    UnexpectedText(String, Location),
}

impl<T: fmt::Display> fmt::Display for Error<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::AmbiguousMatches(tags, text, location) => {
                write!(f, "{}: ambiguous match for \"{}\" among: ", location, text)?;
                for (index, tag) in tags.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", tag)?;
                }
                Ok(())
            }
            Error::UnexpectedText(text, location) => {
                write!(f, "{}: unexpected text: \"{}\"", location, text)
            }
        }
    }
}

struct Inner<T> {
    literals: Vec<(T, String)>,
    regexes: Vec<(T, Regex)>,
    skip: Vec<Regex>,
    end_marker: T,
}

/// A lexical analyzer built from a fixed set of literal strings, a fixed set
/// of named regular expressions, and a set of "skip" patterns (e.g. whitespace
/// and comments) that are consumed but never emitted as tokens.
#[derive(Clone)]
pub struct LexicalAnalyzer<T> {
    inner: Rc<Inner<T>>,
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})", pattern))
}

impl<T: Copy + Eq> LexicalAnalyzer<T> {
    /// `literals` are matched by exact string comparison, longest first, so
    /// that e.g. `==` is not shadowed by `=`. `regexes` are tried in the
    /// order given after no literal matches. `skip` patterns are stripped
    /// from the front of the remaining input before each token is sought.
    pub fn new(literals: &[(T, &str)], regexes: &[(T, &str)], skip: &[&str], end_marker: T) -> Self {
        let mut literals: Vec<(T, String)> =
            literals.iter().map(|(t, s)| (*t, s.to_string())).collect();
        literals.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        let regexes: Vec<(T, Regex)> = regexes
            .iter()
            .map(|(t, s)| (*t, anchored(s).expect("invalid regex literal")))
            .collect();
        let skip: Vec<Regex> = skip
            .iter()
            .map(|s| anchored(s).expect("invalid skip regex literal"))
            .collect();
        Self {
            inner: Rc::new(Inner {
                literals,
                regexes,
                skip,
                end_marker,
            }),
        }
    }

    pub fn token_stream(&self, text: String, label: String) -> TokenStream<T> {
        TokenStream {
            lexer: self.clone(),
            label,
            text,
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

/// A cursor over one source text, producing [`Token`]s on demand.
pub struct TokenStream<T> {
    lexer: LexicalAnalyzer<T>,
    label: String,
    text: String,
    offset: usize,
    line: usize,
    column: usize,
}

impl<T: Copy + Eq> TokenStream<T> {
    fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
        }
    }

    fn advance_position(&mut self, consumed: &str) {
        for ch in consumed.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset += consumed.len();
    }

    fn skip_ignored(&mut self) {
        loop {
            let rest = &self.text[self.offset..];
            let mut matched = 0;
            for re in &self.lexer.inner.skip {
                if let Some(m) = re.find(rest) {
                    if m.end() > matched {
                        matched = m.end();
                    }
                }
            }
            if matched == 0 {
                return;
            }
            let consumed = self.text[self.offset..self.offset + matched].to_string();
            self.advance_position(&consumed);
        }
    }

    pub fn is_empty(&mut self) -> bool {
        self.skip_ignored();
        self.offset >= self.text.len()
    }

    /// Look at, but do not consume, the next token.
    pub fn front(&mut self) -> Result<Token<T>, Error<T>> {
        self.skip_ignored();
        let location = self.location();
        let rest = &self.text[self.offset..];
        if rest.is_empty() {
            return Ok(Token {
                tag: self.lexer.inner.end_marker,
                lexeme: String::new(),
                location,
            });
        }
        for (tag, literal) in &self.lexer.inner.literals {
            if rest.starts_with(literal.as_str()) {
                return Ok(Token {
                    tag: *tag,
                    lexeme: literal.clone(),
                    location,
                });
            }
        }
        let mut best: Option<(usize, Vec<T>)> = None;
        for (tag, re) in &self.lexer.inner.regexes {
            if let Some(m) = re.find(rest) {
                let len = m.end();
                if len == 0 {
                    continue;
                }
                match &mut best {
                    Some((best_len, tags)) if *best_len == len => tags.push(*tag),
                    Some((best_len, _)) if *best_len > len => (),
                    _ => best = Some((len, vec![*tag])),
                }
            }
        }
        match best {
            Some((len, tags)) if tags.len() == 1 => Ok(Token {
                tag: tags[0],
                lexeme: rest[..len].to_string(),
                location,
            }),
            Some((len, tags)) => Err(Error::AmbiguousMatches(
                tags,
                rest[..len].to_string(),
                location,
            )),
            None => {
                let len = rest.chars().next().map(|c| c.len_utf8()).unwrap_or(1);
                Err(Error::UnexpectedText(rest[..len].to_string(), location))
            }
        }
    }

    /// Consume the token previously returned by [`TokenStream::front`].
    pub fn advance(&mut self) {
        if let Ok(token) = self.front() {
            if token.tag != self.lexer.inner.end_marker || !token.lexeme.is_empty() {
                let lexeme = token.lexeme.clone();
                self.advance_position(&lexeme);
                return;
            }
        }
        // nothing more to consume past the end marker or an unrecognised
        // character; advance past a single character to avoid looping
        // forever on unexpected text.
        let rest = &self.text[self.offset..];
        if let Some(ch) = rest.chars().next() {
            let consumed = ch.to_string();
            self.advance_position(&consumed);
        }
    }

    /// Splice additional text into the stream at the current position, under
    /// a new source label. Used by semantic actions that expand macros.
    pub fn inject(&mut self, text: String, label: String) {
        self.label = label;
        self.text.insert_str(self.offset, &text);
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
