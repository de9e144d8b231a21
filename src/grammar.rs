use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use lexan::Location;

use crate::error::GrammarError;
use crate::terminal::{Terminal, TerminalRegistry};

/// A production body may hold at most this many symbols.
pub const MAX_BODY: usize = 10;

/// A grammar symbol once it has been resolved against a [`GrammarStore`] and
/// a [`TerminalRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Symbol<T: Terminal> {
    Terminal(T),
    NonTerminal(Rc<str>),
}

impl<T: Terminal> fmt::Display for Symbol<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::Terminal(t) => write!(f, "{}", t),
            Symbol::NonTerminal(name) => write!(f, "{}", name),
        }
    }
}

/// A single rewrite rule `head -> body`, with its body already resolved to
/// [`Symbol`]s. Productions are identified by structural equality of head
/// and body, and shared via [`Rc`] so items can reference one without
/// cloning the body.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Production<T: Terminal> {
    pub head: Rc<str>,
    pub body: Vec<Symbol<T>>,
}

impl<T: Terminal> fmt::Display for Production<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ->", self.head)?;
        for symbol in &self.body {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}

/// Un-resolved grammar text: names only, no terminal/non-terminal
/// distinction yet. Produced by [`GrammarStore::load`], resolved by
/// [`GrammarStore::resolve`].
#[derive(Debug, Clone, Default)]
struct RawProduction {
    head: String,
    body: Vec<String>,
}

/// Mapping from non-terminal name to its ordered list of production
/// alternatives, plus the declared start symbol.
#[derive(Debug, Clone, Default)]
pub struct GrammarStore {
    start: String,
    productions: Vec<RawProduction>,
    heads: BTreeMap<String, Vec<usize>>,
}

impl GrammarStore {
    pub fn start_symbol(&self) -> &str {
        &self.start
    }

    pub fn is_non_terminal(&self, name: &str) -> bool {
        self.heads.contains_key(name)
    }

    /// Every distinct name used in a production body that is not itself a
    /// non-terminal: the set of terminal names this grammar refers to.
    pub fn referenced_terminal_names(&self) -> std::collections::BTreeSet<String> {
        let mut names = std::collections::BTreeSet::new();
        for production in &self.productions {
            for name in &production.body {
                if !self.is_non_terminal(name) {
                    names.insert(name.clone());
                }
            }
        }
        names
    }

    /// Load a grammar from its whitespace-tokenized source form: a
    /// `%start name` directive, followed by `name:` headers each with one
    /// or more `|`-separated bodies, until the next header or end of file.
    pub fn load(text: &str) -> Result<Self, GrammarError> {
        let mut tokens = GrammarTokenStream::new(text);

        let directive = tokens.next().ok_or(GrammarError::UnexpectedEndOfFile)?;
        if directive.text != "%start" {
            return Err(GrammarError::MissingStartDirective);
        }
        let start = tokens
            .next()
            .ok_or(GrammarError::UnexpectedEndOfFile)?
            .text;

        let mut store = GrammarStore {
            start,
            productions: Vec::new(),
            heads: BTreeMap::new(),
        };

        let mut current_head: Option<String> = None;
        let mut current_body: Vec<String> = Vec::new();

        while let Some(token) = tokens.next() {
            if let Some(name) = token.text.strip_suffix(':') {
                if name.is_empty() || name.ends_with(':') {
                    return Err(GrammarError::MalformedHeader(token.text.clone()));
                }
                if let Some(head) = current_head.take() {
                    store.push_production(head, std::mem::take(&mut current_body))?;
                }
                current_head = Some(name.to_string());
                continue;
            }

            let head = current_head
                .clone()
                .ok_or_else(|| GrammarError::MalformedHeader(token.text.clone()))?;

            if token.text == "|" {
                store.push_production(head, std::mem::take(&mut current_body))?;
                current_head = Some(head);
                continue;
            }

            current_body.push(token.text);
            if current_body.len() > MAX_BODY {
                return Err(GrammarError::BodyTooLong {
                    head,
                    length: current_body.len(),
                });
            }
        }

        if let Some(head) = current_head {
            store.push_production(head, current_body)?;
        }

        Ok(store)
    }

    fn push_production(&mut self, head: String, body: Vec<String>) -> Result<(), GrammarError> {
        if body.is_empty() {
            return Err(GrammarError::EmptyProduction { head });
        }
        let index = self.productions.len();
        self.heads.entry(head.clone()).or_default().push(index);
        self.productions.push(RawProduction { head, body });
        Ok(())
    }

    /// Resolve every raw production body against the terminal registry:
    /// a name that is a key of this store is a non-terminal, every other
    /// name must be a registered terminal.
    pub fn resolve<T: Terminal>(
        &self,
        registry: &TerminalRegistry<T>,
    ) -> Result<ResolvedGrammar<T>, crate::error::TableError> {
        if !self.is_non_terminal(&self.start) {
            return Err(crate::error::TableError::StartSymbolUndefined(
                self.start.clone(),
            ));
        }
        let mut productions = Vec::with_capacity(self.productions.len());
        for raw in &self.productions {
            let mut body = Vec::with_capacity(raw.body.len());
            for name in &raw.body {
                if self.is_non_terminal(name) {
                    body.push(Symbol::NonTerminal(Rc::from(name.as_str())));
                } else if let Some(tag) = registry.lookup(name) {
                    body.push(Symbol::Terminal(tag));
                } else {
                    return Err(crate::error::TableError::UnknownSymbol {
                        head: raw.head.clone(),
                        symbol: name.clone(),
                    });
                }
            }
            productions.push(Rc::new(Production {
                head: Rc::from(raw.head.as_str()),
                body,
            }));
        }

        let mut by_head: BTreeMap<Rc<str>, Vec<Rc<Production<T>>>> = BTreeMap::new();
        for production in &productions {
            by_head
                .entry(production.head.clone())
                .or_default()
                .push(production.clone());
        }

        let mut reachable: std::collections::BTreeSet<Rc<str>> = std::collections::BTreeSet::new();
        let mut worklist: Vec<Rc<str>> = vec![Rc::from(self.start.as_str())];
        while let Some(name) = worklist.pop() {
            if !reachable.insert(name.clone()) {
                continue;
            }
            for production in by_head.get(&name).map(|v| v.as_slice()).unwrap_or(&[]) {
                for symbol in &production.body {
                    if let Symbol::NonTerminal(inner) = symbol {
                        if !reachable.contains(inner) {
                            worklist.push(inner.clone());
                        }
                    }
                }
            }
        }
        for name in by_head.keys() {
            if !reachable.contains(name) {
                return Err(crate::error::TableError::UnreachableNonTerminal(
                    name.to_string(),
                ));
            }
        }

        Ok(ResolvedGrammar {
            start: Rc::from(self.start.as_str()),
            productions,
            by_head,
        })
    }
}

/// A grammar whose production bodies have been fully resolved to
/// [`Symbol`]s, ready for FIRST-set computation and table construction.
#[derive(Debug, Clone)]
pub struct ResolvedGrammar<T: Terminal> {
    start: Rc<str>,
    productions: Vec<Rc<Production<T>>>,
    by_head: BTreeMap<Rc<str>, Vec<Rc<Production<T>>>>,
}

impl<T: Terminal> ResolvedGrammar<T> {
    pub fn start_symbol(&self) -> &Rc<str> {
        &self.start
    }

    pub fn productions_for(&self, head: &str) -> &[Rc<Production<T>>] {
        self.by_head
            .get(head)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_non_terminal(&self, name: &str) -> bool {
        self.by_head.contains_key(name)
    }

    pub fn all_productions(&self) -> &[Rc<Production<T>>] {
        &self.productions
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = &Rc<str>> {
        self.by_head.keys()
    }
}

struct RawToken {
    text: String,
    #[allow(dead_code)]
    location: Location,
}

/// Whitespace-tokenizes a grammar file: no quoting, no comments; a header is
/// recognized by a trailing `:`.
struct GrammarTokenStream<'a> {
    rest: &'a str,
    line: usize,
    column: usize,
}

impl<'a> GrammarTokenStream<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            rest: text,
            line: 1,
            column: 1,
        }
    }

    fn advance(&mut self, n: usize) {
        for ch in self.rest[..n].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.rest = &self.rest[n..];
    }
}

impl<'a> Iterator for GrammarTokenStream<'a> {
    type Item = RawToken;

    fn next(&mut self) -> Option<RawToken> {
        loop {
            let ws = self
                .rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(self.rest.len());
            self.advance(ws);
            if self.rest.is_empty() {
                return None;
            }
            let location = Location::new(self.line, self.column);
            let end = self
                .rest
                .find(|c: char| c.is_whitespace())
                .unwrap_or(self.rest.len());
            let text = self.rest[..end].to_string();
            self.advance(end);
            return Some(RawToken { text, location });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use crate::terminal::TerminalRegistry;
    use std::fmt;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Tok {
        A,
        B,
        End,
    }

    impl fmt::Display for Tok {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl Terminal for Tok {
        fn end() -> Self {
            Tok::End
        }
    }

    #[test]
    fn loads_simple_grammar() {
        let store = GrammarStore::load("%start S\nS: A B\n| A\nA: a\nB: b\n").unwrap();
        assert_eq!(store.start_symbol(), "S");
        assert!(store.is_non_terminal("S"));
        assert!(store.is_non_terminal("A"));
        assert!(!store.is_non_terminal("a"));
    }

    #[test]
    fn rejects_missing_start() {
        let err = GrammarStore::load("S: a\n").unwrap_err();
        assert_eq!(err, GrammarError::MissingStartDirective);
    }

    #[test]
    fn rejects_empty_body() {
        let err = GrammarStore::load("%start S\nS: a\n|\n").unwrap_err();
        assert!(matches!(err, GrammarError::EmptyProduction { .. }));
    }

    #[test]
    fn rejects_oversized_body() {
        let body = "a ".repeat(MAX_BODY + 1);
        let source = format!("%start S\nS: {}\n", body);
        let err = GrammarStore::load(&source).unwrap_err();
        assert!(matches!(err, GrammarError::BodyTooLong { .. }));
    }

    #[test]
    fn resolve_rejects_unreachable_non_terminal() {
        let store = GrammarStore::load("%start S\nS: a\nU: b\n").unwrap();
        let registry = TerminalRegistry::new(&[(Tok::A, "a"), (Tok::B, "b")]);
        let err = store.resolve(&registry).unwrap_err();
        assert_eq!(err, TableError::UnreachableNonTerminal("U".to_string()));
    }
}
