//! A concrete [`TokenSource`] backed by [`lexan`], for the CLI and as a test
//! double standing in for "the external lexer".

use crate::recognizer::TokenSource;
use crate::terminal::Terminal;

pub struct LexanSource<T: Terminal> {
    stream: lexan::TokenStream<T>,
}

impl<T: Terminal> LexanSource<T> {
    pub fn new(lexer: &lexan::LexicalAnalyzer<T>, text: String, label: String) -> Self {
        Self {
            stream: lexer.token_stream(text, label),
        }
    }
}

impl<T: Terminal> TokenSource<T> for LexanSource<T> {
    fn next(&mut self) -> T {
        match self.stream.front() {
            Ok(token) => {
                let tag = *token.tag();
                self.stream.advance();
                tag
            }
            Err(error) => {
                eprintln!("lexical error: {}", error);
                T::end()
            }
        }
    }
}
