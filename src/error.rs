use std::fmt;

use lexan::Location;

/// Failures that abort loading a grammar source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    MissingStartDirective,
    MalformedHeader(String),
    BodyTooLong { head: String, length: usize },
    EmptyProduction { head: String },
    UnexpectedEndOfFile,
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GrammarError::MissingStartDirective => {
                write!(f, "grammar is missing a %start directive")
            }
            GrammarError::MalformedHeader(token) => {
                write!(f, "expected a \"name:\" header, found \"{}\"", token)
            }
            GrammarError::BodyTooLong { head, length } => write!(
                f,
                "production for \"{}\" has {} symbols, exceeding the maximum of {}",
                head, length, crate::grammar::MAX_BODY
            ),
            GrammarError::EmptyProduction { head } => {
                write!(f, "production for \"{}\" has an empty body", head)
            }
            GrammarError::UnexpectedEndOfFile => write!(f, "unexpected end of grammar file"),
        }
    }
}

impl std::error::Error for GrammarError {}

/// Failures discovered while resolving a loaded grammar against a terminal
/// registry, or while building its tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    UnknownSymbol { head: String, symbol: String },
    UnreachableNonTerminal(String),
    StartSymbolUndefined(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TableError::UnknownSymbol { head, symbol } => write!(
                f,
                "production for \"{}\" refers to unknown symbol \"{}\"",
                head, symbol
            ),
            TableError::UnreachableNonTerminal(name) => {
                write!(f, "non-terminal \"{}\" is not reachable from the start symbol", name)
            }
            TableError::StartSymbolUndefined(name) => {
                write!(f, "start symbol \"{}\" is not defined", name)
            }
        }
    }
}

impl std::error::Error for TableError {}

/// Report a fatal grammar-source problem the way the grammar loader's
/// surrounding tooling expects: a line to stderr, not a panic.
pub fn report(location: &Location, what: &impl fmt::Display) {
    eprintln!("{}: error: {}.", location, what);
}
