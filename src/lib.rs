extern crate lexan;

pub mod canonical;
pub mod closure;
pub mod error;
pub mod first;
pub mod grammar;
pub mod item;
pub mod lexicon;
pub mod naive;
pub mod recognizer;
pub mod table;
pub mod terminal;

pub use canonical::{CanonicalCollection, State};
pub use error::{GrammarError, TableError};
pub use first::FirstMap;
pub use grammar::{GrammarStore, Production, ResolvedGrammar, Symbol};
pub use item::{Item, ItemSet};
pub use naive::recognize_naive;
pub use recognizer::{recognize, TokenSource};
pub use table::{Action, ActionTable, Conflict, GotoTable, Tables};
pub use terminal::{Terminal, TerminalRegistry};

/// Build FIRST sets, the canonical collection, and the ACTION/GOTO tables
/// for `grammar` in one call: the pipeline described end to end, for
/// callers that don't need the intermediate steps individually.
pub fn build_tables<T: Terminal>(grammar: &ResolvedGrammar<T>) -> Tables<T> {
    let first_map = FirstMap::build(grammar);
    let collection = CanonicalCollection::build(grammar, &first_map);
    Tables::build(grammar, &collection)
}
