use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A closed, ordered enumeration of terminal symbol kinds, supplied by the
/// host application. `end()` is the distinguished end-of-input sentinel used
/// as the lookahead on the accepting item.
pub trait Terminal: Copy + Eq + Ord + Hash + Debug + Display {
    fn end() -> Self;
}

/// Maps terminal names (as they appear in a grammar file) to registered
/// terminal values, and back, for diagnostics.
#[derive(Debug, Clone)]
pub struct TerminalRegistry<T: Terminal> {
    by_name: BTreeMap<String, T>,
    names: BTreeMap<T, String>,
}

impl<T: Terminal> TerminalRegistry<T> {
    pub fn new(terminals: &[(T, &str)]) -> Self {
        let mut by_name = BTreeMap::new();
        let mut names = BTreeMap::new();
        for (tag, name) in terminals {
            by_name.insert(name.to_string(), *tag);
            names.insert(*tag, name.to_string());
        }
        Self { by_name, names }
    }

    pub fn lookup(&self, name: &str) -> Option<T> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, tag: T) -> &str {
        self.names
            .get(&tag)
            .map(|s| s.as_str())
            .unwrap_or("<unnamed terminal>")
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}
