use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::grammar::{Production, Symbol};
use crate::terminal::Terminal;

/// An LR(1) item `[A -> alpha . beta, a]`: a production, a dot position, and
/// a single lookahead terminal.
#[derive(Debug, Clone)]
pub struct Item<T: Terminal> {
    pub production: Rc<Production<T>>,
    pub dot: usize,
    pub lookahead: T,
}

impl<T: Terminal> Item<T> {
    pub fn new(production: Rc<Production<T>>, dot: usize, lookahead: T) -> Self {
        debug_assert!(dot <= production.body.len());
        Self {
            production,
            dot,
            lookahead,
        }
    }

    pub fn at_end(&self) -> bool {
        self.dot == self.production.body.len()
    }

    pub fn symbol_after_dot(&self) -> Option<&Symbol<T>> {
        self.production.body.get(self.dot)
    }

    pub fn rest_after_dot(&self) -> &[Symbol<T>] {
        &self.production.body[self.dot + 1..]
    }

    /// The item with the dot advanced one position, same production and
    /// lookahead.
    pub fn advanced(&self) -> Self {
        Self {
            production: self.production.clone(),
            dot: self.dot + 1,
            lookahead: self.lookahead,
        }
    }
}

impl<T: Terminal> PartialEq for Item<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dot == other.dot
            && self.lookahead == other.lookahead
            && (Rc::ptr_eq(&self.production, &other.production)
                || *self.production == *other.production)
    }
}

impl<T: Terminal> Eq for Item<T> {}

impl<T: Terminal> PartialOrd for Item<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Terminal> Ord for Item<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&*self.production, self.dot, self.lookahead).cmp(&(
            &*other.production,
            other.dot,
            other.lookahead,
        ))
    }
}

impl<T: Terminal> fmt::Display for Item<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{} ->", self.production.head)?;
        for (index, symbol) in self.production.body.iter().enumerate() {
            if index == self.dot {
                write!(f, " .")?;
            }
            write!(f, " {}", symbol)?;
        }
        if self.dot == self.production.body.len() {
            write!(f, " .")?;
        }
        write!(f, ", {}]", self.lookahead)
    }
}

/// A set of LR(1) items, ordered and duplicate-free; set equality is
/// `BTreeSet`'s own mutual-inclusion `PartialEq`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSet<T: Terminal>(BTreeSet<Item<T>>);

impl<T: Terminal> ItemSet<T> {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Insert `item`, returning `true` if it was not already present.
    pub fn insert(&mut self, item: Item<T>) -> bool {
        self.0.insert(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item<T>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Terminal> FromIterator<Item<T>> for ItemSet<T> {
    fn from_iter<I: IntoIterator<Item = Item<T>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
