use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::canonical::CanonicalCollection;
use crate::grammar::{Production, ResolvedGrammar, Symbol};
use crate::terminal::Terminal;

/// A genuine sum type for what a state does on a given lookahead: no
/// "don't care" payload riding along for the `Accept` case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<T: Terminal> {
    Shift(u32),
    Reduce(Rc<Production<T>>),
    Accept,
}

impl<T: Terminal> fmt::Display for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "shift {}", state),
            Action::Reduce(production) => write!(f, "reduce {}", production),
            Action::Accept => write!(f, "accept"),
        }
    }
}

/// A table slot that was about to be overwritten with a different value:
/// recorded instead of silently discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict<T: Terminal> {
    ShiftReduce {
        state: u32,
        terminal: T,
        shift: Action<T>,
        reduce: Action<T>,
    },
    ReduceReduce {
        state: u32,
        terminal: T,
        first: Action<T>,
        second: Action<T>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ActionTable<T: Terminal>(BTreeMap<(u32, T), Action<T>>);

impl<T: Terminal> ActionTable<T> {
    pub fn get(&self, state: u32, terminal: T) -> Option<&Action<T>> {
        self.0.get(&(state, terminal))
    }
}

#[derive(Debug, Clone, Default)]
pub struct GotoTable(BTreeMap<(u32, Rc<str>), u32>);

impl GotoTable {
    pub fn get(&self, state: u32, non_terminal: &str) -> Option<u32> {
        self.0.get(&(state, Rc::from(non_terminal))).copied()
    }
}

/// The ACTION and GOTO tables derived from a canonical collection, plus any
/// conflicts observed while building the ACTION table. The tables still use
/// last-write-wins semantics, matching the grammar builder this was
/// grounded on; a caller that wants a hard failure on conflicting grammars
/// should inspect `conflicts` itself.
#[derive(Debug, Clone)]
pub struct Tables<T: Terminal> {
    pub action: ActionTable<T>,
    pub goto: GotoTable,
    pub conflicts: Vec<Conflict<T>>,
    pub start_state: u32,
}

impl<T: Terminal> Tables<T> {
    pub fn build(grammar: &ResolvedGrammar<T>, collection: &CanonicalCollection<T>) -> Self {
        let mut action: BTreeMap<(u32, T), Action<T>> = BTreeMap::new();
        let mut goto: BTreeMap<(u32, Rc<str>), u32> = BTreeMap::new();
        let mut conflicts = Vec::new();

        for state in &collection.states {
            for (symbol, &target) in &state.goto_edges {
                if let Symbol::NonTerminal(name) = symbol {
                    goto.insert((state.number, name.clone()), target);
                }
            }

            for item in state.items.iter() {
                let (lookahead, new_action) = if item.at_end() {
                    if item.production.head.as_ref() == grammar.start_symbol().as_ref()
                        && item.lookahead == T::end()
                    {
                        (T::end(), Action::Accept)
                    } else {
                        (item.lookahead, Action::Reduce(item.production.clone()))
                    }
                } else {
                    match item.symbol_after_dot() {
                        Some(Symbol::Terminal(t)) => {
                            let t = *t;
                            match state.goto_edges.get(&Symbol::Terminal(t)).copied() {
                                Some(target) => (t, Action::Shift(target)),
                                None => continue,
                            }
                        }
                        _ => continue,
                    }
                };

                let key = (state.number, lookahead);
                match action.get(&key) {
                    None => {
                        action.insert(key, new_action);
                    }
                    Some(existing) if *existing == new_action => {}
                    Some(existing) => {
                        let conflict = match (existing, &new_action) {
                            (Action::Shift(_), Action::Reduce(_)) => Conflict::ShiftReduce {
                                state: state.number,
                                terminal: lookahead,
                                shift: existing.clone(),
                                reduce: new_action.clone(),
                            },
                            (Action::Reduce(_), Action::Shift(_)) => Conflict::ShiftReduce {
                                state: state.number,
                                terminal: lookahead,
                                shift: new_action.clone(),
                                reduce: existing.clone(),
                            },
                            _ => Conflict::ReduceReduce {
                                state: state.number,
                                terminal: lookahead,
                                first: existing.clone(),
                                second: new_action.clone(),
                            },
                        };
                        conflicts.push(conflict);
                        action.insert(key, new_action);
                    }
                }
            }
        }

        Self {
            action: ActionTable(action),
            goto: GotoTable(goto),
            conflicts,
            start_state: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::CanonicalCollection;
    use crate::first::FirstMap;
    use crate::grammar::GrammarStore;
    use crate::terminal::TerminalRegistry;
    use std::fmt;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Tok {
        Plus,
        Number,
        X,
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

    fn build(text: &str, terminals: &[(Tok, &str)]) -> Tables<Tok> {
        let store = GrammarStore::load(text).unwrap();
        let registry = TerminalRegistry::new(terminals);
        let grammar = store.resolve(&registry).unwrap();
        let first_map = FirstMap::build(&grammar);
        let collection = CanonicalCollection::build(&grammar, &first_map);
        Tables::build(&grammar, &collection)
    }

    /// `S -> A | B`, `A -> x`, `B -> x`: two distinct reductions apply to the
    /// same handle under the same lookahead.
    #[test]
    fn ambiguous_grammar_reports_reduce_reduce_conflict() {
        let tables = build(
            "%start S\nS: A\n| B\nA: X\nB: X\n",
            &[(Tok::X, "X")],
        );
        assert_eq!(tables.conflicts.len(), 1);
        match &tables.conflicts[0] {
            Conflict::ReduceReduce {
                terminal, first, second, ..
            } => {
                assert_eq!(*terminal, Tok::End);
                assert!(matches!(first, Action::Reduce(_)));
                assert!(matches!(second, Action::Reduce(_)));
            }
            other => panic!("expected a reduce/reduce conflict, got {:?}", other),
        }
    }

    /// `E -> E Plus E | Number`: the classic ambiguous-expression grammar,
    /// shift/reduce-conflicted on `Plus` once two operators are pending.
    #[test]
    fn ambiguous_grammar_reports_shift_reduce_conflict() {
        let tables = build(
            "%start S\nS: E\nE: E Plus E\n| Number\n",
            &[(Tok::Plus, "Plus"), (Tok::Number, "Number")],
        );
        assert!(!tables.conflicts.is_empty());
        let shift_reduce: Vec<_> = tables
            .conflicts
            .iter()
            .filter(|c| matches!(c, Conflict::ShiftReduce { .. }))
            .collect();
        assert_eq!(shift_reduce.len(), 1);
        match shift_reduce[0] {
            Conflict::ShiftReduce {
                terminal,
                shift,
                reduce,
                ..
            } => {
                assert_eq!(*terminal, Tok::Plus);
                assert!(matches!(shift, Action::Shift(_)), "shift field holds {:?}", shift);
                assert!(matches!(reduce, Action::Reduce(_)), "reduce field holds {:?}", reduce);
            }
            other => panic!("expected a shift/reduce conflict, got {:?}", other),
        }
    }
}
