use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::grammar::{ResolvedGrammar, Symbol};
use crate::terminal::Terminal;

/// `FIRST(X)` for every terminal and every non-terminal reachable from the
/// start symbol, as an ascending, duplicate-free set of terminals.
#[derive(Debug, Clone, Default)]
pub struct FirstMap<T: Terminal> {
    non_terminals: BTreeMap<Rc<str>, BTreeSet<T>>,
}

impl<T: Terminal> FirstMap<T> {
    pub fn build(grammar: &ResolvedGrammar<T>) -> Self {
        let mut map = FirstMap {
            non_terminals: BTreeMap::new(),
        };
        for name in grammar.non_terminals() {
            map.first_of_non_terminal(name, grammar, &mut BTreeSet::new());
        }
        map
    }

    pub fn first_of(&self, symbol: &Symbol<T>) -> BTreeSet<T> {
        match symbol {
            Symbol::Terminal(t) => {
                let mut set = BTreeSet::new();
                set.insert(*t);
                set
            }
            Symbol::NonTerminal(name) => self
                .non_terminals
                .get(name.as_ref())
                .cloned()
                .unwrap_or_default(),
        }
    }

    pub fn first_of_non_terminal_name(&self, name: &str) -> BTreeSet<T> {
        self.non_terminals.get(name).cloned().unwrap_or_default()
    }

    /// Depth-first, memoized computation of `FIRST(name)`. `visiting` guards
    /// against self-recursion at the leading position: a production whose
    /// own head recurs as its first symbol is skipped rather than expanded
    /// again. This terminates but is not a sound fixpoint for mutual left
    /// recursion among non-terminals (see design notes).
    fn first_of_non_terminal(
        &mut self,
        name: &str,
        grammar: &ResolvedGrammar<T>,
        visiting: &mut BTreeSet<Rc<str>>,
    ) -> BTreeSet<T> {
        if let Some(existing) = self.non_terminals.get(name) {
            return existing.clone();
        }
        let key: Rc<str> = Rc::from(name);
        if !visiting.insert(key.clone()) {
            return BTreeSet::new();
        }

        let mut result = BTreeSet::new();
        for production in grammar.productions_for(name) {
            if let Some(leading) = production.body.first() {
                if let Symbol::NonTerminal(lead_name) = leading {
                    if lead_name.as_ref() == name {
                        continue;
                    }
                    let inner = self.first_of_non_terminal(lead_name, grammar, visiting);
                    result.extend(inner);
                } else if let Symbol::Terminal(t) = leading {
                    result.insert(*t);
                }
            }
        }

        visiting.remove(&key);
        self.non_terminals.insert(key, result.clone());
        result
    }

    /// FIRST of a sequence of symbols, stopping at the first symbol whose
    /// FIRST set is non-empty (this engine assumes no symbol is
    /// ε-productive, so the first symbol always determines the sequence's
    /// FIRST set once it exists).
    pub fn first_of_sequence(&self, symbols: &[Symbol<T>], fallback: T) -> BTreeSet<T> {
        if let Some(first_symbol) = symbols.first() {
            self.first_of(first_symbol)
        } else {
            let mut set = BTreeSet::new();
            set.insert(fallback);
            set
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarStore;
    use crate::terminal::TerminalRegistry;
    use std::fmt;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Tok {
        Plus,
        Times,
        LBracket,
        RBracket,
        Number,
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

    fn arithmetic_grammar() -> ResolvedGrammar<Tok> {
        let text = "%start S\n\
                     S: E\n\
                     E: E Plus T\n\
                     | T\n\
                     T: T Times F\n\
                     | F\n\
                     F: LBracket E RBracket\n\
                     | Number\n";
        let store = GrammarStore::load(text).unwrap();
        let registry = TerminalRegistry::new(&[
            (Tok::Plus, "Plus"),
            (Tok::Times, "Times"),
            (Tok::LBracket, "LBracket"),
            (Tok::RBracket, "RBracket"),
            (Tok::Number, "Number"),
        ]);
        store.resolve(&registry).unwrap()
    }

    #[test]
    fn first_sets_match_expected() {
        let grammar = arithmetic_grammar();
        let first_map = FirstMap::build(&grammar);
        let expected: BTreeSet<Tok> = [Tok::LBracket, Tok::Number].into_iter().collect();
        assert_eq!(first_map.first_of_non_terminal_name("F"), expected);
        assert_eq!(first_map.first_of_non_terminal_name("T"), expected);
        assert_eq!(first_map.first_of_non_terminal_name("E"), expected);
        assert_eq!(first_map.first_of_non_terminal_name("S"), expected);
    }
}
