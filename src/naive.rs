//! A direct, non-canonical bottom-up recognizer: no item sets, no lookahead,
//! no tables. Kept alongside the LR(1) engine purely for contrast; nothing
//! else in this crate depends on it.

use crate::grammar::{ResolvedGrammar, Symbol};
use crate::recognizer::TokenSource;
use crate::terminal::Terminal;

#[derive(Debug, Clone, PartialEq, Eq)]
enum StackSymbol<T: Terminal> {
    Terminal(T),
    NonTerminal(std::rc::Rc<str>),
}

/// Scan the stack for a suffix matching some production's body ("a
/// handle"). Productions are tried in the grammar's insertion order, and
/// the search tries the longest possible handle first (the full stack) down
/// to a single symbol, matching `check_for_handle`'s linear scan.
fn find_handle<T: Terminal>(
    stack: &[StackSymbol<T>],
    grammar: &ResolvedGrammar<T>,
) -> Option<(usize, std::rc::Rc<str>)> {
    for start in 0..stack.len() {
        let suffix = &stack[start..];
        for production in grammar.all_productions() {
            if production.body.len() != suffix.len() {
                continue;
            }
            let matches = production
                .body
                .iter()
                .zip(suffix.iter())
                .all(|(expected, actual)| match (expected, actual) {
                    (Symbol::Terminal(a), StackSymbol::Terminal(b)) => a == b,
                    (Symbol::NonTerminal(a), StackSymbol::NonTerminal(b)) => a == b,
                    _ => false,
                });
            if matches {
                return Some((start, production.head.clone()));
            }
        }
    }
    None
}

/// Shift every token onto a symbol stack, reducing greedily after each
/// shift; accept if the stack ends as exactly the start symbol with no
/// input left.
pub fn recognize_naive<T: Terminal>(
    grammar: &ResolvedGrammar<T>,
    tokens: &mut impl TokenSource<T>,
) -> bool {
    let mut stack: Vec<StackSymbol<T>> = Vec::new();
    loop {
        let token = tokens.next();
        if token != T::end() {
            stack.push(StackSymbol::Terminal(token));
        }

        loop {
            match find_handle(&stack, grammar) {
                Some((start, head)) => {
                    stack.truncate(start);
                    stack.push(StackSymbol::NonTerminal(head));
                }
                None => break,
            }
        }

        if token == T::end() {
            return stack.len() == 1
                && matches!(&stack[0], StackSymbol::NonTerminal(name) if name.as_ref() == grammar.start_symbol().as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarStore;
    use crate::recognizer::TokenSource;
    use crate::terminal::TerminalRegistry;
    use std::fmt;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Tok {
        LBracket,
        RBracket,
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

    struct VecSource(std::vec::IntoIter<Tok>);

    impl TokenSource<Tok> for VecSource {
        fn next(&mut self) -> Tok {
            self.0.next().unwrap_or(Tok::End)
        }
    }

    #[test]
    fn naive_accepts_balanced_brackets() {
        let text = "%start S\nS: LBracket S RBracket\n| LBracket RBracket\n";
        let store = GrammarStore::load(text).unwrap();
        let registry =
            TerminalRegistry::new(&[(Tok::LBracket, "LBracket"), (Tok::RBracket, "RBracket")]);
        let grammar = store.resolve(&registry).unwrap();

        let mut good = VecSource(
            vec![Tok::LBracket, Tok::LBracket, Tok::RBracket, Tok::RBracket]
                .into_iter(),
        );
        assert!(recognize_naive(&grammar, &mut good));

        let mut bad = VecSource(vec![Tok::LBracket, Tok::RBracket, Tok::RBracket].into_iter());
        assert!(!recognize_naive(&grammar, &mut bad));
    }
}
