use crate::table::{Action, Tables};
use crate::terminal::Terminal;

/// A source of terminals the recognizer consumes one at a time. Decoupled
/// from any concrete lexer, matching the original `yylex()`-style hookup
/// only in spirit: here it is a trait, not a process-wide callable.
pub trait TokenSource<T: Terminal> {
    fn next(&mut self) -> T;
}

/// A frame on the parse stack. The recognizer only needs the state number to
/// drive ACTION/GOTO lookups, so that's all a frame carries; a caller that
/// also wants the shifted/reduced symbol can track it alongside via a
/// different `TokenSource` wrapper.
struct Frame {
    state: u32,
}

struct ParseStack {
    frames: Vec<Frame>,
}

impl ParseStack {
    fn new(start_state: u32) -> Self {
        Self {
            frames: vec![Frame { state: start_state }],
        }
    }

    fn top(&self) -> u32 {
        self.frames.last().expect("parse stack is never empty").state
    }

    fn push(&mut self, state: u32) {
        self.frames.push(Frame { state });
    }

    fn pop_n(&mut self, n: usize) {
        let new_len = self.frames.len() - n;
        self.frames.truncate(new_len);
    }
}

/// Run the shift/reduce recognizer to completion, returning whether
/// `tokens` is a sentence of the grammar the tables were built from.
pub fn recognize<T: Terminal>(tables: &Tables<T>, tokens: &mut impl TokenSource<T>) -> bool {
    let mut stack = ParseStack::new(tables.start_state);
    let mut lookahead = tokens.next();

    loop {
        match tables.action.get(stack.top(), lookahead) {
            None => return false,
            Some(Action::Accept) => return lookahead == T::end(),
            Some(Action::Shift(next_state)) => {
                stack.push(*next_state);
                lookahead = tokens.next();
            }
            Some(Action::Reduce(production)) => {
                stack.pop_n(production.body.len());
                match tables.goto.get(stack.top(), &production.head) {
                    Some(next_state) => stack.push(next_state),
                    None => return false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::CanonicalCollection;
    use crate::first::FirstMap;
    use crate::grammar::GrammarStore;
    use crate::table::Tables;
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

    struct VecSource(std::vec::IntoIter<Tok>);

    impl TokenSource<Tok> for VecSource {
        fn next(&mut self) -> Tok {
            self.0.next().unwrap_or(Tok::End)
        }
    }

    fn build_tables() -> Tables<Tok> {
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
        let grammar = store.resolve(&registry).unwrap();
        let first_map = FirstMap::build(&grammar);
        let collection = CanonicalCollection::build(&grammar, &first_map);
        Tables::build(&grammar, &collection)
    }

    fn tokens(tags: &[Tok]) -> VecSource {
        VecSource(tags.to_vec().into_iter())
    }

    #[test]
    fn accepts_sum_of_product() {
        let tables = build_tables();
        let mut stream = tokens(&[
            Tok::Number,
            Tok::Plus,
            Tok::Number,
            Tok::Times,
            Tok::Number,
            Tok::End,
        ]);
        assert!(recognize(&tables, &mut stream));
    }

    #[test]
    fn rejects_double_plus() {
        let tables = build_tables();
        let mut stream = tokens(&[Tok::Number, Tok::Plus, Tok::Plus, Tok::Number, Tok::End]);
        assert!(!recognize(&tables, &mut stream));
    }

    #[test]
    fn accepts_bracketed_sum_times_number() {
        let tables = build_tables();
        let mut stream = tokens(&[
            Tok::LBracket,
            Tok::Number,
            Tok::Plus,
            Tok::Number,
            Tok::RBracket,
            Tok::Times,
            Tok::Number,
            Tok::End,
        ]);
        assert!(recognize(&tables, &mut stream));
    }

    #[test]
    fn nested_brackets_balance() {
        let text = "%start S\nS: LBracket S RBracket\n| LBracket RBracket\n";
        let store = GrammarStore::load(text).unwrap();
        let registry =
            TerminalRegistry::new(&[(Tok::LBracket, "LBracket"), (Tok::RBracket, "RBracket")]);
        let grammar = store.resolve(&registry).unwrap();
        let first_map = FirstMap::build(&grammar);
        let collection = CanonicalCollection::build(&grammar, &first_map);
        let tables = Tables::build(&grammar, &collection);

        let mut good = tokens(&[
            Tok::LBracket,
            Tok::LBracket,
            Tok::RBracket,
            Tok::RBracket,
            Tok::End,
        ]);
        assert!(recognize(&tables, &mut good));

        let mut bad = tokens(&[Tok::LBracket, Tok::LBracket, Tok::RBracket, Tok::End]);
        assert!(!recognize(&tables, &mut bad));
    }

    #[test]
    fn rejects_empty_input() {
        let text = "%start S\nS: Number\n";
        let store = GrammarStore::load(text).unwrap();
        let registry = TerminalRegistry::new(&[(Tok::Number, "Number")]);
        let grammar = store.resolve(&registry).unwrap();
        let first_map = FirstMap::build(&grammar);
        let collection = CanonicalCollection::build(&grammar, &first_map);
        let tables = Tables::build(&grammar, &collection);

        let mut stream = tokens(&[]);
        assert!(!recognize(&tables, &mut stream));
    }
}
