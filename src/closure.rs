use crate::first::FirstMap;
use crate::grammar::{ResolvedGrammar, Symbol};
use crate::item::{Item, ItemSet};
use crate::terminal::Terminal;

/// Expand `items` with every item reachable by repeatedly expanding a
/// non-terminal immediately after a dot, until a pass adds nothing.
pub fn closure<T: Terminal>(
    items: &ItemSet<T>,
    grammar: &ResolvedGrammar<T>,
    first_map: &FirstMap<T>,
) -> ItemSet<T> {
    let mut result = items.clone();
    loop {
        let mut added = false;
        let snapshot: Vec<Item<T>> = result.iter().cloned().collect();
        for item in &snapshot {
            let Some(Symbol::NonTerminal(name)) = item.symbol_after_dot() else {
                continue;
            };
            let lookaheads = first_map.first_of_sequence(item.rest_after_dot(), item.lookahead);
            for production in grammar.productions_for(name) {
                for lookahead in &lookaheads {
                    let new_item = Item::new(production.clone(), 0, *lookahead);
                    if result.insert(new_item) {
                        added = true;
                    }
                }
            }
        }
        if !added {
            return result;
        }
    }
}

/// `GOTO(items, symbol)`: the closure of every item in `items` with `symbol`
/// immediately after its dot, advanced one position.
pub fn goto<T: Terminal>(
    items: &ItemSet<T>,
    symbol: &Symbol<T>,
    grammar: &ResolvedGrammar<T>,
    first_map: &FirstMap<T>,
) -> ItemSet<T> {
    let kernel: ItemSet<T> = items
        .iter()
        .filter(|item| item.symbol_after_dot() == Some(symbol))
        .map(Item::advanced)
        .collect();
    closure(&kernel, grammar, first_map)
}
