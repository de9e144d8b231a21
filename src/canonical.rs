use std::collections::BTreeMap;

use crate::closure::{closure, goto};
use crate::first::FirstMap;
use crate::grammar::{ResolvedGrammar, Symbol};
use crate::item::{Item, ItemSet};
use crate::terminal::Terminal;

/// One state of the canonical collection: its item set and its GOTO edges
/// to other states, indexed by state number.
#[derive(Debug, Clone)]
pub struct State<T: Terminal> {
    pub number: u32,
    pub items: ItemSet<T>,
    pub goto_edges: BTreeMap<Symbol<T>, u32>,
}

/// The canonical collection of LR(1) states, stored as a dense `Vec` indexed
/// by state number rather than the teacher's linked list.
#[derive(Debug, Clone)]
pub struct CanonicalCollection<T: Terminal> {
    pub states: Vec<State<T>>,
}

impl<T: Terminal> CanonicalCollection<T> {
    pub fn build(grammar: &ResolvedGrammar<T>, first_map: &FirstMap<T>) -> Self {
        let initial_items: ItemSet<T> = grammar
            .productions_for(grammar.start_symbol())
            .iter()
            .map(|production| Item::new(production.clone(), 0, T::end()))
            .collect();
        let initial_items = closure(&initial_items, grammar, first_map);

        let mut states = vec![State {
            number: 0,
            items: initial_items,
            goto_edges: BTreeMap::new(),
        }];
        let mut worklist: Vec<u32> = vec![0];

        while let Some(state_number) = worklist.pop() {
            let symbols = symbols_after_dot(&states[state_number as usize].items);
            for symbol in symbols {
                let successor_items = goto(
                    &states[state_number as usize].items,
                    &symbol,
                    grammar,
                    first_map,
                );
                if successor_items.is_empty() {
                    continue;
                }
                let existing = states
                    .iter()
                    .find(|candidate| candidate.items == successor_items)
                    .map(|candidate| candidate.number);
                let target = match existing {
                    Some(number) => number,
                    None => {
                        let number = states.len() as u32;
                        states.push(State {
                            number,
                            items: successor_items,
                            goto_edges: BTreeMap::new(),
                        });
                        worklist.push(number);
                        number
                    }
                };
                states[state_number as usize]
                    .goto_edges
                    .insert(symbol, target);
            }
        }

        Self { states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

fn symbols_after_dot<T: Terminal>(items: &ItemSet<T>) -> Vec<Symbol<T>> {
    let mut symbols: Vec<Symbol<T>> = items
        .iter()
        .filter_map(|item| item.symbol_after_dot().cloned())
        .collect();
    symbols.sort();
    symbols.dedup();
    symbols
}
