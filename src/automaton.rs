//! Canonical collection of LR item sets.
//!
//! This module builds the LR state automaton: closure of item sets (with
//! lookahead propagation for the LR(1) family), worklist construction of the
//! states and their GOTO/shift transitions, and the LALR(1) post-pass that
//! collapses LR(1) states sharing a core.

use crate::first_follow::first_of_string;
use crate::grammar::Grammar;
use crate::item::{Item, State};
use crate::parser::Variant;
use crate::symbol::Symbol;
use indexmap::IndexMap;
use log::debug;
use std::collections::{BTreeSet, VecDeque};

/// The LR state automaton: states (index = state id, start state 0) and the
/// per-state transition maps over terminals and nonterminals.
#[derive(Debug, Clone, PartialEq)]
pub struct Automaton {
    states: Vec<State>,
    transitions: Vec<IndexMap<Symbol, usize>>,
}

impl Automaton {
    /// All states, in discovery order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// The state with the given id.
    pub fn state(&self, id: usize) -> &State {
        &self.states[id]
    }

    /// Per-state transition maps, indexed by state id.
    pub fn transitions(&self) -> &[IndexMap<Symbol, usize>] {
        &self.transitions
    }

    /// Looks up the successor of a state on a symbol.
    pub fn transition(&self, state: usize, symbol: &Symbol) -> Option<usize> {
        self.transitions[state].get(symbol).copied()
    }

    /// Renders every state with its id and transitions.
    pub fn display(&self, grammar: &Grammar) -> String {
        let mut out = String::new();
        for (id, state) in self.states.iter().enumerate() {
            out.push_str(&format!("State {}\n{}\n", id, state.display(grammar)));
            for (symbol, target) in &self.transitions[id] {
                out.push_str(&format!("  {} -> State {}\n", symbol, target));
            }
        }
        out
    }
}

/// Computes the closure of a seed item list.
///
/// For each item [A → α·Bβ] the closure pulls in every production of B. In
/// lookahead mode the synthesized items carry FIRST(β·a) for each lookahead
/// a of the source item, with ε dropped. The result merges lookaheads per
/// (production, dot) kernel key, emitting one item per key; the state that
/// takes ownership of the items sorts them into canonical order.
pub(crate) fn closure(grammar: &Grammar, seed: Vec<Item>, with_lookaheads: bool) -> Vec<Item> {
    let mut queue: VecDeque<Item> = seed.into();
    let mut done: Vec<Item> = Vec::new();

    while let Some(item) = queue.pop_front() {
        done.push(item.clone());
        if item.is_reducible(grammar) {
            continue;
        }
        let next_symbol = item.symbol_after_dot(grammar).unwrap();
        if !next_symbol.is_nonterminal() {
            continue;
        }

        let lookaheads = if with_lookaheads {
            let delta = &grammar.production(item.production_index()).rhs[item.dot_position() + 1..];
            let mut f = first_of_string(grammar, delta);
            if f.is_empty() || f.contains(&Symbol::Epsilon) {
                f.extend(item.lookaheads().iter().cloned());
            }
            f.remove(&Symbol::Epsilon);
            f
        } else {
            BTreeSet::new()
        };

        for &prod_id in grammar.prods_for(next_symbol) {
            let new_item = Item::new(prod_id, 0, lookaheads.clone());
            if !queue.contains(&new_item) && !done.contains(&new_item) {
                queue.push_back(new_item);
            }
        }
    }

    // Merge lookaheads per (production, dot) kernel key.
    let mut groups: IndexMap<(usize, usize), BTreeSet<Symbol>> = IndexMap::new();
    for item in &done {
        groups
            .entry(item.core())
            .or_default()
            .extend(item.lookaheads().iter().cloned());
    }
    groups
        .into_iter()
        .map(|((production, dot), lookaheads)| Item::new(production, dot, lookaheads))
        .collect()
}

/// Builds the automaton for the given variant.
///
/// The LR(0) family starts from [S' → ·S$] with no lookaheads; the LR(1)
/// family starts from the same item with lookahead {$}. LALR(1) builds the
/// LR(1) automaton and then merges states by core.
pub(crate) fn build(grammar: &Grammar, variant: Variant) -> Automaton {
    let with_lookaheads = variant.uses_lookaheads();
    let initial_item = Item::new(0, 0, variant.initial_lookaheads());
    let initial = State::new(closure(grammar, vec![initial_item], with_lookaheads));

    let mut states = vec![initial];
    let mut transitions: Vec<IndexMap<Symbol, usize>> = vec![IndexMap::new()];
    let mut worklist: VecDeque<usize> = VecDeque::from([0]);

    while let Some(state_id) = worklist.pop_front() {
        // Group the shift items by the symbol after the dot, advancing
        // each dot by one; every group seeds one successor state.
        let mut grouped: IndexMap<Symbol, Vec<Item>> = IndexMap::new();
        for item in states[state_id].shift_items(grammar) {
            let symbol = item.symbol_after_dot(grammar).unwrap().clone();
            grouped.entry(symbol).or_default().push(item.advanced());
        }

        for (symbol, kernel) in grouped {
            let candidate = State::new(closure(grammar, kernel, with_lookaheads));
            let target = match states.iter().position(|s| *s == candidate) {
                Some(existing) => existing,
                None => {
                    states.push(candidate);
                    transitions.push(IndexMap::new());
                    worklist.push_back(states.len() - 1);
                    states.len() - 1
                }
            };
            debug!("transition: {} --{}--> {}", state_id, symbol, target);
            transitions[state_id].insert(symbol, target);
        }
    }

    let automaton = Automaton {
        states,
        transitions,
    };
    if variant == Variant::Lalr1 {
        merge_by_core(automaton)
    } else {
        automaton
    }
}

/// Collapses LR(1) states with equal cores, unioning lookaheads item by
/// item, and rewrites state ids and transitions accordingly.
fn merge_by_core(automaton: Automaton) -> Automaton {
    let mut groups: IndexMap<Vec<(usize, usize)>, Vec<usize>> = IndexMap::new();
    for (id, state) in automaton.states.iter().enumerate() {
        groups.entry(state.core()).or_default().push(id);
    }

    let mut remap = vec![0usize; automaton.states.len()];
    for (new_id, members) in groups.values().enumerate() {
        for &old_id in members {
            remap[old_id] = new_id;
        }
    }

    let mut states = Vec::with_capacity(groups.len());
    for members in groups.values() {
        let mut merged = automaton.states[members[0]].clone();
        for &other in &members[1..] {
            merged.union_lookaheads(&automaton.states[other]);
        }
        states.push(merged);
    }
    debug!(
        "LALR merge: {} LR(1) states -> {} states",
        automaton.states.len(),
        states.len()
    );

    let mut transitions: Vec<IndexMap<Symbol, usize>> = vec![IndexMap::new(); states.len()];
    for (old_id, outgoing) in automaton.transitions.iter().enumerate() {
        for (symbol, &target) in outgoing {
            transitions[remap[old_id]].insert(symbol.clone(), remap[target]);
        }
    }

    Automaton {
        states,
        transitions,
    }
}
