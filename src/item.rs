//! LR items and item-set states.
//!
//! An item is a production with a dot marking parsing progress, optionally
//! carrying lookahead terminals. A state is the closed set of items the
//! automaton builder produced for one point of the parse.

use crate::grammar::Grammar;
use crate::symbol::Symbol;
use std::collections::BTreeSet;

/// An LR item: (production index, dot position, lookahead set).
///
/// The lookahead set is empty for the LR(0) family and kept sorted so that
/// item and state equality are structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    production: usize,
    dot: usize,
    lookaheads: BTreeSet<Symbol>,
}

impl Item {
    pub(crate) fn new(production: usize, dot: usize, lookaheads: BTreeSet<Symbol>) -> Self {
        Self {
            production,
            dot,
            lookaheads,
        }
    }

    /// Index of the item's production in the grammar.
    pub fn production_index(&self) -> usize {
        self.production
    }

    /// Position of the dot within the right-hand side.
    pub fn dot_position(&self) -> usize {
        self.dot
    }

    /// The item's lookahead terminals, in sorted order.
    pub fn lookaheads(&self) -> &BTreeSet<Symbol> {
        &self.lookaheads
    }

    /// The item projected to (production, dot), discarding lookaheads.
    pub fn core(&self) -> (usize, usize) {
        (self.production, self.dot)
    }

    /// Returns the symbol immediately after the dot, if any.
    pub fn symbol_after_dot<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        grammar.production(self.production).rhs.get(self.dot)
    }

    /// Checks if this is a reduce item.
    ///
    /// The dot sitting in front of `$` or ε also counts: both are terminal
    /// stopping conditions the automaton never shifts over.
    pub fn is_reducible(&self, grammar: &Grammar) -> bool {
        match self.symbol_after_dot(grammar) {
            None => true,
            Some(sym) => sym.is_end_marker() || sym.is_epsilon(),
        }
    }

    /// Checks if this is the accepting item (reducible, rhs ends in `$`).
    pub fn is_accepting(&self, grammar: &Grammar) -> bool {
        self.is_reducible(grammar)
            && grammar
                .production(self.production)
                .rhs
                .last()
                .is_some_and(Symbol::is_end_marker)
    }

    /// Returns a copy of this item with the dot advanced by one.
    pub(crate) fn advanced(&self) -> Self {
        Self {
            production: self.production,
            dot: self.dot + 1,
            lookaheads: self.lookaheads.clone(),
        }
    }

    pub(crate) fn extend_lookaheads(&mut self, other: &Item) {
        self.lookaheads.extend(other.lookaheads.iter().cloned());
    }

    /// Renders the item in dotted notation, e.g. `E -> E + · T, +/$`.
    pub fn display(&self, grammar: &Grammar) -> String {
        let prod = grammar.production(self.production);
        let mut parts: Vec<String> = vec![prod.lhs.to_string(), "->".to_string()];
        for (i, sym) in prod.rhs.iter().enumerate() {
            if i == self.dot {
                parts.push("·".to_string());
            }
            parts.push(sym.to_string());
        }
        if self.dot == prod.rhs.len() {
            parts.push("·".to_string());
        }
        let mut ret = parts.join(" ");
        if !self.lookaheads.is_empty() {
            let las: Vec<String> = self.lookaheads.iter().map(|s| s.to_string()).collect();
            ret.push_str(&format!(", {}", las.join("/")));
        }
        ret
    }
}

/// A state of the LR automaton: an item set, kept sorted by
/// (production, dot) so display order, structural equality and the LALR
/// core key are all canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    items: Vec<Item>,
}

impl State {
    pub(crate) fn new(mut items: Vec<Item>) -> Self {
        items.sort_unstable_by_key(Item::core);
        Self { items }
    }

    /// The state's items, sorted by (production, dot).
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The kernel: items with the dot past position 0, plus the initial
    /// item of the augmenting production.
    pub fn kernel(&self) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| item.dot_position() > 0 || item.production_index() == 0)
            .collect()
    }

    /// The core: items projected to (production, dot), in the state's
    /// canonical (sorted) order.
    pub fn core(&self) -> Vec<(usize, usize)> {
        self.items.iter().map(Item::core).collect()
    }

    /// Checks whether any item of the state is the accepting item.
    pub fn is_accepting(&self, grammar: &Grammar) -> bool {
        self.items.iter().any(|item| item.is_accepting(grammar))
    }

    /// The state's reduce items.
    pub fn reduce_items<'s>(&'s self, grammar: &'s Grammar) -> Vec<&'s Item> {
        self.items
            .iter()
            .filter(|item| item.is_reducible(grammar))
            .collect()
    }

    /// The state's shift items.
    pub fn shift_items<'s>(&'s self, grammar: &'s Grammar) -> Vec<&'s Item> {
        self.items
            .iter()
            .filter(|item| !item.is_reducible(grammar))
            .collect()
    }

    /// Unions another state's lookaheads into this one, position by
    /// position. Both states must share the same core; the canonical item
    /// order makes the positional zip line up.
    pub(crate) fn union_lookaheads(&mut self, other: &State) {
        debug_assert_eq!(self.core(), other.core());
        for (item, other_item) in self.items.iter_mut().zip(&other.items) {
            item.extend_lookaheads(other_item);
        }
    }

    /// Renders the state, one item per line.
    pub fn display(&self, grammar: &Grammar) -> String {
        self.items
            .iter()
            .map(|item| item.display(grammar))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
