//! ACTION/GOTO parsing-table construction.
//!
//! Cells are lists: the builders append every candidate entry and never
//! throw on collisions, so a conflicted table can still be inspected. A cell
//! with more than one entry marks the table (and the grammar, for the chosen
//! variant) invalid.

use crate::automaton::Automaton;
use crate::grammar::Grammar;
use crate::parser::Variant;
use crate::symbol::Symbol;
use indexmap::IndexMap;
use log::{info, warn};
use std::fmt;

/// A parsing-table action over a terminal column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Shift the lookahead and move to the given state.
    Shift(usize),
    /// Reduce by the production with the given index.
    Reduce(usize),
    /// Accept the input.
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "s{}", state),
            Action::Reduce(production) => write!(f, "r{}", production),
            Action::Accept => write!(f, "acc"),
        }
    }
}

/// The ACTION and GOTO tables of one parser, keyed by state id.
///
/// An absent cell is the error entry. Multi-entry cells are conflicts; they
/// are recorded in full and flip `is_valid`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsingTable {
    actions: Vec<IndexMap<Symbol, Vec<Action>>>,
    gotos: Vec<IndexMap<Symbol, Vec<usize>>>,
    is_valid: bool,
}

impl ParsingTable {
    /// Populates the table from the automaton for the given variant.
    ///
    /// Reduce entries first (their rule is the variant-specific part), then
    /// the shift/goto entries shared by all variants, so a conflicted cell
    /// lists reduces before the shift.
    pub(crate) fn build(grammar: &Grammar, automaton: &Automaton, variant: Variant) -> Self {
        let state_count = automaton.states().len();
        let mut table = Self {
            actions: vec![IndexMap::new(); state_count],
            gotos: vec![IndexMap::new(); state_count],
            is_valid: true,
        };

        for (state_id, state) in automaton.states().iter().enumerate() {
            for item in state.reduce_items(grammar) {
                if item.is_accepting(grammar) {
                    table.push_action(state_id, Symbol::EndMarker, Action::Accept);
                    continue;
                }
                let entry = Action::Reduce(item.production_index());
                match variant {
                    Variant::Lr0 => {
                        // LR(0) has no lookahead at all: fill every
                        // terminal column of the alphabet.
                        for terminal in grammar.terminals() {
                            table.push_action(state_id, terminal.clone(), entry);
                        }
                    }
                    Variant::Slr1 => {
                        let lhs = &grammar.production(item.production_index()).lhs;
                        let follow = grammar.follow_set(lhs).cloned().unwrap_or_default();
                        for terminal in follow {
                            table.push_action(state_id, terminal, entry);
                        }
                    }
                    Variant::Lr1 | Variant::Lalr1 => {
                        for terminal in item.lookaheads().clone() {
                            table.push_action(state_id, terminal, entry);
                        }
                    }
                }
            }
        }

        for (state_id, outgoing) in automaton.transitions().iter().enumerate() {
            for (symbol, &target) in outgoing {
                if symbol.is_nonterminal() {
                    table.push_goto(state_id, symbol.clone(), target);
                } else {
                    table.push_action(state_id, symbol.clone(), Action::Shift(target));
                }
            }
        }

        if table.is_valid {
            info!("{} parsing table built successfully", variant);
        } else {
            warn!("Grammar is not {}", variant);
        }
        table
    }

    fn push_action(&mut self, state: usize, symbol: Symbol, action: Action) {
        let cell = self.actions[state].entry(symbol).or_default();
        cell.push(action);
        if cell.len() > 1 {
            self.is_valid = false;
        }
    }

    fn push_goto(&mut self, state: usize, symbol: Symbol, target: usize) {
        let cell = self.gotos[state].entry(symbol).or_default();
        cell.push(target);
        if cell.len() > 1 {
            self.is_valid = false;
        }
    }

    /// False iff some ACTION/GOTO cell holds more than one entry.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// The ACTION entries for (state, terminal); empty means error.
    pub fn action(&self, state: usize, terminal: &Symbol) -> &[Action] {
        self.actions[state]
            .get(terminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The GOTO entries for (state, nonterminal); empty means error.
    pub fn goto(&self, state: usize, nonterminal: &Symbol) -> &[usize] {
        self.gotos[state]
            .get(nonterminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Per-state ACTION cell maps, indexed by state id.
    pub fn actions(&self) -> &[IndexMap<Symbol, Vec<Action>>] {
        &self.actions
    }

    /// Per-state GOTO cell maps, indexed by state id.
    pub fn gotos(&self) -> &[IndexMap<Symbol, Vec<usize>>] {
        &self.gotos
    }

    /// Every conflicted ACTION cell as (state, terminal, entries).
    pub fn conflicts(&self) -> Vec<(usize, Symbol, Vec<Action>)> {
        let mut ret = Vec::new();
        for (state_id, cells) in self.actions.iter().enumerate() {
            for (symbol, entries) in cells {
                if entries.len() > 1 {
                    ret.push((state_id, symbol.clone(), entries.clone()));
                }
            }
        }
        ret
    }
}

impl fmt::Display for ParsingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state_id in 0..self.actions.len() {
            write!(f, "state {}:", state_id)?;
            for (symbol, entries) in &self.actions[state_id] {
                let rendered: Vec<String> = entries.iter().map(|a| a.to_string()).collect();
                write!(f, "  {}:{}", symbol, rendered.join("/"))?;
            }
            for (symbol, targets) in &self.gotos[state_id] {
                let rendered: Vec<String> = targets.iter().map(|t| t.to_string()).collect();
                write!(f, "  {}:{}", symbol, rendered.join("/"))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
