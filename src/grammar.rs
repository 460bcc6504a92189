//! Grammar module for context-free grammars.
//!
//! This module provides the production store and the symbol classification
//! logic: a name is a nonterminal iff it appears on the left-hand side of
//! some production, everything else on a right-hand side is a terminal.
//! Construction augments the grammar with `S' -> start $` as production 0
//! and precomputes the nullable flags and FIRST/FOLLOW sets.

use crate::error::{GrammarError, Result};
use crate::first_follow;
use crate::symbol::{symbols_to_string, Symbol};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;

/// Name of the synthesized start symbol of the augmented grammar.
pub const AUGMENTED_START: &str = "S'";

/// Spelling of epsilon in grammar files.
const EPSILON_TOKEN: &str = "''";

/// A production rule in a context-free grammar.
///
/// Represents a rule of the form: LHS → RHS
/// where LHS is a single nonterminal and RHS is a sequence of symbols.
/// A production A → ε carries epsilon as the sole right-hand side symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    /// Left-hand side (always a nonterminal)
    pub lhs: Symbol,
    /// Right-hand side (sequence of symbols)
    pub rhs: Vec<Symbol>,
}

impl Production {
    /// Creates a new production.
    pub fn new(lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Self { lhs, rhs }
    }

    /// Checks whether this is an epsilon production (rhs = [ε]).
    pub fn is_epsilon(&self) -> bool {
        self.rhs.len() == 1 && self.rhs[0].is_epsilon()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.lhs, symbols_to_string(&self.rhs))
    }
}

/// Per-nonterminal bookkeeping: where the nonterminal occurs and the
/// analysis results attached to it.
#[derive(Debug, Clone, Default)]
pub struct NonterminalData {
    /// Indices of the productions this nonterminal is the LHS of.
    pub prods_lhs: Vec<usize>,
    /// Occurrences on right-hand sides as (production index, position).
    pub prods_rhs: Vec<(usize, usize)>,
    /// Whether the nonterminal derives the empty string.
    pub nullable: bool,
    /// FIRST set (contains ε iff nullable).
    pub first: BTreeSet<Symbol>,
    /// FOLLOW set (terminals only).
    pub follow: BTreeSet<Symbol>,
}

/// A context-free grammar, augmented and analyzed.
///
/// Immutable after construction. Production 0 is always the synthesized
/// `S' -> start $`.
#[derive(Debug, Clone)]
pub struct Grammar {
    /// All productions, augmenting production first.
    pub(crate) prods: Vec<Production>,
    /// Nonterminal registry in first-LHS-appearance order (S' first).
    pub(crate) nonterminals: IndexMap<Symbol, NonterminalData>,
    /// Sorted terminal alphabet; always contains $, never ε.
    pub(crate) terminals: BTreeSet<Symbol>,
}

impl Grammar {
    /// Parses a grammar from production lines.
    ///
    /// # Format
    /// One production per line, `LHS -> SYM SYM SYM`, whitespace separating
    /// the right-hand side symbols. Blank lines are skipped. A right-hand
    /// side consisting of the single token `''` denotes ε. The first
    /// production's LHS becomes the start symbol.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut raw: Vec<(String, Vec<String>)> = Vec::new();
        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            raw.push(Self::parse_production_line(line)?);
        }
        if raw.is_empty() {
            return Err(GrammarError::EmptyInput);
        }

        // Names on the LHS are the nonterminals; everything else is a
        // terminal. The augmented name must still be free.
        let lhs_names: BTreeSet<&str> = raw.iter().map(|(lhs, _)| lhs.as_str()).collect();
        if lhs_names.contains(AUGMENTED_START)
            || raw
                .iter()
                .any(|(_, rhs)| rhs.iter().any(|t| t == AUGMENTED_START))
        {
            return Err(GrammarError::DuplicateAugmentation(
                AUGMENTED_START.to_string(),
            ));
        }

        let mut prods = Vec::with_capacity(raw.len() + 1);
        for (lhs, rhs_tokens) in &raw {
            let rhs: Vec<Symbol> = rhs_tokens
                .iter()
                .map(|token| {
                    if token == EPSILON_TOKEN {
                        Symbol::Epsilon
                    } else if lhs_names.contains(token.as_str()) {
                        Symbol::nonterminal(token.clone())
                    } else {
                        Symbol::terminal(token.clone())
                    }
                })
                .collect();
            let prod = Production::new(Symbol::nonterminal(lhs.clone()), rhs);
            if prod.rhs.iter().any(Symbol::is_epsilon) && prod.rhs.len() > 1 {
                return Err(GrammarError::MisplacedEpsilon(prod.to_string()));
            }
            prods.push(prod);
        }

        // Augment the grammar with S' -> start $.
        let start = prods[0].lhs.clone();
        prods.insert(
            0,
            Production::new(
                Symbol::nonterminal(AUGMENTED_START),
                vec![start, Symbol::EndMarker],
            ),
        );

        let mut grammar = Self {
            prods,
            nonterminals: IndexMap::new(),
            terminals: BTreeSet::new(),
        };
        grammar.index_symbols();
        first_follow::compute_first_sets(&mut grammar);
        first_follow::compute_nullable(&mut grammar);
        first_follow::compute_follow_sets(&mut grammar);
        Ok(grammar)
    }

    /// Parses a single production line into raw LHS/RHS tokens.
    fn parse_production_line(line: &str) -> Result<(String, Vec<String>)> {
        let Some((lhs, rhs)) = line.split_once("->") else {
            return Err(GrammarError::InvalidProduction(line.to_string()));
        };
        let lhs = lhs.trim();
        if lhs.is_empty() || lhs.split_whitespace().count() != 1 {
            return Err(GrammarError::InvalidProduction(line.to_string()));
        }
        if lhs == EPSILON_TOKEN || lhs == "$" {
            return Err(GrammarError::InvalidProduction(line.to_string()));
        }
        let rhs: Vec<String> = rhs.split_whitespace().map(str::to_string).collect();
        if rhs.is_empty() {
            return Err(GrammarError::InvalidProduction(line.to_string()));
        }
        if let Some(reserved) = rhs.iter().find(|t| *t == "$") {
            return Err(GrammarError::ReservedSymbol {
                symbol: reserved.clone(),
                production: line.to_string(),
            });
        }
        Ok((lhs.to_string(), rhs))
    }

    /// Builds the nonterminal registry, occurrence index and terminal set.
    fn index_symbols(&mut self) {
        for (i, prod) in self.prods.iter().enumerate() {
            self.nonterminals
                .entry(prod.lhs.clone())
                .or_default()
                .prods_lhs
                .push(i);
        }
        for (i, prod) in self.prods.iter().enumerate() {
            for (pos, sym) in prod.rhs.iter().enumerate() {
                match sym {
                    Symbol::Nonterminal(_) => {
                        self.nonterminals
                            .get_mut(sym)
                            .expect("rhs nonterminal without productions")
                            .prods_rhs
                            .push((i, pos));
                    }
                    Symbol::Terminal(_) => {
                        self.terminals.insert(sym.clone());
                    }
                    Symbol::Epsilon | Symbol::EndMarker => {}
                }
            }
        }
        self.terminals.insert(Symbol::EndMarker);
    }

    /// Returns all productions, augmenting production first.
    pub fn all_productions(&self) -> &[Production] {
        &self.prods
    }

    /// Returns the production with the given index.
    pub fn production(&self, index: usize) -> &Production {
        &self.prods[index]
    }

    /// Returns the indices of the productions with the given LHS.
    pub fn prods_for(&self, nt: &Symbol) -> &[usize] {
        self.nonterminals
            .get(nt)
            .map(|data| data.prods_lhs.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the nonterminal registry in declaration order.
    pub fn nonterminals(&self) -> &IndexMap<Symbol, NonterminalData> {
        &self.nonterminals
    }

    /// Returns the sorted terminal alphabet (includes $).
    pub fn terminals(&self) -> &BTreeSet<Symbol> {
        &self.terminals
    }

    /// Returns the start symbol of the original grammar.
    pub fn start_symbol(&self) -> &Symbol {
        &self.prods[0].rhs[0]
    }

    /// Returns the synthesized start symbol of the augmented grammar.
    pub fn augmented_start(&self) -> &Symbol {
        &self.prods[0].lhs
    }

    /// Checks whether the given nonterminal derives the empty string.
    pub fn nullable(&self, nt: &Symbol) -> bool {
        self.nonterminals.get(nt).is_some_and(|data| data.nullable)
    }

    /// Returns the FIRST set of a nonterminal.
    pub fn first_set(&self, nt: &Symbol) -> Option<&BTreeSet<Symbol>> {
        self.nonterminals.get(nt).map(|data| &data.first)
    }

    /// Returns the FOLLOW set of a nonterminal.
    pub fn follow_set(&self, nt: &Symbol) -> Option<&BTreeSet<Symbol>> {
        self.nonterminals.get(nt).map(|data| &data.follow)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prod in &self.prods {
            writeln!(f, "{}", prod)?;
        }
        Ok(())
    }
}
