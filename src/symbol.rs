//! Symbol types and utilities for context-free grammars.
//!
//! This module defines the core Symbol type used by the grammar, automaton
//! and parsing-table code. Symbol names are opaque strings; what makes a name
//! a terminal or a nonterminal is decided by the grammar that owns it.

use std::cmp::Ordering;
use std::fmt;

/// Represents a symbol in a context-free grammar.
///
/// # Grammar Conventions
/// - Nonterminals: names that appear on the left-hand side of some production
/// - Terminals: every other name appearing on a right-hand side
/// - Epsilon: the empty string, written `''` in grammar files
/// - EndMarker: the end-of-input marker `$`, reserved for the augmenting
///   production and the parse driver
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A terminal symbol.
    Terminal(String),
    /// A nonterminal symbol.
    Nonterminal(String),
    /// The empty string (ε).
    Epsilon,
    /// The end-of-input marker ($).
    EndMarker,
}

impl Symbol {
    /// Creates a terminal symbol from a name.
    pub fn terminal(name: impl Into<String>) -> Self {
        Symbol::Terminal(name.into())
    }

    /// Creates a nonterminal symbol from a name.
    pub fn nonterminal(name: impl Into<String>) -> Self {
        Symbol::Nonterminal(name.into())
    }

    /// Checks if this symbol is a terminal.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    /// Checks if this symbol is a nonterminal.
    #[inline]
    pub const fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }

    /// Checks if this symbol is epsilon (ε).
    #[inline]
    pub const fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    /// Checks if this symbol is the end marker ($).
    #[inline]
    pub const fn is_end_marker(&self) -> bool {
        matches!(self, Symbol::EndMarker)
    }

    /// Returns the name of this symbol, if it carries one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Symbol::Terminal(name) | Symbol::Nonterminal(name) => Some(name),
            Symbol::Epsilon | Symbol::EndMarker => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(name) | Symbol::Nonterminal(name) => write!(f, "{}", name),
            Symbol::Epsilon => write!(f, "ε"),
            Symbol::EndMarker => write!(f, "$"),
        }
    }
}

/// Custom ordering for symbols to ensure consistent sorting.
///
/// Order: Epsilon < Terminals < Nonterminals < EndMarker
impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Symbol::Epsilon, Symbol::Epsilon) => Ordering::Equal,
            (Symbol::Epsilon, _) => Ordering::Less,
            (_, Symbol::Epsilon) => Ordering::Greater,

            (Symbol::EndMarker, Symbol::EndMarker) => Ordering::Equal,
            (Symbol::EndMarker, _) => Ordering::Greater,
            (_, Symbol::EndMarker) => Ordering::Less,

            (Symbol::Terminal(n1), Symbol::Terminal(n2)) => n1.cmp(n2),
            (Symbol::Terminal(_), Symbol::Nonterminal(_)) => Ordering::Less,
            (Symbol::Nonterminal(_), Symbol::Terminal(_)) => Ordering::Greater,
            (Symbol::Nonterminal(n1), Symbol::Nonterminal(n2)) => n1.cmp(n2),
        }
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Joins a sequence of symbols into a display string.
pub fn symbols_to_string(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
