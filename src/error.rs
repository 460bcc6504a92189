//! Error types for the LR parser generator.

use crate::parser::Variant;
use thiserror::Error;

/// Errors that can occur during grammar construction, table building and
/// parsing.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("Invalid production format: {0}")]
    InvalidProduction(String),

    #[error("Empty grammar input")]
    EmptyInput,

    #[error("Reserved symbol {symbol} on the right-hand side of: {production}")]
    ReservedSymbol { symbol: String, production: String },

    #[error("Epsilon must be the only right-hand side symbol: {0}")]
    MisplacedEpsilon(String),

    #[error("Start augmentation collides with existing symbol {0}")]
    DuplicateAugmentation(String),

    #[error("Grammar is not {variant}: {conflicts} parsing-table cell(s) hold multiple entries")]
    InvalidForVariant { variant: Variant, conflicts: usize },

    #[error("No action for state {state} on lookahead {lookahead}")]
    ParseError { state: usize, lookahead: String },

    #[error("Parse stack exhausted while reducing by {production}")]
    CorruptStack { production: String },

    #[error("Unknown parser variant: {0}")]
    UnknownVariant(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, GrammarError>;
