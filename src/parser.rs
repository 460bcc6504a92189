//! LR parser construction and the shift-reduce driver.
//!
//! The four variants share the automaton and driver machinery and differ in
//! three places only: the initial item's lookaheads, whether closure
//! computes lookaheads, and the reduce-entry rule of the table builder. A
//! small variant tag is consulted at those branch points.

use crate::automaton::{self, Automaton};
use crate::error::{GrammarError, Result};
use crate::grammar::Grammar;
use crate::symbol::Symbol;
use crate::table::{Action, ParsingTable};
use crate::tree::ParseTree;
use log::{debug, info};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::str::FromStr;

/// The LR-family table-construction algorithm a parser is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Lr0,
    Slr1,
    Lr1,
    Lalr1,
}

impl Variant {
    /// Whether items of this variant carry lookahead sets.
    pub fn uses_lookaheads(self) -> bool {
        matches!(self, Variant::Lr1 | Variant::Lalr1)
    }

    /// Lookaheads of the initial item [S' → ·S$].
    pub(crate) fn initial_lookaheads(self) -> BTreeSet<Symbol> {
        if self.uses_lookaheads() {
            BTreeSet::from([Symbol::EndMarker])
        } else {
            BTreeSet::new()
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Lr0 => "LR(0)",
            Variant::Slr1 => "SLR(1)",
            Variant::Lr1 => "LR(1)",
            Variant::Lalr1 => "LALR(1)",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Variant {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lr0" | "lr(0)" => Ok(Variant::Lr0),
            "slr1" | "slr(1)" => Ok(Variant::Slr1),
            "lr1" | "lr(1)" => Ok(Variant::Lr1),
            "lalr1" | "lalr(1)" => Ok(Variant::Lalr1),
            _ => Err(GrammarError::UnknownVariant(s.to_string())),
        }
    }
}

/// An LR parser: grammar, automaton and parsing table, immutable once
/// built. Parsing never mutates the parser, so one instance can serve any
/// number of concurrent callers.
#[derive(Debug, Clone)]
pub struct LRParser {
    variant: Variant,
    grammar: Grammar,
    automaton: Automaton,
    table: ParsingTable,
}

impl LRParser {
    /// Builds a parser of the given variant over an analyzed grammar.
    ///
    /// Conflicts do not fail the build; they are recorded on the table and
    /// reported when `parse` is attempted.
    pub fn new(variant: Variant, grammar: Grammar) -> Self {
        let automaton = automaton::build(&grammar, variant);
        let table = ParsingTable::build(&grammar, &automaton, variant);
        Self {
            variant,
            grammar,
            automaton,
            table,
        }
    }

    /// Parses grammar production lines and builds a parser in one step.
    pub fn from_lines<I, S>(variant: Variant, lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::new(variant, Grammar::from_lines(lines)?))
    }

    /// The table-construction variant this parser was built with.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// The analyzed grammar.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// The state automaton.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// The ACTION/GOTO table.
    pub fn parsing_table(&self) -> &ParsingTable {
        &self.table
    }

    /// False iff the grammar is not parseable by the chosen variant.
    pub fn is_valid(&self) -> bool {
        self.table.is_valid()
    }

    /// Parses a token sequence into a concrete parse tree.
    ///
    /// Tokens are terminal names; `$` is appended when missing. Cells with
    /// several entries are resolved by taking the first one (stable; only
    /// reachable through a conflicted table). The driver aborts on the
    /// first error, there is no recovery.
    pub fn parse(&self, tokens: &[&str]) -> Result<ParseTree> {
        if !self.is_valid() {
            return Err(GrammarError::InvalidForVariant {
                variant: self.variant,
                conflicts: self.table.conflicts().len(),
            });
        }

        let mut input: VecDeque<Symbol> = tokens
            .iter()
            .map(|token| {
                if *token == "$" {
                    Symbol::EndMarker
                } else {
                    Symbol::terminal(*token)
                }
            })
            .collect();
        if input.back() != Some(&Symbol::EndMarker) {
            input.push_back(Symbol::EndMarker);
        }

        // Parallel stacks: states is always one longer than nodes.
        let mut states: Vec<usize> = vec![0];
        let mut nodes: Vec<ParseTree> = Vec::new();

        loop {
            let state = *states.last().unwrap();
            let lookahead = input.front().unwrap();
            let Some(entry) = self.table.action(state, lookahead).first() else {
                return Err(GrammarError::ParseError {
                    state,
                    lookahead: lookahead.to_string(),
                });
            };
            debug!("state = {}, lookahead = {}, entry = {}", state, lookahead, entry);

            match *entry {
                Action::Shift(next) => {
                    nodes.push(ParseTree::leaf(lookahead.clone()));
                    states.push(next);
                    input.pop_front();
                }
                Action::Reduce(prod_id) => {
                    let production = self.grammar.production(prod_id);
                    let mut node = ParseTree::new(production.lhs.clone(), Some(prod_id));
                    if production.is_epsilon() {
                        // Nothing to pop; the reduction stays visible as a
                        // single ε child.
                        node.push(ParseTree::leaf(Symbol::Epsilon));
                    } else {
                        let mut children = Vec::with_capacity(production.rhs.len());
                        for _ in 0..production.rhs.len() {
                            if states.len() <= 1 || nodes.is_empty() {
                                return Err(GrammarError::CorruptStack {
                                    production: production.to_string(),
                                });
                            }
                            states.pop();
                            children.push(nodes.pop().unwrap());
                        }
                        children.reverse();
                        for child in children {
                            node.push(child);
                        }
                    }

                    let top = *states.last().unwrap();
                    let Some(&target) = self.table.goto(top, &production.lhs).first() else {
                        return Err(GrammarError::ParseError {
                            state: top,
                            lookahead: production.lhs.to_string(),
                        });
                    };
                    nodes.push(node);
                    states.push(target);
                }
                Action::Accept => {
                    states.pop();
                    let Some(tree) = nodes.pop() else {
                        return Err(GrammarError::CorruptStack {
                            production: self.grammar.production(0).to_string(),
                        });
                    };
                    info!("parse successful");
                    return Ok(tree);
                }
            }
        }
    }
}
