//! LR Parser Generator
//!
//! Builds LR(0), SLR(1), LR(1) or LALR(1) parsers for context-free grammars
//! and parses token sequences into concrete parse trees.
//!
//! # References
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools"
//! (2nd Edition). Addison-Wesley, 2006.

mod automaton;
mod cli;
mod error;
mod first_follow;
mod grammar;
mod item;
mod parser;
mod symbol;
mod table;
mod tree;

use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
