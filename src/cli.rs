//! CLI module for the parser generator application.

use crate::error::Result;
use crate::grammar::Grammar;
use crate::parser::{LRParser, Variant};
use std::env;
use std::fs;
use std::io::{self, BufRead};

/// Main CLI runner.
///
/// Usage: `lr_parser <grammar-file> [variant]` where variant is one of
/// `lr0`, `slr1`, `lr1`, `lalr1` (default `lalr1`). Token lines are read
/// from stdin until EOF or a blank line; tokens are whitespace-separated
/// terminal names.
pub fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let path = args.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "usage: lr_parser <grammar-file> [lr0|slr1|lr1|lalr1]",
        )
    })?;
    let variant: Variant = match args.next() {
        Some(name) => name.parse()?,
        None => Variant::Lalr1,
    };

    let source = fs::read_to_string(&path)?;
    let grammar = Grammar::from_lines(source.lines())?;

    println!("{}", grammar);
    for (nt, data) in grammar.nonterminals() {
        let first: Vec<String> = data.first.iter().map(|s| s.to_string()).collect();
        let follow: Vec<String> = data.follow.iter().map(|s| s.to_string()).collect();
        println!(
            "FIRST({}) = {{{}}}  FOLLOW({}) = {{{}}}",
            nt,
            first.join(", "),
            nt,
            follow.join(", ")
        );
    }

    let parser = LRParser::new(variant, grammar);
    println!(
        "{} automaton: {} states",
        variant,
        parser.automaton().states().len()
    );

    if !parser.is_valid() {
        println!("Grammar is not {}.", variant);
        for (state, symbol, entries) in parser.parsing_table().conflicts() {
            let rendered: Vec<String> = entries.iter().map(|a| a.to_string()).collect();
            println!(
                "  conflict at state {}, symbol {}: {}",
                state,
                symbol,
                rendered.join("/")
            );
        }
        return Ok(());
    }
    println!("Grammar is {}.", variant);

    parse_lines(&parser)
}

/// Parses stdin token lines until EOF or an empty line.
fn parse_lines(parser: &LRParser) -> Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        match parser.parse(&tokens) {
            Ok(tree) => {
                println!("yes");
                tree.print()?;
            }
            Err(e) => println!("no: {}", e),
        }
    }

    Ok(())
}
