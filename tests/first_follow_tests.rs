//! Unit tests for nullable, FIRST and FOLLOW computation

use lr_parser::first_follow::first_of_string;
use lr_parser::grammar::Grammar;
use lr_parser::symbol::Symbol;
use std::collections::BTreeSet;

fn set(symbols: &[Symbol]) -> BTreeSet<Symbol> {
    symbols.iter().cloned().collect()
}

#[test]
fn test_first_of_terminal_is_itself() {
    let grammar = Grammar::from_lines(["S -> a b"]).unwrap();

    let first = first_of_string(&grammar, &[Symbol::terminal("a")]);
    assert_eq!(first, set(&[Symbol::terminal("a")]));

    let first = first_of_string(&grammar, &[Symbol::EndMarker]);
    assert_eq!(first, set(&[Symbol::EndMarker]));
}

#[test]
fn test_first_of_empty_string_is_empty() {
    let grammar = Grammar::from_lines(["S -> a"]).unwrap();
    assert!(first_of_string(&grammar, &[]).is_empty());
}

#[test]
fn test_first_of_epsilon_is_epsilon() {
    let grammar = Grammar::from_lines(["S -> ''"]).unwrap();
    let first = first_of_string(&grammar, &[Symbol::Epsilon]);
    assert_eq!(first, set(&[Symbol::Epsilon]));
}

#[test]
fn test_first_sets_expression_grammar() {
    let lines = vec![
        "E -> E + T",
        "E -> T",
        "T -> T * F",
        "T -> F",
        "F -> ( E )",
        "F -> id",
    ];

    let grammar = Grammar::from_lines(lines).unwrap();
    let expected = set(&[Symbol::terminal("("), Symbol::terminal("id")]);
    for nt in ["E", "T", "F"] {
        assert_eq!(
            grammar.first_set(&Symbol::nonterminal(nt)).unwrap(),
            &expected,
            "FIRST({}) mismatch",
            nt
        );
    }
}

#[test]
fn test_follow_sets_expression_grammar() {
    let lines = vec![
        "E -> E + T",
        "E -> T",
        "T -> T * F",
        "T -> F",
        "F -> ( E )",
        "F -> id",
    ];

    let grammar = Grammar::from_lines(lines).unwrap();
    let follow_e = set(&[
        Symbol::terminal("+"),
        Symbol::terminal(")"),
        Symbol::EndMarker,
    ]);
    let follow_t = set(&[
        Symbol::terminal("+"),
        Symbol::terminal("*"),
        Symbol::terminal(")"),
        Symbol::EndMarker,
    ]);
    assert_eq!(
        grammar.follow_set(&Symbol::nonterminal("E")).unwrap(),
        &follow_e
    );
    assert_eq!(
        grammar.follow_set(&Symbol::nonterminal("T")).unwrap(),
        &follow_t
    );
    assert_eq!(
        grammar.follow_set(&Symbol::nonterminal("F")).unwrap(),
        &follow_t
    );
}

#[test]
fn test_nullable_and_epsilon_in_first_agree() {
    let lines = vec!["S -> A B", "A -> a", "A -> ''", "B -> b"];

    let grammar = Grammar::from_lines(lines).unwrap();
    for (nt, data) in grammar.nonterminals() {
        assert_eq!(
            data.first.contains(&Symbol::Epsilon),
            grammar.nullable(nt),
            "ε ∈ FIRST({}) must match nullable({})",
            nt,
            nt
        );
    }
    assert!(grammar.nullable(&Symbol::nonterminal("A")));
    assert!(!grammar.nullable(&Symbol::nonterminal("S")));
    assert!(!grammar.nullable(&Symbol::nonterminal("B")));
}

#[test]
fn test_first_follow_with_epsilon_production() {
    let lines = vec!["S -> A B", "A -> a", "A -> ''", "B -> b"];

    let grammar = Grammar::from_lines(lines).unwrap();
    assert_eq!(
        grammar.first_set(&Symbol::nonterminal("S")).unwrap(),
        &set(&[Symbol::terminal("a"), Symbol::terminal("b")])
    );
    assert_eq!(
        grammar.follow_set(&Symbol::nonterminal("A")).unwrap(),
        &set(&[Symbol::terminal("b")])
    );
    assert_eq!(
        grammar.follow_set(&Symbol::nonterminal("B")).unwrap(),
        &set(&[Symbol::EndMarker])
    );
}

#[test]
fn test_nullable_through_chain() {
    let lines = vec!["S -> A x", "A -> B", "B -> ''"];

    let grammar = Grammar::from_lines(lines).unwrap();
    assert!(grammar.nullable(&Symbol::nonterminal("A")));
    assert!(grammar.nullable(&Symbol::nonterminal("B")));
    assert!(!grammar.nullable(&Symbol::nonterminal("S")));
    assert_eq!(
        grammar.first_set(&Symbol::nonterminal("S")).unwrap(),
        &set(&[Symbol::terminal("x")])
    );
}

#[test]
fn test_first_of_production_within_first_of_lhs() {
    let lines = vec![
        "E -> E + T",
        "E -> T",
        "T -> T * F",
        "T -> F",
        "F -> ( E )",
        "F -> id",
    ];

    let grammar = Grammar::from_lines(lines).unwrap();
    for prod in grammar.all_productions().iter().skip(1) {
        let rhs_first = first_of_string(&grammar, &prod.rhs);
        let mut bound = grammar.first_set(&prod.lhs).unwrap().clone();
        bound.insert(Symbol::Epsilon);
        assert!(
            rhs_first.is_subset(&bound),
            "FIRST(rhs of {}) must be within FIRST(lhs) ∪ {{ε}}",
            prod
        );
    }
}

#[test]
fn test_end_marker_seeded_for_trailing_occurrences() {
    // A trailing occurrence (or one before a nullable suffix) seeds $ into
    // FOLLOW even where the enclosing context alone would not put it there.
    let lines = vec!["S -> A b", "A -> a A", "A -> ''"];

    let grammar = Grammar::from_lines(lines).unwrap();
    let follow_a = grammar.follow_set(&Symbol::nonterminal("A")).unwrap();
    assert!(follow_a.contains(&Symbol::terminal("b")));
    assert!(follow_a.contains(&Symbol::EndMarker));
}
