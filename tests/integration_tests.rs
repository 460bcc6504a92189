//! End-to-end tests over complete build-and-parse flows

use lr_parser::parser::{LRParser, Variant};
use lr_parser::symbol::Symbol;
use lr_parser::table::Action;
use lr_parser::tree::ParseTree;

const EXPRESSION: [&str; 6] = [
    "E -> E + T",
    "E -> T",
    "T -> T * F",
    "T -> F",
    "F -> ( E )",
    "F -> id",
];

const DANGLING_ELSE: [&str; 8] = [
    "S -> M",
    "S -> U",
    "M -> if C then M else M",
    "M -> s",
    "U -> if C then S",
    "U -> if C then M else U",
    "C -> x",
    "C -> y",
];

fn leaf_names(tree: &ParseTree) -> Vec<String> {
    tree.leaves().iter().map(|s| s.to_string()).collect()
}

/// Classic expression grammar under LALR(1): the top-level reduction is
/// E -> E + T and the right operand subtree multiplies.
#[test]
fn test_expression_grammar_tree_shape() {
    let parser = LRParser::from_lines(Variant::Lalr1, EXPRESSION).unwrap();
    assert!(parser.is_valid());

    let tree = parser.parse(&["id", "+", "id", "*", "id"]).unwrap();
    assert_eq!(tree.symbol(), &Symbol::nonterminal("E"));
    // Production 1 is E -> E + T.
    assert_eq!(tree.production(), Some(1));

    let children = tree.children();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].symbol(), &Symbol::nonterminal("E"));
    assert_eq!(children[1].symbol(), &Symbol::terminal("+"));
    assert_eq!(children[2].symbol(), &Symbol::nonterminal("T"));
    // The right T reduces by T -> T * F, binding * tighter than +.
    assert_eq!(children[2].production(), Some(3));
}

/// Epsilon productions: the reduction by A -> ε stays visible as an ε child.
#[test]
fn test_epsilon_reduction_in_tree() {
    let lines = vec!["S -> A B", "A -> a", "A -> ''", "B -> b"];
    let parser = LRParser::from_lines(Variant::Slr1, lines).unwrap();
    assert!(parser.is_valid());

    let tree = parser.parse(&["b"]).unwrap();
    assert_eq!(tree.symbol(), &Symbol::nonterminal("S"));
    assert_eq!(tree.children().len(), 2);

    let a = &tree.children()[0];
    assert_eq!(a.symbol(), &Symbol::nonterminal("A"));
    // Production 3 is A -> ε.
    assert_eq!(a.production(), Some(3));
    assert_eq!(a.children().len(), 1);
    assert!(a.children()[0].symbol().is_epsilon());
    assert!(a.children()[0].children().is_empty());

    assert_eq!(leaf_names(&tree), ["b"]);
}

/// Augmentation on S -> a: production 0 is S' -> S $, the start state
/// shifts a and goes to the accepting after-S state on S.
#[test]
fn test_augmented_minimal_grammar() {
    let parser = LRParser::from_lines(Variant::Slr1, ["S -> a"]).unwrap();
    assert!(parser.is_valid());

    assert_eq!(parser.grammar().production(0).to_string(), "S' -> S $");

    let table = parser.parsing_table();
    assert!(matches!(
        table.action(0, &Symbol::terminal("a")),
        [Action::Shift(_)]
    ));
    let after_s = table.goto(0, &Symbol::nonterminal("S"))[0];
    assert_eq!(
        parser.automaton().transition(0, &Symbol::nonterminal("S")),
        Some(after_s)
    );
    assert!(parser.automaton().state(after_s).is_accepting(parser.grammar()));
    assert_eq!(table.action(after_s, &Symbol::EndMarker), &[Action::Accept]);

    let tree = parser.parse(&["a"]).unwrap();
    assert_eq!(tree.symbol(), &Symbol::nonterminal("S"));
    assert_eq!(tree.production(), Some(1));
    assert_eq!(leaf_names(&tree), ["a"]);
}

/// The unambiguous dangling-else grammar: LR(1) and LALR(1) both accept it,
/// merging loses no language.
#[test]
fn test_dangling_else_lr1_and_lalr1() {
    let lr1 = LRParser::from_lines(Variant::Lr1, DANGLING_ELSE).unwrap();
    let lalr = LRParser::from_lines(Variant::Lalr1, DANGLING_ELSE).unwrap();

    assert!(lr1.is_valid());
    assert!(lalr.is_valid(), "core merge must not introduce conflicts");
    assert!(lalr.automaton().states().len() < lr1.automaton().states().len());

    for input in [
        vec!["if", "x", "then", "s"],
        vec!["if", "x", "then", "if", "y", "then", "s", "else", "s"],
    ] {
        let lr1_tree = lr1.parse(&input).unwrap();
        let lalr_tree = lalr.parse(&input).unwrap();
        assert_eq!(leaf_names(&lr1_tree), input);
        assert_eq!(lr1_tree, lalr_tree, "merge must preserve derivations");
    }
}

/// The dangling else binds to the nearest if: the else-carrying reduction
/// happens in the inner statement.
#[test]
fn test_dangling_else_binds_inner() {
    let parser = LRParser::from_lines(Variant::Lalr1, DANGLING_ELSE).unwrap();
    let tree = parser
        .parse(&["if", "x", "then", "if", "y", "then", "s", "else", "s"])
        .unwrap();

    // Outer statement is the else-less U -> if C then S (production 5).
    let outer = &tree.children()[0];
    assert_eq!(outer.production(), Some(5));
    // Its trailing S wraps the matched inner M -> if C then M else M.
    let inner_s = outer.children().last().unwrap();
    let inner = &inner_s.children()[0];
    assert_eq!(inner.production(), Some(3));
}

/// One grammar across all four variants: every variant that accepts the
/// grammar parses the same input to the same leaves.
#[test]
fn test_variants_agree_on_accepted_input() {
    let input = vec!["id", "+", "id", "*", "id"];
    for variant in [Variant::Slr1, Variant::Lr1, Variant::Lalr1] {
        let parser = LRParser::from_lines(variant, EXPRESSION).unwrap();
        assert!(parser.is_valid(), "{} must accept the grammar", variant);
        let tree = parser.parse(&input).unwrap();
        assert_eq!(leaf_names(&tree), input, "{} parse mismatch", variant);
    }
}
