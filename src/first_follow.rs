//! Nullable, FIRST and FOLLOW computation for context-free grammars.
//!
//! This module implements algorithms from Aho et al., "Compilers: Principles,
//! Techniques, and Tools" (2nd Edition), section 4.4, as fixed-point
//! iterations over the grammar. All passes detect "no change in a full scan"
//! rather than bounding the iteration count.

use crate::grammar::Grammar;
use crate::symbol::Symbol;
use log::debug;
use std::collections::BTreeSet;

/// Computes the FIRST set of a single symbol.
///
/// FIRST(a) = {a} for terminals and the end marker, FIRST(ε) = {ε};
/// nonterminals use the set stored on the grammar (possibly still growing
/// during the fixpoint).
fn first_of_symbol(grammar: &Grammar, symbol: &Symbol) -> BTreeSet<Symbol> {
    match symbol {
        Symbol::Terminal(_) | Symbol::EndMarker => BTreeSet::from([symbol.clone()]),
        Symbol::Epsilon => BTreeSet::from([Symbol::Epsilon]),
        Symbol::Nonterminal(_) => grammar
            .first_set(symbol)
            .cloned()
            .unwrap_or_default(),
    }
}

/// Computes the FIRST set of a string (sequence of symbols).
///
/// # Algorithm
/// - FIRST(empty) = ∅
/// - Add FIRST(X₁) - {ε} to the result
/// - While ε ∈ FIRST(Xᵢ), add FIRST(Xᵢ₊₁) - {ε}
/// - If ε ∈ FIRST(Xᵢ) for all i, add ε to the result
pub fn first_of_string(grammar: &Grammar, symbols: &[Symbol]) -> BTreeSet<Symbol> {
    let mut result = BTreeSet::new();
    if symbols.is_empty() {
        return result;
    }

    let mut derives_epsilon = true;
    for symbol in symbols {
        if !derives_epsilon {
            break;
        }
        let first_sym = first_of_symbol(grammar, symbol);
        derives_epsilon = first_sym.contains(&Symbol::Epsilon);
        result.extend(first_sym.into_iter().filter(|s| !s.is_epsilon()));
    }

    if derives_epsilon {
        result.insert(Symbol::Epsilon);
    }
    result
}

/// Computes the FIRST sets of all nonterminals.
///
/// Fixed-point iteration: for every production A → α, union FIRST(α) into
/// FIRST(A) until a full pass makes no change.
pub(crate) fn compute_first_sets(grammar: &mut Grammar) {
    let mut changed = true;
    while changed {
        changed = false;

        for i in 0..grammar.prods.len() {
            let lhs = grammar.prods[i].lhs.clone();
            let rhs = grammar.prods[i].rhs.clone();
            let rhs_first = first_of_string(grammar, &rhs);

            let data = grammar.nonterminals.get_mut(&lhs).unwrap();
            let before = data.first.len();
            data.first.extend(rhs_first);
            if data.first.len() != before {
                changed = true;
            }
        }
    }
}

/// Computes the nullable flag of every nonterminal.
///
/// A is nullable iff it has a production A → ε, or some production
/// A → Y₁…Yₖ where every Yᵢ is a nullable nonterminal. After the fixpoint,
/// ε ∈ FIRST(A) ⇔ nullable(A) is enforced on the stored FIRST sets.
pub(crate) fn compute_nullable(grammar: &mut Grammar) {
    for i in 0..grammar.prods.len() {
        if grammar.prods[i].is_epsilon() {
            let lhs = grammar.prods[i].lhs.clone();
            grammar.nonterminals.get_mut(&lhs).unwrap().nullable = true;
        }
    }

    let mut changed = true;
    while changed {
        changed = false;
        for i in 0..grammar.prods.len() {
            let lhs = grammar.prods[i].lhs.clone();
            if grammar.nullable(&lhs) {
                continue;
            }
            let all_nullable = grammar.prods[i]
                .rhs
                .iter()
                .all(|s| s.is_nonterminal() && grammar.nullable(s));
            if all_nullable {
                grammar.nonterminals.get_mut(&lhs).unwrap().nullable = true;
                changed = true;
            }
        }
    }

    for data in grammar.nonterminals.values_mut() {
        if data.nullable {
            data.first.insert(Symbol::Epsilon);
        } else {
            data.first.remove(&Symbol::Epsilon);
        }
    }
}

/// Computes the FOLLOW sets of all nonterminals.
///
/// # Algorithm
/// Two phases. The seed pass records what can immediately follow each
/// occurrence of a nonterminal: for A → α B β, FIRST(β) - {ε} goes into
/// FOLLOW(B), with `$` added when β is empty or nullable. The propagation
/// pass then lets suffix nonterminals inherit FOLLOW of the enclosing LHS,
/// scanning each right-hand side right-to-left while the suffix stays
/// nullable, iterated until a full pass makes no change.
pub(crate) fn compute_follow_sets(grammar: &mut Grammar) {
    let augmented = grammar.augmented_start().clone();
    grammar
        .nonterminals
        .get_mut(&augmented)
        .unwrap()
        .follow
        .insert(Symbol::EndMarker);

    // Seed pass.
    let nts: Vec<Symbol> = grammar.nonterminals.keys().cloned().collect();
    for nt in &nts {
        let occurrences = grammar.nonterminals.get(nt).unwrap().prods_rhs.clone();
        let mut seed = BTreeSet::new();
        for (prodno, idx) in occurrences {
            let beta = grammar.prods[prodno].rhs[idx + 1..].to_vec();
            let mut f = first_of_string(grammar, &beta);
            if f.is_empty() || f.contains(&Symbol::Epsilon) {
                f.insert(Symbol::EndMarker);
            }
            f.remove(&Symbol::Epsilon);
            seed.extend(f);
        }
        let data = grammar.nonterminals.get_mut(nt).unwrap();
        data.follow.extend(seed);
        debug!("seeded FOLLOW({}) = {:?}", nt, data.follow);
    }

    // Propagation pass.
    let mut changed = true;
    while changed {
        changed = false;
        for i in 0..grammar.prods.len() {
            let lhs = grammar.prods[i].lhs.clone();
            let rhs = grammar.prods[i].rhs.clone();
            let follow_lhs: BTreeSet<Symbol> =
                grammar.nonterminals.get(&lhs).unwrap().follow.clone();

            for sym in rhs.iter().rev() {
                if !sym.is_nonterminal() {
                    break;
                }
                let data = grammar.nonterminals.get_mut(sym).unwrap();
                let before = data.follow.len();
                data.follow.extend(follow_lhs.iter().cloned());
                if data.follow.len() != before {
                    changed = true;
                }
                if !grammar.nullable(sym) {
                    break;
                }
            }
        }
    }
}
