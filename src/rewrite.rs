use std::collections::BTreeSet;

use crate::grammar::{Grammar, Production};
use crate::symbol::Symbol;

/// Eliminate left recursion, both immediate and indirect (Paull's
/// algorithm).
///
/// Nonterminals are processed in order of first appearance. For the i-th
/// nonterminal `Aᵢ`, every production `Aᵢ -> Aⱼ γ` with j < i is first
/// replaced by `Aᵢ -> δ γ` for each current alternative `Aⱼ -> δ`; the
/// immediate left recursion that remains is then rewritten through a fresh
/// tail nonterminal:
///
/// ```text
/// A -> A α | β        becomes        A -> β A_tail
///                                    A_tail -> α A_tail
///                                    A_tail -> ε
/// ```
///
/// Output productions stay grouped by nonterminal in first-appearance
/// order, so the start symbol survives the rewrite.
pub fn remove_left_recursion(grammar: &Grammar) -> Grammar {
    let order = appearance_order(grammar);
    let mut taken: BTreeSet<Symbol> = grammar.symbols();

    // Working alternatives per nonterminal, updated as substitution and
    // tail-splitting proceed.
    let mut blocks: Vec<(Symbol, Vec<Vec<Symbol>>)> = order
        .iter()
        .map(|nt| {
            let alts = grammar
                .iter_by_lhs(nt)
                .map(|(_, p)| p.rhs.clone())
                .collect();
            (nt.clone(), alts)
        })
        .collect();

    let mut productions = Vec::new();
    for i in 0..blocks.len() {
        // Substitute earlier nonterminals out of leading position.
        for j in 0..i {
            let (earlier, earlier_alts) = blocks[j].clone();
            let alts = std::mem::take(&mut blocks[i].1);
            blocks[i].1 = alts
                .into_iter()
                .flat_map(|rhs| {
                    if rhs.first() == Some(&earlier) {
                        earlier_alts
                            .iter()
                            .map(|delta| {
                                let mut expanded = delta.clone();
                                expanded.extend(rhs[1..].iter().cloned());
                                expanded
                            })
                            .collect()
                    } else {
                        vec![rhs]
                    }
                })
                .collect();
        }

        let (nt, alts) = blocks[i].clone();
        let (recursive, rest): (Vec<Vec<Symbol>>, Vec<Vec<Symbol>>) = alts
            .into_iter()
            .partition(|rhs| rhs.first() == Some(&nt));

        if recursive.is_empty() {
            blocks[i].1 = rest.clone();
            productions.extend(rest.into_iter().map(|rhs| Production::new(nt.clone(), rhs)));
            continue;
        }

        let tail = fresh_tail(&nt, &mut taken);
        let mut rewritten = Vec::new();
        for rhs in &rest {
            let mut with_tail = rhs.clone();
            with_tail.push(tail.clone());
            productions.push(Production::new(nt.clone(), with_tail.clone()));
            rewritten.push(with_tail);
        }
        blocks[i].1 = rewritten;

        for rhs in recursive {
            // The leading nonterminal is dropped; the remainder recurses on
            // the right instead.
            let mut alpha: Vec<Symbol> = rhs[1..].to_vec();
            alpha.push(tail.clone());
            productions.push(Production::new(tail.clone(), alpha));
        }
        productions.push(Production::new(tail.clone(), Vec::new()));
    }

    Grammar::new(productions)
}

fn appearance_order(grammar: &Grammar) -> Vec<Symbol> {
    let mut seen = BTreeSet::new();
    let mut order = Vec::new();
    for p in grammar.iter() {
        if seen.insert(p.lhs.clone()) {
            order.push(p.lhs.clone());
        }
    }
    order
}

fn fresh_tail(nt: &Symbol, taken: &mut BTreeSet<Symbol>) -> Symbol {
    let base = format!("{}_tail", nt.as_str());
    let mut candidate = base.clone();
    let mut counter = 0;
    while taken.contains(candidate.as_str()) {
        counter += 1;
        candidate = format!("{base}{counter}");
    }
    let tail = Symbol::new(candidate);
    taken.insert(tail.clone());
    tail
}
