use std::collections::BTreeMap;

use crate::first::FirstSets;
use crate::grammar::Grammar;
use crate::symbol::{Symbol, SymbolSet};

/// Which symbols accumulate FOLLOW entries.
///
/// The two textbook definitions agree on nonterminals; they differ in
/// whether terminals get FOLLOW sets at all. `Nonterminals` is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FollowScope {
    #[default]
    Nonterminals,
    AllSymbols,
}

/// FOLLOW sets: every terminal that may appear immediately after a symbol
/// in some sentential form derived from the start symbol.
///
/// ε is never a member. The start symbol gets no implicit end-of-input
/// marker; grammars that want one spell it out, e.g. `Goal -> Expr eof`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets {
    scope: FollowScope,
    sets: BTreeMap<Symbol, SymbolSet>,
}

impl FollowSets {
    /// Trailer walk to a fixed point. For each production `A -> X₁…Xₙ` the
    /// trailer starts as `FOLLOW[A]`; scanning right to left, each tracked
    /// `Xᵢ` absorbs the trailer, which then becomes `FIRST[Xᵢ]` (or grows
    /// by `FIRST[Xᵢ] \ {ε}` when `Xᵢ` can vanish).
    pub fn compute(grammar: &Grammar, firsts: &FirstSets, scope: FollowScope) -> Self {
        let mut sets: BTreeMap<Symbol, SymbolSet> = match scope {
            FollowScope::Nonterminals => grammar.nonterminals(),
            FollowScope::AllSymbols => grammar.symbols(),
        }
        .into_iter()
        .map(|sym| (sym, SymbolSet::new()))
        .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for p in grammar.iter() {
                let mut trailer = sets.get(&p.lhs).cloned().unwrap_or_default();
                for sym in p.rhs.iter().rev() {
                    let tracked = match scope {
                        FollowScope::Nonterminals => grammar.is_nonterminal(sym),
                        FollowScope::AllSymbols => true,
                    };
                    if tracked {
                        let target = sets.entry(sym.clone()).or_default();
                        for t in &trailer {
                            changed |= target.insert(t.clone());
                        }
                    }

                    if grammar.is_nonterminal(sym) {
                        if firsts.contains_epsilon(sym) {
                            trailer.extend(
                                firsts
                                    .first(sym)
                                    .into_iter()
                                    .flatten()
                                    .filter(|b| !b.is_epsilon())
                                    .cloned(),
                            );
                        } else {
                            trailer = firsts.first(sym).cloned().unwrap_or_default();
                        }
                    } else {
                        // A terminal is its own FIRST set.
                        trailer = SymbolSet::from([sym.clone()]);
                    }
                }
            }
        }

        Self { scope, sets }
    }

    pub fn scope(&self) -> FollowScope {
        self.scope
    }

    pub fn follow(&self, sym: &Symbol) -> Option<&SymbolSet> {
        self.sets.get(sym)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &SymbolSet)> {
        self.sets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::RIGHT_RECURSIVE_EXPR_EOF;

    fn follow_of(follows: &FollowSets, sym: &str) -> Vec<String> {
        follows
            .follow(&Symbol::from(sym))
            .unwrap()
            .iter()
            .map(|s| s.as_str().to_string())
            .collect()
    }

    #[test]
    fn right_recursive_expression_grammar_follow_sets() {
        let g = &*RIGHT_RECURSIVE_EXPR_EOF;
        let firsts = FirstSets::compute(g);
        let follows = FollowSets::compute(g, &firsts, FollowScope::Nonterminals);

        assert_eq!(follow_of(&follows, "Expr"), vec![")", "eof"]);
        assert_eq!(follow_of(&follows, "Expr'"), vec![")", "eof"]);
        assert_eq!(follow_of(&follows, "Term"), vec![")", "+", "-", "eof"]);
        assert_eq!(
            follow_of(&follows, "Factor"),
            vec![")", "*", "+", "-", "/", "eof"]
        );
        assert!(follow_of(&follows, "Goal").is_empty());
    }

    #[test]
    fn epsilon_never_appears_in_follow() {
        let g = &*RIGHT_RECURSIVE_EXPR_EOF;
        let firsts = FirstSets::compute(g);
        for scope in [FollowScope::Nonterminals, FollowScope::AllSymbols] {
            let follows = FollowSets::compute(g, &firsts, scope);
            for (_, set) in follows.iter() {
                assert!(!set.contains(""));
            }
        }
    }

    #[test]
    fn nonterminal_scope_tracks_no_terminals() {
        let g = &*RIGHT_RECURSIVE_EXPR_EOF;
        let firsts = FirstSets::compute(g);
        let follows = FollowSets::compute(g, &firsts, FollowScope::Nonterminals);
        assert!(follows.follow(&Symbol::from("+")).is_none());
        assert!(follows.follow(&Symbol::from("eof")).is_none());
    }

    #[test]
    fn all_symbols_scope_accumulates_terminal_trailers() {
        // Scott's calculator fragment: terminals pick up what can follow
        // them, e.g. FOLLOW[read] = {id}.
        let g = grammar! {
            "program" => ["stmt_list", "$$"];
            "stmt_list" => ["stmt", "stmt_list"];
            "stmt_list" => [];
            "stmt" => ["id", ":=", "expr"];
            "stmt" => ["read", "id"];
            "stmt" => ["write", "expr"];
            "expr" => ["id"];
            "expr" => ["number"];
        };
        let firsts = FirstSets::compute(&g);
        let follows = FollowSets::compute(&g, &firsts, FollowScope::AllSymbols);

        assert_eq!(follow_of(&follows, "read"), vec!["id"]);
        assert_eq!(follow_of(&follows, ":="), vec!["id", "number"]);
        assert_eq!(
            follow_of(&follows, "stmt"),
            vec!["$$", "id", "read", "write"]
        );
        assert!(follow_of(&follows, "$$").is_empty());
    }
}
