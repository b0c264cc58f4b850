use crate::first::FirstSets;
use crate::follow::FollowSets;
use crate::grammar::{Grammar, ProductionId};
use crate::symbol::SymbolSet;

/// PREDICT sets, one per production, indexed by production id.
///
/// `PREDICT[A -> α] = FIRST(α) \ {ε}`, plus `FOLLOW[A]` when α derives ε.
/// ε itself is never a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictSets {
    sets: Vec<SymbolSet>,
}

impl PredictSets {
    pub fn compute(grammar: &Grammar, firsts: &FirstSets, follows: &FollowSets) -> Self {
        let sets = grammar
            .iter()
            .map(|p| {
                let mut set = firsts.sequence_first(&p.rhs);
                if set.remove("") {
                    set.extend(
                        follows
                            .follow(&p.lhs)
                            .into_iter()
                            .flatten()
                            .cloned(),
                    );
                }
                set
            })
            .collect();
        Self { sets }
    }

    pub fn predict(&self, production: ProductionId) -> Option<&SymbolSet> {
        self.sets.get(production)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProductionId, &SymbolSet)> {
        self.sets.iter().enumerate()
    }

    /// The first pair of same-lhs productions whose PREDICT sets overlap,
    /// if any. A grammar with no such pair is LL(1)-predictable.
    pub fn conflict(&self, grammar: &Grammar) -> Option<(ProductionId, ProductionId)> {
        for (i, left) in self.sets.iter().enumerate() {
            for (j, right) in self.sets.iter().enumerate().skip(i + 1) {
                let same_lhs = grammar
                    .get(i)
                    .ok()
                    .zip(grammar.get(j).ok())
                    .is_some_and(|(p, q)| p.lhs == q.lhs);
                if same_lhs && left.intersection(right).next().is_some() {
                    return Some((i, j));
                }
            }
        }
        None
    }
}
