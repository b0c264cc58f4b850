use std::collections::BTreeMap;

use crate::grammar::Grammar;
use crate::symbol::{Symbol, SymbolSet};

/// FIRST sets for every symbol of a grammar.
///
/// For a terminal `t`, `FIRST[t] = {t}`. For a nonterminal `A`, `FIRST[A]`
/// holds every terminal that can begin a sentential form derived from `A`,
/// plus ε iff `A` derives ε.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets {
    sets: BTreeMap<Symbol, SymbolSet>,
}

impl FirstSets {
    /// Iterate the productions to a fixed point: for `A -> X₁…Xₙ`, walk the
    /// right-hand side left to right, inheriting `FIRST[Xᵢ] \ {ε}` and
    /// stopping at the first `Xᵢ` that cannot derive ε. If every `Xᵢ` can
    /// (vacuously so for ε productions), `A` derives ε too.
    pub fn compute(grammar: &Grammar) -> Self {
        let mut sets: BTreeMap<Symbol, SymbolSet> = BTreeMap::new();

        for t in grammar.terminals() {
            sets.insert(t.clone(), SymbolSet::from([t]));
        }
        for nt in grammar.nonterminals() {
            sets.entry(nt).or_default();
        }

        let mut changed = true;
        while changed {
            changed = false;
            for p in grammar.iter() {
                let mut gained = SymbolSet::new();
                let mut all_epsilon = true;
                for sym in &p.rhs {
                    let first = &sets[sym];
                    gained.extend(first.iter().filter(|b| !b.is_epsilon()).cloned());
                    if !first.contains("") {
                        all_epsilon = false;
                        break;
                    }
                }
                if all_epsilon {
                    gained.insert(Symbol::epsilon());
                }

                let target = sets.get_mut(&p.lhs).expect("every lhs is a nonterminal");
                for sym in gained {
                    changed |= target.insert(sym);
                }
            }
        }

        Self { sets }
    }

    pub fn first(&self, sym: &Symbol) -> Option<&SymbolSet> {
        self.sets.get(sym)
    }

    pub fn contains_epsilon(&self, sym: &Symbol) -> bool {
        self.sets.get(sym).is_some_and(|set| set.contains(""))
    }

    /// FIRST of a symbol sequence, by the same left-to-right rule:
    /// `FIRST(αβ) = (FIRST(α) \ {ε}) ∪ (FIRST(β) if α derives ε else ∅)`,
    /// with ε in the result iff the whole sequence derives ε.
    pub fn sequence_first<'a>(&self, seq: impl IntoIterator<Item = &'a Symbol>) -> SymbolSet {
        let mut out = SymbolSet::new();
        let mut all_epsilon = true;
        for sym in seq {
            let first = self.sets.get(sym);
            if let Some(first) = first {
                out.extend(first.iter().filter(|b| !b.is_epsilon()).cloned());
            }
            if !first.is_some_and(|set| set.contains("")) {
                all_epsilon = false;
                break;
            }
        }
        if all_epsilon {
            out.insert(Symbol::epsilon());
        }
        out
    }

    /// True iff every symbol of the sequence derives ε; vacuously true for
    /// the empty sequence.
    pub fn sequence_derives_epsilon<'a>(
        &self,
        seq: impl IntoIterator<Item = &'a Symbol>,
    ) -> bool {
        seq.into_iter().all(|sym| self.contains_epsilon(sym))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &SymbolSet)> {
        self.sets.iter()
    }
}
