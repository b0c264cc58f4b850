use std::collections::BTreeSet;

use itertools::Itertools;

use crate::error::YagaResult;
use crate::grammar::{Grammar, ProductionId};
use crate::symbol::Symbol;

/// An LR(0) item: a production with a dot position.
///
/// # Example
/// `[E -> E • + B]` is `Item { production: 2, dot: 1 }` when production 2
/// is `E -> E + B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub production: ProductionId,
    pub dot: usize,
}

impl Item {
    pub fn new(production: ProductionId, dot: usize) -> Self {
        Self { production, dot }
    }

    /// The symbol immediately after the dot, if the item is not exhausted.
    pub fn symbol_after_dot<'g>(&self, grammar: &'g Grammar) -> YagaResult<Option<&'g Symbol>> {
        Ok(grammar.get(self.production)?.rhs.get(self.dot))
    }

    /// Dot at the end of the right-hand side.
    pub fn is_exhausted(&self, grammar: &Grammar) -> YagaResult<bool> {
        Ok(self.dot >= grammar.get(self.production)?.rhs.len())
    }

    pub fn advance(&self) -> Self {
        Self {
            production: self.production,
            dot: self.dot + 1,
        }
    }

    pub fn display<'a>(&self, grammar: &'a Grammar) -> ItemDisplay<'a> {
        ItemDisplay {
            item: *self,
            grammar,
        }
    }
}

pub struct ItemDisplay<'a> {
    item: Item,
    grammar: &'a Grammar,
}

impl std::fmt::Display for ItemDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Ok(p) = self.grammar.get(self.item.production) else {
            return write!(f, "[#{}·{}]", self.item.production, self.item.dot);
        };
        let mut rhs = p
            .rhs
            .iter()
            .map(ToString::to_string)
            .enumerate()
            .map(|(pos, mut s)| {
                if pos == self.item.dot {
                    s.insert_str(0, "• ");
                }
                s
            })
            .join(" ");
        if self.item.dot >= p.rhs.len() {
            if !rhs.is_empty() {
                rhs.push(' ');
            }
            rhs.push('•');
        }
        write!(f, "[{} -> {}]", p.lhs, rhs)
    }
}

/// A set of LR(0) items. Kept sorted, so two sets with the same members
/// compare equal and whole collections of sets have a fixed total order.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ItemSet(BTreeSet<Item>);

impl FromIterator<Item> for ItemSet {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl ItemSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.0.contains(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.0.iter()
    }

    /// The smallest superset of `self` closed under: if `[A -> α • B β]` is
    /// in the set and `B` is a nonterminal, then `[B -> • γ]` is in the set
    /// for every production `B -> γ`. Items whose dot sits at the end or
    /// before a terminal contribute nothing.
    pub fn closure(&self, grammar: &Grammar) -> YagaResult<ItemSet> {
        let mut closed = self.0.clone();
        let mut stack: Vec<Item> = closed.iter().copied().collect();

        while let Some(item) = stack.pop() {
            if item.is_exhausted(grammar)? {
                continue;
            }
            let next = &grammar.get(item.production)?.rhs[item.dot];
            if grammar.is_terminal(next) {
                continue;
            }
            let starts: Vec<Item> = grammar
                .iter_by_lhs(next)
                .map(|(id, _)| Item::new(id, 0))
                .collect();
            for start in starts {
                if closed.insert(start) {
                    stack.push(start);
                }
            }
        }

        Ok(ItemSet(closed))
    }

    /// Advance the dot over `x` in every item that allows it, then close.
    pub fn goto(&self, x: &Symbol, grammar: &Grammar) -> YagaResult<ItemSet> {
        let mut advanced = BTreeSet::new();
        for item in &self.0 {
            if item.symbol_after_dot(grammar)? == Some(x) {
                advanced.insert(item.advance());
            }
        }
        ItemSet(advanced).closure(grammar)
    }

    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> ItemSetDisplay<'a> {
        ItemSetDisplay { set: self, grammar }
    }
}

pub struct ItemSetDisplay<'a> {
    set: &'a ItemSet,
    grammar: &'a Grammar,
}

impl std::fmt::Display for ItemSetDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.set
                .iter()
                .map(|item| item.display(self.grammar).to_string())
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::augment;

    #[test]
    fn closure_pulls_in_every_production_of_the_dotted_nonterminal() {
        let g = augment(&grammar! {
            "E" => ["E", "*", "B"];
            "E" => ["E", "+", "B"];
            "E" => ["B"];
            "B" => ["0"];
            "B" => ["1"];
        })
        .unwrap();

        let closed = ItemSet::from_iter([Item::new(0, 0)]).closure(&g).unwrap();
        let expected: ItemSet = (0..6).map(|id| Item::new(id, 0)).collect();
        assert_eq!(closed.len(), 6);
        assert_eq!(closed, expected);
    }

    #[test]
    fn closure_is_idempotent() {
        let g = augment(&grammar! {
            "E" => ["E", "+", "B"];
            "E" => ["B"];
            "B" => ["0"];
        })
        .unwrap();
        let once = ItemSet::from_iter([Item::new(0, 0)]).closure(&g).unwrap();
        assert_eq!(once.closure(&g).unwrap(), once);
    }

    #[test]
    fn goto_is_the_closure_of_the_advanced_kernel() {
        let g = augment(&grammar! {
            "E" => ["E", "+", "B"];
            "E" => ["B"];
            "B" => ["0"];
        })
        .unwrap();
        let initial = ItemSet::from_iter([Item::new(0, 0)]).closure(&g).unwrap();

        let e = Symbol::from("E");
        let advanced: ItemSet = initial
            .iter()
            .filter(|item| item.symbol_after_dot(&g).unwrap() == Some(&e))
            .map(Item::advance)
            .collect();
        assert_eq!(
            initial.goto(&e, &g).unwrap(),
            advanced.closure(&g).unwrap()
        );
    }

    #[test]
    fn goto_over_an_absent_symbol_is_empty() {
        let g = grammar! { "S" => ["a"]; };
        let set = ItemSet::from_iter([Item::new(0, 0)]).closure(&g).unwrap();
        assert!(set.goto(&Symbol::from("z"), &g).unwrap().is_empty());
    }

    #[test]
    fn items_render_with_a_dot() {
        let g = grammar! { "S" => ["a", "B"]; "B" => ["b"]; };
        assert_eq!(Item::new(0, 0).display(&g).to_string(), "[S -> • a B]");
        assert_eq!(Item::new(0, 1).display(&g).to_string(), "[S -> a • B]");
        assert_eq!(Item::new(0, 2).display(&g).to_string(), "[S -> a B •]");
    }
}
