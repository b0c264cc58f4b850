use std::collections::BTreeSet;

use crate::error::YagaResult;
use crate::grammar::{Grammar, Production};
use crate::item::{Item, ItemSet};
use crate::symbol::Symbol;

/// Prepend a fresh start production `S' -> S` to the grammar.
///
/// The new start symbol is the old one with a `'` suffix, primed further
/// until the name collides with nothing the grammar already mentions.
pub fn augment(grammar: &Grammar) -> YagaResult<Grammar> {
    let start = grammar.start_symbol()?.clone();
    let symbols = grammar.symbols();

    let mut fresh = format!("{}'", start.as_str());
    while symbols.contains(fresh.as_str()) {
        fresh.push('\'');
    }

    let mut productions = vec![Production::new(Symbol::new(fresh), vec![start])];
    productions.extend(grammar.iter().cloned());
    Ok(Grammar::new(productions))
}

/// The canonical collection of LR(0) item sets.
///
/// Starts from the closure of `[S' -> • S]` and keeps applying GOTO over
/// every grammar symbol until no new nonempty set appears. The result is a
/// set of item sets; `BTreeSet` ordering makes iteration deterministic.
pub fn canonical_collection(grammar: &Grammar) -> YagaResult<BTreeSet<ItemSet>> {
    grammar.start_symbol()?;

    let initial = ItemSet::from_iter([Item::new(0, 0)]).closure(grammar)?;
    let symbols = grammar.symbols();

    let mut collection = BTreeSet::from([initial.clone()]);
    let mut work = vec![initial];

    while let Some(set) = work.pop() {
        for x in &symbols {
            let next = set.goto(x, grammar)?;
            if next.is_empty() {
                continue;
            }
            if collection.insert(next.clone()) {
                work.push(next);
            }
        }
    }

    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::YagaError;

    #[test]
    fn augmentation_prepends_a_fresh_start_production() {
        let g = grammar! { "S" => ["a"]; };
        let augmented = augment(&g).unwrap();

        assert_eq!(augmented.len(), 2);
        assert_eq!(augmented.start_symbol().unwrap().as_str(), "S'");
        assert_eq!(
            augmented.get(0).unwrap(),
            &Production::new(Symbol::from("S'"), vec![Symbol::from("S")])
        );
        assert_eq!(augmented.get(1).unwrap(), g.get(0).unwrap());
    }

    #[test]
    fn augmentation_keeps_priming_until_the_name_is_unused() {
        let g = grammar! {
            "S" => ["S'"];
            "S'" => ["a"];
        };
        let augmented = augment(&g).unwrap();
        assert_eq!(augmented.start_symbol().unwrap().as_str(), "S''");
    }

    #[test]
    fn augmenting_an_empty_grammar_fails() {
        assert_eq!(augment(&Grammar::default()), Err(YagaError::EmptyGrammar));
    }

    #[test]
    fn single_production_grammar_has_three_canonical_sets() {
        let augmented = augment(&grammar! { "S" => ["a"]; }).unwrap();

        let initial = ItemSet::from_iter([Item::new(0, 0)])
            .closure(&augmented)
            .unwrap();
        assert_eq!(
            initial,
            ItemSet::from_iter([Item::new(0, 0), Item::new(1, 0)])
        );
        assert_eq!(
            initial.goto(&Symbol::from("S"), &augmented).unwrap(),
            ItemSet::from_iter([Item::new(0, 1)])
        );
        assert_eq!(
            initial.goto(&Symbol::from("a"), &augmented).unwrap(),
            ItemSet::from_iter([Item::new(1, 1)])
        );

        // Every GOTO out of the two singleton sets is empty, so the
        // collection is exactly the three sets built above.
        let collection = canonical_collection(&augmented).unwrap();
        assert_eq!(collection.len(), 3);
        assert!(collection.contains(&initial));
        assert!(collection.contains(&ItemSet::from_iter([Item::new(0, 1)])));
        assert!(collection.contains(&ItemSet::from_iter([Item::new(1, 1)])));
    }

    #[test]
    fn collection_members_are_goto_closed() {
        let augmented = augment(&grammar! {
            "E" => ["E", "+", "B"];
            "E" => ["B"];
            "B" => ["0"];
            "B" => ["1"];
        })
        .unwrap();
        let collection = canonical_collection(&augmented).unwrap();

        for set in &collection {
            assert_eq!(&set.closure(&augmented).unwrap(), set);
            for x in augmented.symbols() {
                let next = set.goto(&x, &augmented).unwrap();
                assert!(next.is_empty() || collection.contains(&next));
            }
        }
    }
}
