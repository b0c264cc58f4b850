//! yaga, yet another grammar analyzer.
//!
//! Design-time tooling over context-free grammars: the classical
//! FIRST/FOLLOW/PREDICT analyses, LR(0) item sets with CLOSURE/GOTO and the
//! canonical collection, parse trees with undeveloped nonterminals and
//! bounded derivation enumeration, plus the left-factoring trie and
//! left-recursion elimination used as rewrite stages before analysis.
//!
//! Everything is synchronous and value-oriented: grammars and parse trees
//! are immutable once built, and every "mutation" returns a fresh value.

/// Builds a [`grammar::Grammar`] literal in tests:
/// `grammar! { "S" => ["a", "A"]; "A" => []; }`.
#[cfg(test)]
macro_rules! grammar {
    ($($lhs:literal => [$($rhs:literal),* $(,)?]);* $(;)?) => {
        $crate::grammar::Grammar::new(vec![
            $($crate::grammar::Production::new(
                $crate::symbol::Symbol::from($lhs),
                vec![$($crate::symbol::Symbol::from($rhs)),*],
            )),*
        ])
    };
}

pub mod collection;
pub mod error;
pub mod extended;
pub mod factor;
pub mod first;
pub mod follow;
pub mod grammar;
pub mod item;
pub mod predict;
pub mod rewrite;
pub mod symbol;
pub mod tree;

pub use error::{YagaError, YagaResult};
