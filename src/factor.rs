use std::collections::BTreeMap;

use crate::grammar::Grammar;
use crate::symbol::Symbol;

/// A trie over symbol sequences, used to expose the common prefixes of a
/// nonterminal's alternatives before left-factoring.
///
/// Two right-hand sides that start alike share a path from the root; the
/// point where the paths split is exactly where a left-factored grammar
/// would introduce a fresh nonterminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixTree {
    children: BTreeMap<Symbol, PrefixTree>,
    /// A full right-hand side ends here (the ε alternative sets it on the
    /// root itself).
    end: bool,
}

impl PrefixTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, seq: impl IntoIterator<Item = Symbol>) {
        let mut node = self;
        for sym in seq {
            node = node.children.entry(sym).or_default();
        }
        node.end = true;
    }

    pub fn contains(&self, seq: impl IntoIterator<Item = Symbol>) -> bool {
        let mut node = self;
        for sym in seq {
            match node.children.get(&sym) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.end
    }

    /// Number of sequences stored.
    pub fn len(&self) -> usize {
        usize::from(self.end)
            + self
                .children
                .values()
                .map(PrefixTree::len)
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        !self.end && self.children.is_empty()
    }

    fn fmt_at_depth(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        for (sym, child) in &self.children {
            writeln!(
                f,
                "{:indent$}{}{}",
                "",
                sym,
                if child.end { " ·" } else { "" },
                indent = 2 * depth
            )?;
            child.fmt_at_depth(f, depth + 1)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for PrefixTree {
    /// Indented rendering, two spaces per depth; `·` marks the end of a
    /// stored sequence, a bare `ε` line the empty one.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.end {
            writeln!(f, "ε")?;
        }
        self.fmt_at_depth(f, 0)
    }
}

/// One prefix trie per nonterminal, filled with every right-hand side of
/// that nonterminal's productions.
pub fn prefix_trees(grammar: &Grammar) -> BTreeMap<Symbol, PrefixTree> {
    let mut trees: BTreeMap<Symbol, PrefixTree> = BTreeMap::new();
    for p in grammar.iter() {
        trees
            .entry(p.lhs.clone())
            .or_default()
            .insert(p.rhs.iter().cloned());
    }
    trees
}
