use std::io::{self, BufRead};

use itertools::Itertools;

use crate::error::{YagaError, YagaResult};
use crate::symbol::{Symbol, SymbolSet};

/// A production's index in its grammar.
pub type ProductionId = usize;

/// A grammar rule `lhs -> rhs`. An empty right-hand side is an ε production.
///
/// Productions are immutable once constructed; the derived ordering is
/// lexicographic, left-hand side first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Production {
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

impl Production {
    pub fn new(lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Self { lhs, rhs }
    }

    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl std::fmt::Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            std::iter::once(&self.lhs)
                .chain(self.rhs.iter())
                .map(ToString::to_string)
                .join(" ")
        )
    }
}

/// An ordered sequence of productions.
///
/// The order is significant: it fixes the production indices every analysis
/// refers to, and the first production's left-hand side is the start symbol.
/// A symbol is a nonterminal iff it appears as some production's left-hand
/// side; every other symbol is a terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    productions: Vec<Production>,
}

impl Grammar {
    pub fn new(productions: Vec<Production>) -> Self {
        Self { productions }
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    pub fn get(&self, index: ProductionId) -> YagaResult<&Production> {
        self.productions
            .get(index)
            .ok_or(YagaError::BadProductionIndex {
                index,
                len: self.productions.len(),
            })
    }

    /// The index of the first production equal to `production`, if any.
    pub fn index_of(&self, production: &Production) -> Option<ProductionId> {
        self.productions.iter().position(|p| p == production)
    }

    pub fn start_symbol(&self) -> YagaResult<&Symbol> {
        self.productions
            .first()
            .map(|p| &p.lhs)
            .ok_or(YagaError::EmptyGrammar)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Production> {
        self.productions.iter()
    }

    /// All productions with the given left-hand side, with their indices,
    /// in grammar order.
    pub fn iter_by_lhs<'a>(
        &'a self,
        lhs: &'a Symbol,
    ) -> impl Iterator<Item = (ProductionId, &'a Production)> + 'a {
        self.productions
            .iter()
            .enumerate()
            .filter(move |(_, p)| &p.lhs == lhs)
    }

    pub fn is_nonterminal(&self, sym: &Symbol) -> bool {
        self.productions.iter().any(|p| &p.lhs == sym)
    }

    pub fn is_terminal(&self, sym: &Symbol) -> bool {
        !self.is_nonterminal(sym)
    }

    /// Every symbol mentioned anywhere in the grammar.
    pub fn symbols(&self) -> SymbolSet {
        self.productions
            .iter()
            .flat_map(|p| std::iter::once(&p.lhs).chain(p.rhs.iter()))
            .cloned()
            .collect()
    }

    pub fn nonterminals(&self) -> SymbolSet {
        self.productions.iter().map(|p| p.lhs.clone()).collect()
    }

    pub fn terminals(&self) -> SymbolSet {
        let nonterminals = self.nonterminals();
        self.symbols()
            .into_iter()
            .filter(|sym| !nonterminals.contains(sym))
            .collect()
    }

    /// Parse the line-oriented `.cfg` surface form.
    ///
    /// Each non-blank line is one production: the first whitespace-delimited
    /// token is the left-hand side, the remaining tokens the right-hand
    /// side. Any non-whitespace bytes make a symbol, so parsing itself never
    /// fails; semantic validation is the caller's business.
    pub fn parse(text: &str) -> Self {
        text.lines()
            .filter_map(|line| {
                let mut tokens = line.split_whitespace();
                let lhs = Symbol::from(tokens.next()?);
                Some(Production::new(lhs, tokens.map(Symbol::from).collect()))
            })
            .collect()
    }

    pub fn read(mut reader: impl BufRead) -> io::Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::parse(&text))
    }
}

impl FromIterator<Production> for Grammar {
    fn from_iter<T: IntoIterator<Item = Production>>(iter: T) -> Self {
        Self {
            productions: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for Grammar {
    /// One production per line, whitespace-delimited, closed by a blank
    /// line. `Grammar::parse` reads this exact form back.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for p in &self.productions {
            writeln!(f, "{p}")?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::AMBIGUOUS_ARITHMETIC;

    #[test]
    fn start_symbol_is_the_first_lhs() {
        let g = grammar! {
            "S" => ["a", "A"];
            "A" => ["b"];
        };
        assert_eq!(g.start_symbol().unwrap().as_str(), "S");
    }

    #[test]
    fn empty_grammar_has_no_start_symbol() {
        let g = Grammar::default();
        assert_eq!(g.start_symbol(), Err(YagaError::EmptyGrammar));
        assert_eq!(
            g.get(0),
            Err(YagaError::BadProductionIndex { index: 0, len: 0 })
        );
    }

    #[test]
    fn terminals_and_nonterminals_partition_the_symbols() {
        let g = &*AMBIGUOUS_ARITHMETIC;
        let nonterminals = g.nonterminals();
        let terminals = g.terminals();
        assert!(nonterminals.intersection(&terminals).next().is_none());
        let union: SymbolSet = nonterminals.union(&terminals).cloned().collect();
        assert_eq!(union, g.symbols());
    }

    #[test]
    fn index_of_returns_the_first_match() {
        let g = grammar! {
            "S" => ["a"];
            "A" => ["b"];
            "S" => ["a"];
        };
        let p = Production::new(Symbol::from("S"), vec![Symbol::from("a")]);
        assert_eq!(g.index_of(&p), Some(0));
        let absent = Production::new(Symbol::from("S"), vec![Symbol::from("z")]);
        assert_eq!(g.index_of(&absent), None);
    }

    #[test]
    fn iter_by_lhs_preserves_grammar_order() {
        let g = &*AMBIGUOUS_ARITHMETIC;
        let s = Symbol::from("S");
        let indices: Vec<ProductionId> = g.iter_by_lhs(&s).map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn parse_skips_blank_lines_and_reads_epsilon_productions() {
        let g = Grammar::parse("S a A\n\n   \nA b\nA\n");
        assert_eq!(g.len(), 3);
        assert!(g.get(2).unwrap().is_epsilon());
        assert!(g.is_nonterminal(&Symbol::from("A")));
        assert!(g.is_terminal(&Symbol::from("b")));
    }

    #[test]
    fn write_then_parse_round_trips() {
        let g = grammar! {
            "Goal" => ["Expr", "eof"];
            "Expr" => ["Term", "Expr'"];
            "Expr'" => ["+", "Term", "Expr'"];
            "Expr'" => [];
        };
        assert_eq!(Grammar::parse(&g.to_string()), g);
    }

    #[test]
    fn display_ends_with_a_blank_line() {
        let g = grammar! { "S" => ["a"]; };
        assert_eq!(g.to_string(), "S a\n\n");
    }
}
