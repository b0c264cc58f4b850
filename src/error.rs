use thiserror::Error;

use crate::symbol::Symbol;

/// Every failure the library can surface.
///
/// Analyses never fail on the semantic content of a grammar; ambiguous
/// grammars simply produce nonempty predict-predict conflicts. What does
/// fail: indexing outside the grammar, developing a parse tree against the
/// wrong production, and the two textual readers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum YagaError {
    #[error("the grammar has no productions")]
    EmptyGrammar,

    #[error("production index {index} out of range for a grammar of {len} productions")]
    BadProductionIndex { index: usize, len: usize },

    #[error("no undeveloped nonterminal left to develop")]
    NothingToDevelop,

    #[error("production head {head} does not match the leftmost undeveloped symbol {undeveloped}")]
    HeadMismatch { head: Symbol, undeveloped: Symbol },

    #[error("line {line}: expected `=>` after the left-hand side")]
    MissingArrow { line: usize },

    #[error("line {line}: `{token}` cannot be a left-hand side")]
    MetaLhs { line: usize, token: String },

    #[error("line {line}: `*` has no symbol to its left")]
    DanglingStar { line: usize },

    #[error("line {line}: more than one `*` in a single alternative")]
    RepeatedStar { line: usize },

    #[error("line {line}: escape stripping left an empty symbol")]
    EmptySymbol { line: usize },

    #[error("tree text contains no nodes")]
    EmptyTree,

    #[error("line {line}: indentation is not a multiple of two")]
    RaggedIndent { line: usize },

    #[error("line {line}: node has no parent one level up")]
    OrphanNode { line: usize },

    #[error("line {line}: a second root makes this a forest, not a tree")]
    ForestInput { line: usize },

    #[error("node {symbol} and its children match no production")]
    UnknownProduction { symbol: Symbol },
}

pub type YagaResult<T> = Result<T, YagaError>;
