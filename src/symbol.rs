use std::borrow::Borrow;
use std::collections::BTreeSet;

/// An opaque grammar symbol: any nonempty whitespace-free byte string.
///
/// The empty string is reserved as the ε marker. It never occurs as a
/// production's left-hand side nor inside a right-hand side; it only shows
/// up inside FIRST and PREDICT set values.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

/// A sorted set of symbols. Iteration order is the lexicographic order on
/// the symbol bytes, which keeps every printed analysis deterministic.
pub type SymbolSet = BTreeSet<Symbol>;

impl Symbol {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ε marker.
    pub fn epsilon() -> Self {
        Self(String::new())
    }

    pub fn is_epsilon(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_epsilon() {
            f.write_str("ε")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for Symbol {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Symbol {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}
