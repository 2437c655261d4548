use crate::expr::Expr;
use indexmap::IndexMap;
use std::fmt::{self, Display, Formatter};

/// A mapping from wildcard names to the expressions they captured.
///
/// An empty substitution is a successful match that bound nothing, which is different from a
/// failed match (represented by [`None`] wherever a match can fail).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitution(IndexMap<String, Expr>);

impl Substitution {
    /// Creates an empty substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the expression bound to the given name.
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.0.get(name)
    }

    /// Binds the given name, returning the expression that was previously bound to it.
    pub fn insert(&mut self, name: impl Into<String>, expr: Expr) -> Option<Expr> {
        self.0.insert(name.into(), expr)
    }

    /// The number of bound names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the bindings in the order they were made.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Expr> {
        self.0.iter()
    }
}

impl<const N: usize> From<[(&str, Expr); N]> for Substitution {
    fn from(bindings: [(&str, Expr); N]) -> Self {
        bindings.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Expr)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (S, Expr)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, expr)| (name.into(), expr)).collect())
    }
}

impl IntoIterator for Substitution {
    type Item = (String, Expr);
    type IntoIter = indexmap::map::IntoIter<String, Expr>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Display for Substitution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut iter = self.0.iter();
        if let Some((name, expr)) = iter.next() {
            write!(f, "{}: {}", name, expr)?;
            for (name, expr) in iter {
                write!(f, ", {}: {}", name, expr)?;
            }
        }
        write!(f, "}}")
    }
}
