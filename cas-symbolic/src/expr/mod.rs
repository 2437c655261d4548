//! The tree-shaped symbolic expressions that patterns are matched against.
//!
//! An [`Expr`] is one of five kinds of node: a number, a string, a symbol, a dictionary of named
//! sub-expressions, or a function call with a head expression and an ordered list of arguments.
//! Expressions are immutable values; every operation in this crate that "rewrites" an expression
//! returns a new tree.
//!
//! # Equality
//!
//! The [`PartialEq`] implementation for [`Expr`] implements **exact** structural identity: two
//! numbers are equal only if their `f64` values are equal (so `NaN` is never equal to itself),
//! symbols must agree on both their name and their external identifier, and dictionaries must
//! hold equal values under the same keys, in the same order.
//!
//! This is intentionally stricter than what the pattern matcher does. The
//! [`match_expr`](crate::pattern::match_expr) function compares numbers within a tolerance, and
//! matches symbols that share an external identifier even if their names differ.
//!
//! # Interchange
//!
//! Expressions can be converted to and from MathJSON, the JSON interchange form of symbolic
//! expressions. See [`json`] for the exact encoding.

mod iter;
pub mod json;

use crate::pattern::wildcard::Wildcard;
use indexmap::IndexMap;
use iter::ExprIter;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// The name of the head used to group the arguments captured by a sequence wildcard.
pub const SEQUENCE: &str = "Sequence";

/// A named symbol, such as `x`, `Pi`, or `Add`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    /// The name of the symbol.
    pub name: String,

    /// An opaque external identifier for the symbol (the "wikidata" id). Two symbols with
    /// different names but the same identifier refer to the same entity.
    pub wikidata: Option<String>,
}

impl Symbol {
    /// Creates a new symbol with the given name and no external identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), wikidata: None }
    }

    /// Attaches the given external identifier to the symbol.
    pub fn with_wikidata(mut self, wikidata: impl Into<String>) -> Self {
        self.wikidata = Some(wikidata.into());
        self
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A symbolic expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum Expr {
    /// A number, such as `2` or `3.14`.
    Number(f64),

    /// A string, such as `'hello'`.
    String(String),

    /// A symbol, such as `x` or `_a`.
    Symbol(Symbol),

    /// A mapping from unique keys to expressions. Keys keep their insertion order.
    Dictionary(IndexMap<String, Expr>),

    /// A function call, with a head expression and ordered arguments, such as `Add(1, x)`.
    Call(Box<Expr>, Vec<Expr>),
}

impl Expr {
    /// Creates a symbol expression with the given name.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(Symbol::new(name))
    }

    /// Creates a string expression.
    pub fn string(text: impl Into<String>) -> Self {
        Self::String(text.into())
    }

    /// Creates a function call with an arbitrary head expression.
    pub fn call(head: Expr, args: Vec<Expr>) -> Self {
        Self::Call(Box::new(head), args)
    }

    /// Creates a function call whose head is the symbol with the given name.
    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::call(Self::symbol(name), args)
    }

    /// Creates a `Sequence(...)` expression grouping the given expressions.
    pub fn sequence(items: Vec<Expr>) -> Self {
        Self::function(SEQUENCE, items)
    }

    /// Returns the symbol if this expression is a symbol.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Returns the name of the symbol if this expression is a symbol.
    pub fn symbol_name(&self) -> Option<&str> {
        self.as_symbol().map(|symbol| symbol.name.as_str())
    }

    /// Returns the value of the number if this expression is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the name of the head if this expression is a function call whose head is a
    /// symbol.
    pub fn head_name(&self) -> Option<&str> {
        match self {
            Self::Call(head, _) => head.symbol_name(),
            _ => None,
        }
    }

    /// Returns the arguments of a function call, or an empty slice for any other expression.
    pub fn args(&self) -> &[Expr] {
        match self {
            Self::Call(_, args) => args,
            _ => &[],
        }
    }

    /// Returns true if this expression is a `Sequence(...)` call.
    pub fn is_sequence(&self) -> bool {
        self.head_name() == Some(SEQUENCE)
    }

    /// Returns the name that identifies this expression in a dictionary: the name of a symbol,
    /// or the name of the head of a function call.
    pub fn name(&self) -> Option<&str> {
        self.symbol_name().or_else(|| self.head_name())
    }

    /// Returns true if any symbol in this expression is a wildcard.
    pub fn has_wildcards(&self) -> bool {
        self.post_order_iter()
            .any(|expr| Wildcard::from_expr(expr).is_some())
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Self::Symbol(symbol)
    }
}

/// Writes the items separated by `, `.
fn write_list<T: Display>(f: &mut Formatter<'_>, items: impl IntoIterator<Item = T>) -> fmt::Result {
    let mut iter = items.into_iter();
    if let Some(item) = iter.next() {
        write!(f, "{}", item)?;
        for item in iter {
            write!(f, ", {}", item)?;
        }
    }
    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::String(text) => write!(f, "'{}'", text),
            Self::Symbol(symbol) => write!(f, "{}", symbol),
            Self::Dictionary(entries) => {
                write!(f, "{{")?;
                write_list(f, entries.iter().map(|(key, value)| format!("{}: {}", key, value)))?;
                write!(f, "}}")
            },
            Self::Call(head, args) => {
                write!(f, "{}(", head)?;
                write_list(f, args)?;
                write!(f, ")")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn display() {
        let expr = Expr::function("Add", vec![
            Expr::Number(1.0),
            Expr::function("Multiply", vec![Expr::Number(2.5), Expr::symbol("x")]),
            Expr::string("hi"),
        ]);
        assert_eq!(expr.to_string(), "Add(1, Multiply(2.5, x), 'hi')");

        let dict = Expr::Dictionary(IndexMap::from([
            ("b".to_string(), Expr::Number(1.0)),
            ("a".to_string(), Expr::symbol("y")),
        ]));
        assert_eq!(dict.to_string(), "{b: 1, a: y}");
        assert_eq!(Expr::sequence(vec![]).to_string(), "Sequence()");
    }

    #[test]
    fn exact_equality() {
        assert_eq!(Expr::Number(0.1 + 0.2) == Expr::Number(0.3), false);
        assert_eq!(Expr::Number(f64::NAN) == Expr::Number(f64::NAN), false);
        assert_eq!(
            Expr::Symbol(Symbol::new("Pi").with_wikidata("Q167")) == Expr::symbol("Pi"),
            false,
        );
        assert_eq!(Expr::symbol("x"), Expr::symbol("x"));
    }

    #[test]
    fn accessors() {
        let expr = Expr::function("Add", vec![Expr::Number(1.0), Expr::symbol("x")]);
        assert_eq!(expr.head_name(), Some("Add"));
        assert_eq!(expr.name(), Some("Add"));
        assert_eq!(expr.args().len(), 2);
        assert_eq!(expr.args()[1].symbol_name(), Some("x"));
        assert!(Expr::Number(2.0).args().is_empty());
        assert!(Expr::sequence(vec![Expr::Number(3.0)]).is_sequence());
        assert!(!expr.is_sequence());
    }

    #[test]
    fn wildcards() {
        assert!(Expr::symbol("_").has_wildcards());
        assert!(Expr::function("Add", vec![Expr::Number(1.0), Expr::symbol("__a")]).has_wildcards());
        assert!(Expr::call(Expr::symbol("_f"), vec![]).has_wildcards());
        assert!(!Expr::function("Add", vec![Expr::symbol("x")]).has_wildcards());
        assert!(!Expr::string("_a").has_wildcards());
    }
}
