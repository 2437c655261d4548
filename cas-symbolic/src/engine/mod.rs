//! The contract between the symbolic core and the engine that hosts it.
//!
//! The dictionary pipeline does not know how to parse text, simplify domains, or decide whether
//! one domain is a subset of another. It asks an [`Engine`] instead, and reports every problem it
//! finds through [`Engine::signal`]. [`BasicEngine`] is a small implementation of the contract,
//! enough to compile and validate dictionaries of domains, symbols, functions and sets.

mod basic;
mod scope;

pub use basic::BasicEngine;
pub use scope::Scope;

use cas_error::Signal;
use crate::{dictionary::Definition, expr::Expr};

/// The services the symbolic core needs from its host.
pub trait Engine {
    /// Parses text into an expression. Returns [`None`] if the text is not valid.
    fn parse(&self, text: &str) -> Option<Expr>;

    /// Simplifies a domain expression to its canonical form. Returns [`None`] if the domain
    /// cannot be resolved in the given scope.
    fn simplify(&self, scope: &Scope<'_>, domain: &Expr) -> Option<Expr>;

    /// Returns the canonical form of an expression.
    fn canonical(&self, scope: &Scope<'_>, expr: &Expr) -> Expr;

    /// Returns the domain of the given expression.
    fn domain_of(&self, scope: &Scope<'_>, expr: &Expr) -> Expr;

    /// Returns true if `domain` is a subset of `superset`.
    fn is_subset_of(&self, scope: &Scope<'_>, domain: &Expr, superset: &Expr) -> bool;

    /// Finds the definition with the given name.
    fn get_definition<'a>(&self, scope: &Scope<'a>, name: &str) -> Option<&'a Definition> {
        scope.lookup(name)
    }

    /// Reports a diagnostic.
    fn signal(&mut self, signal: Signal);
}
