use cas_error::Signal;
use crate::{
    dictionary::{domains, Definition, DomainSpec},
    expr::Expr,
};
use log::debug;
use std::collections::HashSet;
use super::{Engine, Scope};

/// A minimal [`Engine`].
///
/// - Text is parsed as MathJSON.
/// - A domain resolves if its name is `Anything` or the name of a set in scope.
/// - Canonicalization flattens `Sequence(...)` arguments into the argument list.
/// - Subsets follow the supersets of the sets in scope.
///
/// Signals are collected, and can be inspected with [`BasicEngine::signals`].
#[derive(Debug, Default)]
pub struct BasicEngine {
    signals: Vec<Signal>,
}

impl BasicEngine {
    /// Creates an engine with no signals.
    pub fn new() -> Self {
        Self::default()
    }

    /// The signals reported so far.
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Removes and returns the signals reported so far.
    pub fn take_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }
}

impl Engine for BasicEngine {
    fn parse(&self, text: &str) -> Option<Expr> {
        serde_json::from_str(text).ok()
    }

    fn simplify(&self, scope: &Scope<'_>, domain: &Expr) -> Option<Expr> {
        let name = domain.name()?;
        if name == domains::ANYTHING {
            return Some(domain.clone());
        }
        match self.get_definition(scope, name)? {
            Definition::Set(_) => Some(domain.clone()),
            _ => None,
        }
    }

    fn canonical(&self, scope: &Scope<'_>, expr: &Expr) -> Expr {
        match expr {
            Expr::Dictionary(entries) => Expr::Dictionary(
                entries.iter()
                    .map(|(key, value)| (key.clone(), self.canonical(scope, value)))
                    .collect()
            ),
            Expr::Call(head, args) => {
                let mut new_args = Vec::with_capacity(args.len());
                for arg in args {
                    let arg = self.canonical(scope, arg);
                    if arg.is_sequence() {
                        new_args.extend(arg.args().iter().cloned());
                    } else {
                        new_args.push(arg);
                    }
                }
                Expr::call(self.canonical(scope, head), new_args)
            },
            _ => expr.clone(),
        }
    }

    fn domain_of(&self, scope: &Scope<'_>, expr: &Expr) -> Expr {
        let anything = || Expr::symbol(domains::ANYTHING);
        match expr {
            Expr::Number(n) => domains::infer_numeric_domain(*n),
            Expr::String(_) => Expr::symbol(domains::STRING),
            Expr::Dictionary(_) => Expr::symbol(domains::DICTIONARY),
            Expr::Symbol(symbol) => match self.get_definition(scope, &symbol.name) {
                Some(Definition::Symbol(def)) => def.domain.clone(),
                Some(Definition::Function(def)) => def.domain.as_domain().cloned().unwrap_or_else(anything),
                Some(Definition::Collection(def)) => def.domain.clone(),
                Some(Definition::Set(def)) => def.domain.clone(),
                None => anything(),
            },
            Expr::Call(_, args) => match expr.head_name().and_then(|name| self.get_definition(scope, name)) {
                Some(Definition::Function(def)) => match &def.eval_domain {
                    Some(DomainSpec::Domain(domain)) => domain.clone(),
                    Some(DomainSpec::Resolver(resolver)) => resolver.call(args).unwrap_or_else(anything),
                    None => anything(),
                },
                Some(Definition::Collection(def)) => def.domain.clone(),
                _ => anything(),
            },
        }
    }

    fn is_subset_of(&self, scope: &Scope<'_>, domain: &Expr, superset: &Expr) -> bool {
        let (Some(name), Some(target)) = (domain.name(), superset.name()) else {
            return false;
        };

        let mut visited = HashSet::new();
        let mut pending = vec![name];
        while let Some(current) = pending.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(Definition::Set(set)) = self.get_definition(scope, current) {
                pending.extend(set.supersets.iter().map(String::as_str));
            }
        }
        false
    }

    fn signal(&mut self, signal: Signal) {
        debug!("{}", signal);
        self.signals.push(signal);
    }
}
