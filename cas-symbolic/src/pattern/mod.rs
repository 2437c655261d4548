//! Structural pattern matching.
//!
//! A pattern is an ordinary [`Expr`] that may contain wildcard symbols (see [`Wildcard`]).
//! Matching a subject against a pattern compares the two trees node by node, capturing the
//! subject sub-expressions that correspond to named wildcards into a [`Substitution`].
//!
//! Matching is purely structural. No commutativity, associativity or evaluation is taken into
//! account: `Add(2, 1)` does not match `Add(1, _)`. The only approximation is numeric, where two
//! numbers match if they are within [`MatchOptions::numeric_tolerance`] of each other.
//!
//! ```
//! use cas_symbolic::{expr::Expr, pattern::{match_expr, MatchOptions, Substitution}};
//!
//! let subject: Expr = serde_json::from_str(r#"["Add", 1, ["Add", 2, 3]]"#).unwrap();
//! let pattern: Expr = serde_json::from_str(r#"["Add", 1, "_a"]"#).unwrap();
//!
//! let substitution = match_expr(&subject, &pattern, &MatchOptions::default()).unwrap();
//! assert_eq!(substitution.to_string(), "{a: Add(2, 3)}");
//! ```

mod substitute;
pub mod substitution;
pub mod wildcard;

pub use substitute::substitute;
pub use substitution::Substitution;
pub use wildcard::{Wildcard, WildcardKind};

use crate::expr::Expr;
use log::{trace, warn};

/// The default tolerance used when comparing numbers.
pub const NUMERICAL_TOLERANCE: f64 = 1e-10;

/// Options that control how expressions are matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// Two numbers match if the absolute value of their difference is at most this value.
    pub numeric_tolerance: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { numeric_tolerance: NUMERICAL_TOLERANCE }
    }
}

impl MatchOptions {
    /// Creates options with the given numeric tolerance.
    pub fn with_tolerance(numeric_tolerance: f64) -> Self {
        Self { numeric_tolerance }
    }
}

/// Matches `subject` against `pattern`.
///
/// Returns the substitution that binds the named wildcards of `pattern`, or [`None`] if the
/// subject does not match. A match that binds nothing returns an empty substitution.
pub fn match_expr(subject: &Expr, pattern: &Expr, options: &MatchOptions) -> Option<Substitution> {
    if cfg!(debug_assertions) && subject.has_wildcards() && !pattern.has_wildcards() {
        warn!(
            "matching `{}` against `{}`: the subject contains wildcards but the pattern does not, are the arguments swapped?",
            subject,
            pattern,
        );
    }

    let result = match_recursive(subject, pattern, Substitution::new(), options);
    trace!(
        "match `{}` against `{}`: {}",
        subject,
        pattern,
        result.as_ref().map_or_else(|| "no match".to_string(), ToString::to_string),
    );
    result
}

/// Matches `subject` against `pattern`, succeeding only if exactly one wildcard was bound.
/// Returns the expression bound to it.
pub fn match1(subject: &Expr, pattern: &Expr, options: &MatchOptions) -> Option<Expr> {
    let substitution = match_expr(subject, pattern, options)?;
    if substitution.len() != 1 {
        return None;
    }
    substitution.into_iter().next().map(|(_, expr)| expr)
}

/// Returns the number of subjects that match `pattern`.
pub fn count<'a>(
    subjects: impl IntoIterator<Item = &'a Expr>,
    pattern: &Expr,
    options: &MatchOptions,
) -> usize {
    subjects.into_iter()
        .filter(|subject| match_expr(subject, pattern, options).is_some())
        .count()
}

/// Returns the substitutions of every subject that matches `pattern`, in order.
pub fn match_list<'a>(
    subjects: impl IntoIterator<Item = &'a Expr>,
    pattern: &Expr,
    options: &MatchOptions,
) -> Vec<Substitution> {
    subjects.into_iter()
        .filter_map(|subject| match_expr(subject, pattern, options))
        .collect()
}

/// Binds `value` to the wildcard.
///
/// If the name is already bound, the value must match the bound expression instead.
fn capture(
    wildcard: Wildcard<'_>,
    value: Expr,
    mut substitution: Substitution,
    options: &MatchOptions,
) -> Option<Substitution> {
    if wildcard.is_universal() {
        return Some(substitution);
    }

    match substitution.get(wildcard.name) {
        Some(bound) => {
            match_recursive(&value, bound, Substitution::new(), options)?;
        },
        None => {
            substitution.insert(wildcard.name, value);
        },
    }
    Some(substitution)
}

/// Matches the subject against the pattern, extending the substitution made so far.
fn match_recursive(
    subject: &Expr,
    pattern: &Expr,
    substitution: Substitution,
    options: &MatchOptions,
) -> Option<Substitution> {
    match (subject, pattern) {
        (Expr::Number(s), Expr::Number(p)) => {
            (s == p || (s - p).abs() <= options.numeric_tolerance).then_some(substitution)
        },
        (Expr::String(s), Expr::String(p)) => (s == p).then_some(substitution),
        (Expr::Dictionary(s), Expr::Dictionary(p)) => {
            if s.len() != p.len() {
                return None;
            }
            p.iter().try_fold(substitution, |substitution, (key, value)| {
                match_recursive(s.get(key)?, value, substitution, options)
            })
        },
        (_, Expr::Symbol(p)) => {
            if let Some(wildcard) = Wildcard::parse(&p.name) {
                return capture(wildcard, subject.clone(), substitution, options);
            }

            let s = subject.as_symbol()?;
            let same_entity = match (&s.wikidata, &p.wikidata) {
                (Some(s_id), Some(p_id)) => s_id == p_id,
                _ => s.name == p.name,
            };
            same_entity.then_some(substitution)
        },
        (Expr::Call(s_head, s_args), Expr::Call(p_head, p_args)) => {
            let substitution = match_recursive(s_head, p_head, substitution, options)?;
            match_args(s_args, p_args, substitution, options)
        },
        _ => None,
    }
}

/// Matches the arguments of a function call, left-to-right.
///
/// A cursor walks the subject arguments. Each pattern argument consumes one subject argument,
/// except sequence wildcards, which consume a run of arguments: everything that remains if the
/// wildcard is the last pattern argument, otherwise everything up to the first subject argument
/// that matches the next pattern argument.
fn match_args(
    subject: &[Expr],
    pattern: &[Expr],
    mut substitution: Substitution,
    options: &MatchOptions,
) -> Option<Substitution> {
    if subject.len() != pattern.len() {
        return None;
    }

    let mut cursor = 0;
    for (i, arg) in pattern.iter().enumerate() {
        match Wildcard::from_expr(arg) {
            Some(wildcard) if wildcard.is_sequence() => {
                let end = match pattern.get(i + 1) {
                    None => subject.len(),
                    Some(next) => (cursor..subject.len()).find(|&j| {
                        match_recursive(&subject[j], next, substitution.clone(), options).is_some()
                    })?,
                };

                if wildcard.kind == WildcardKind::OneOrMore && end == cursor {
                    return None;
                }

                let captured = Expr::sequence(subject[cursor..end].to_vec());
                substitution = capture(wildcard, captured, substitution, options)?;
                cursor = end;
            },
            _ => {
                substitution = match_recursive(subject.get(cursor)?, arg, substitution, options)?;
                cursor += 1;
            },
        }
    }

    (cursor == subject.len()).then_some(substitution)
}
