use crate::expr::Expr;
use super::{substitution::Substitution, wildcard::Wildcard};

/// Returns the expression bound to the wildcard symbol `expr`, if any.
///
/// A sequence wildcard is only replaced by a `Sequence(...)`.
fn binding<'a>(expr: &Expr, substitution: &'a Substitution) -> Option<&'a Expr> {
    let wildcard = Wildcard::from_expr(expr)?;
    if wildcard.is_universal() {
        return None;
    }

    let bound = substitution.get(wildcard.name)?;
    if wildcard.is_sequence() && !bound.is_sequence() {
        return None;
    }
    Some(bound)
}

/// Replaces the wildcards in `expr` with the expressions bound to them in `substitution`.
///
/// Wildcards that are not bound are kept as they are. A sequence wildcard that appears as an
/// argument of a function call and is bound to `Sequence(a, b, ...)` is replaced by the arguments
/// `a, b, ...` themselves.
///
/// ```
/// use cas_symbolic::{expr::Expr, pattern::{substitute, Substitution}};
///
/// let pattern: Expr = serde_json::from_str(r#"["Add", "_x", "__rest", "_y"]"#).unwrap();
/// let substitution = Substitution::from([
///     ("x", Expr::Number(1.0)),
///     ("rest", Expr::sequence(vec![Expr::Number(2.0), Expr::Number(3.0)])),
/// ]);
///
/// assert_eq!(substitute(&pattern, &substitution).to_string(), "Add(1, 2, 3, _y)");
/// ```
pub fn substitute(expr: &Expr, substitution: &Substitution) -> Expr {
    match expr {
        Expr::Number(_) | Expr::String(_) => expr.clone(),
        Expr::Symbol(_) => binding(expr, substitution).unwrap_or(expr).clone(),
        Expr::Dictionary(entries) => Expr::Dictionary(
            entries.iter()
                .map(|(key, value)| (key.clone(), substitute(value, substitution)))
                .collect()
        ),
        Expr::Call(head, args) => {
            let mut new_args = Vec::with_capacity(args.len());
            for arg in args {
                let spliced = Wildcard::from_expr(arg)
                    .filter(|wildcard| wildcard.is_sequence())
                    .and_then(|_| binding(arg, substitution));
                match spliced {
                    Some(sequence) => new_args.extend(sequence.args().iter().cloned()),
                    None => new_args.push(substitute(arg, substitution)),
                }
            }
            Expr::call(substitute(head, substitution), new_args)
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::pattern::{match_expr, MatchOptions};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use super::*;

    fn expr(value: Value) -> Expr {
        Expr::try_from(value).unwrap()
    }

    #[test]
    fn unbound_wildcards_are_kept() {
        let pattern = expr(json!(["Add", "_a", "_b", "_"]));
        let substitution = Substitution::from([("a", Expr::Number(1.0))]);
        assert_eq!(substitute(&pattern, &substitution), expr(json!(["Add", 1, "_b", "_"])));
    }

    #[test]
    fn sequence_is_spliced() {
        let pattern = expr(json!(["Add", 1, 2, "__a", 4, 5]));
        let substitution = Substitution::from([
            ("a", Expr::sequence(vec![Expr::Number(3.0), Expr::Number(3.5)])),
        ]);
        assert_eq!(substitute(&pattern, &substitution), expr(json!(["Add", 1, 2, 3, 3.5, 4, 5])));

        let empty = Substitution::from([("a", Expr::sequence(vec![]))]);
        assert_eq!(substitute(&pattern, &empty), expr(json!(["Add", 1, 2, 4, 5])));
    }

    #[test]
    fn sequence_bound_to_non_sequence_is_kept() {
        let pattern = expr(json!(["Add", "__a"]));
        let substitution = Substitution::from([("a", Expr::Number(3.0))]);
        assert_eq!(substitute(&pattern, &substitution), pattern);
    }

    #[test]
    fn rewrites_heads_and_dictionaries() {
        let pattern = expr(json!({"dict": {"f": ["_f", "_x"], "k": "'_x'"}}));
        let substitution = Substitution::from([
            ("f", Expr::symbol("Sin")),
            ("x", Expr::symbol("t")),
        ]);
        assert_eq!(
            substitute(&pattern, &substitution),
            expr(json!({"dict": {"f": ["Sin", "t"], "k": "'_x'"}})),
        );
    }

    #[test]
    fn round_trip() {
        let options = MatchOptions::default();
        for (subject, pattern) in [
            (json!(["Add", 1, 2, 3, 4, 5]), json!(["Add", 1, 2, "__a", 4, 5])),
            (json!(["Add", 1, ["Add", 2, 3]]), json!(["Add", 1, "_a"])),
            (json!(["Sin", ["Multiply", 2, "x"]]), json!(["_f", ["Multiply", "_k", "_"]])),
            (json!(["List", 1.00000000001, 2]), json!(["List", 1, "___tail"])),
        ] {
            let subject = expr(subject);
            let pattern = expr(pattern);
            let substitution = match_expr(&subject, &pattern, &options).unwrap();
            let rewritten = substitute(&pattern, &substitution);
            assert!(match_expr(&subject, &rewritten, &options).is_some(), "{} vs {}", subject, rewritten);
        }
    }
}
