use crate::expr::Expr;

/// How many subject arguments a wildcard captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WildcardKind {
    /// `_` or `_name`: exactly one expression.
    Single,

    /// `__` or `__name`: one or more consecutive arguments.
    OneOrMore,

    /// `___` or `___name`: zero or more consecutive arguments.
    ZeroOrMore,
}

/// A wildcard symbol in a pattern.
///
/// A symbol is a wildcard if its name starts with an underscore. The number of leading
/// underscores selects the [`WildcardKind`], and the run of ASCII alphanumeric characters that
/// follows (at most three underscores are stripped) is the name the capture is bound to. A
/// wildcard with no such name is *universal*: it matches like a named wildcard, but binds
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wildcard<'a> {
    /// The kind of wildcard.
    pub kind: WildcardKind,

    /// The name of the wildcard. Empty for universal wildcards.
    pub name: &'a str,
}

impl<'a> Wildcard<'a> {
    /// Parses the name of a symbol as a wildcard. Returns [`None`] if the name does not start
    /// with an underscore.
    pub fn parse(token: &'a str) -> Option<Self> {
        let underscores = token.bytes().take_while(|&b| b == b'_').count();
        let kind = match underscores {
            0 => return None,
            1 => WildcardKind::Single,
            2 => WildcardKind::OneOrMore,
            _ => WildcardKind::ZeroOrMore,
        };

        let rest = &token[underscores.min(3)..];
        let end = rest.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(rest.len());
        Some(Self { kind, name: &rest[..end] })
    }

    /// Returns the wildcard if the expression is a wildcard symbol.
    pub fn from_expr(expr: &'a Expr) -> Option<Self> {
        Self::parse(expr.symbol_name()?)
    }

    /// Returns true if this wildcard binds nothing.
    pub fn is_universal(&self) -> bool {
        self.name.is_empty()
    }

    /// Returns true if this wildcard can capture a run of arguments.
    pub fn is_sequence(&self) -> bool {
        self.kind != WildcardKind::Single
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(Wildcard::parse("x"), None);
        assert_eq!(Wildcard::parse("_"), Some(Wildcard { kind: WildcardKind::Single, name: "" }));
        assert_eq!(Wildcard::parse("_a"), Some(Wildcard { kind: WildcardKind::Single, name: "a" }));
        assert_eq!(Wildcard::parse("__"), Some(Wildcard { kind: WildcardKind::OneOrMore, name: "" }));
        assert_eq!(Wildcard::parse("__rest"), Some(Wildcard { kind: WildcardKind::OneOrMore, name: "rest" }));
        assert_eq!(Wildcard::parse("___x1"), Some(Wildcard { kind: WildcardKind::ZeroOrMore, name: "x1" }));
    }

    #[test]
    fn name_is_alphanumeric_run() {
        assert_eq!(Wildcard::parse("_a-b").map(|w| w.name), Some("a"));
        assert!(Wildcard::parse("_-").unwrap().is_universal());
        assert!(Wildcard::parse("____x").unwrap().is_universal());
        assert!(Wildcard::parse("__x").unwrap().is_sequence());
        assert!(!Wildcard::parse("_x").unwrap().is_sequence());
    }
}
