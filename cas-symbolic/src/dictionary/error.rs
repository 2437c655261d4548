use ariadne::Fmt;
use cas_attrs::SignalKind;
use cas_error::EXPR;
use std::fmt::{self, Display, Formatter};

/// A problem with a single entry, found while normalizing or validating it.
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    /// The text of the entry could not be parsed.
    UnparsableString,

    /// The domain could not be resolved by the engine.
    UnknownDomain(String),

    /// The entry has no domain.
    ExpectedDomain,

    /// A function that is neither numeric nor has an `evalDomain`.
    ExpectedNumericOrEvalDomain,

    /// A numeric variable without a value.
    ExpectedValue,

    /// The entry was assumed to be a `variant`, but lacks the given field.
    MissingField {
        variant: &'static str,
        field: &'static str,
    },

    /// The kind of the entry could not be decided.
    NotValidated,

    /// A symbol that does not hold its value, but has no value.
    HoldWithoutValue,

    /// A numeric function that holds some of its arguments.
    HoldOnNumericFunction,

    /// A function that is both idempotent and an involution.
    IdempotentInvolution,
}

impl Display for Issue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnparsableString => write!(f, "the string could not be parsed"),
            Self::UnknownDomain(domain) => write!(f, "unknown domain `{}`, using `Anything`", domain),
            Self::ExpectedDomain => write!(f, "expected a domain, using `Anything`"),
            Self::ExpectedNumericOrEvalDomain => write!(
                f,
                "a function should either be `numeric` or have an `evalDomain`",
            ),
            Self::ExpectedValue => write!(f, "expected a `value` in the definition"),
            Self::MissingField { variant, field } => write!(
                f,
                "a {} should have a `{}` field in its definition",
                variant,
                field,
            ),
            Self::NotValidated => write!(f, "the definition could not be validated"),
            Self::HoldWithoutValue => write!(f, "`hold` is false, but there is no value to substitute"),
            Self::HoldOnNumericFunction => write!(f, "a `numeric` function cannot hold its arguments"),
            Self::IdempotentInvolution => write!(f, "a function cannot be both `idempotent` and an `involution`"),
        }
    }
}

/// The name of an entry is not a valid identifier.
#[derive(Debug, Clone, SignalKind, PartialEq)]
#[signal(
    code = "invalid-name",
    message = format!("invalid entry name: `{}`", self.name),
    help = "names must be a single character, or a letter followed by letters, digits or hyphens",
)]
pub struct InvalidName {
    pub name: String,
}

/// Two entries share the same external identifier.
#[derive(Debug, Clone, SignalKind, PartialEq)]
#[signal(
    code = "duplicate-wikidata",
    message = format!("duplicate wikidata id `{}`, also used by `{}`", self.wikidata, self.first),
)]
pub struct DuplicateWikidata {
    /// The duplicated identifier.
    pub wikidata: String,

    /// The entry that used the identifier first.
    pub first: String,
}

/// A domain that is not a known subset of `Anything`.
#[derive(Debug, Clone, SignalKind, PartialEq)]
#[signal(
    code = "unknown-domain",
    message = format!("unknown domain: `{}`", self.domain),
    help = if self.suggestions.is_empty() {
        "domains must be defined before they are used".to_string()
    } else if self.suggestions.len() == 1 {
        format!("did you mean the `{}` domain?", (&*self.suggestions[0]).fg(EXPR))
    } else {
        format!(
            "did you mean one of these domains? {}",
            self.suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
)]
pub struct UnknownDomain {
    /// The domain, as written.
    pub domain: String,

    /// Known domains with a similar name, if any.
    pub suggestions: Vec<String>,
}

/// An entry was dropped or adjusted during normalization, or is inconsistent.
#[derive(Debug, Clone, SignalKind, PartialEq)]
#[signal(code = "invalid-dictionary-entry", message = format!("invalid definition: {}", self.issue))]
pub struct InvalidDictionaryEntry {
    pub issue: Issue,
}

/// A set without supersets, or with a superset that is not a known domain.
#[derive(Debug, Clone, SignalKind, PartialEq)]
#[signal(
    code = "expected-supersets",
    message = match &self.parent {
        Some(parent) => format!("the superset `{}` is not a known domain", parent),
        None => "expected supersets in the definition of a set".to_string(),
    },
    help = "every set other than `Anything` must list the sets it belongs to",
)]
pub struct ExpectedSupersets {
    /// The unknown superset, or [`None`] if the set has no supersets.
    pub parent: Option<String>,
}

/// The supersets of a set lead back to itself. The set is removed.
#[derive(Debug, Clone, SignalKind, PartialEq)]
#[signal(
    code = "cyclic-definition",
    message = format!("cyclic definition: {}", self.chain),
    help = "the set was removed from the dictionary",
)]
pub struct CyclicDefinition {
    /// The chain of supersets, such as `A ➔ B ➔ A ↩`.
    pub chain: String,
}

#[cfg(test)]
mod tests {
    use cas_error::SignalKind;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn derived_messages() {
        let kind = DuplicateWikidata { wikidata: "Q167".to_string(), first: "Pi".to_string() };
        assert_eq!(kind.code(), "duplicate-wikidata");
        assert_eq!(kind.message(), "duplicate wikidata id `Q167`, also used by `Pi`");
        assert_eq!(kind.help(), None);

        let kind = ExpectedSupersets { parent: None };
        assert_eq!(kind.message(), "expected supersets in the definition of a set");
        assert_eq!(kind.help().as_deref(), Some("every set other than `Anything` must list the sets it belongs to"));
    }
}
