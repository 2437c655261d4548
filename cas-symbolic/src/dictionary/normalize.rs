use crate::{engine::{Engine, Scope}, expr::Expr};
use super::{
    compile_dictionary,
    definition::{
        CollectionDefinition,
        CollectionHooks,
        Definition,
        DomainSpec,
        FunctionDefinition,
        Hold,
        SetDefinition,
        SymbolDefinition,
        Value,
    },
    domains::{self, infer_numeric_domain},
    error::Issue,
    raw::{RawDefinition, RawEntry, RawHold},
};

/// Returns true if the domain is known and is a subset of the built-in domain named `superset`.
fn within<E: Engine + ?Sized>(engine: &E, scope: &Scope<'_>, domain: Option<&Expr>, superset: &str) -> bool {
    domain.map_or(false, |domain| engine.is_subset_of(scope, domain, &Expr::symbol(superset)))
}

/// Canonicalizes the expression of a value. High-precision numbers are kept as they are.
fn canonical_value<E: Engine + ?Sized>(engine: &E, scope: &Scope<'_>, value: &Value) -> Value {
    match value {
        Value::Expr(expr) => Value::Expr(engine.canonical(scope, expr)),
        other => other.clone(),
    }
}

/// Converts a raw `hold` to the hold flag of a symbol.
fn symbol_hold(hold: Option<RawHold>) -> bool {
    match hold {
        Some(RawHold::Flag(flag)) => flag,
        Some(RawHold::Policy(policy)) => policy != Hold::None,
        None => false,
    }
}

/// Converts a raw `hold` to the hold policy of a function.
fn function_hold(hold: Option<RawHold>) -> Hold {
    match hold {
        Some(RawHold::Flag(true)) => Hold::All,
        Some(RawHold::Flag(false)) | None => Hold::None,
        Some(RawHold::Policy(policy)) => policy,
    }
}

/// Normalizes a definition that has a `constant` field.
fn normalize_symbol<E: Engine + ?Sized>(
    engine: &E,
    scope: &Scope<'_>,
    raw: &RawDefinition,
) -> (SymbolDefinition, Option<Issue>) {
    let anything = || Expr::symbol(domains::ANYTHING);
    let (domain, issue) = match &raw.domain {
        None => (anything(), Some(Issue::ExpectedDomain)),
        Some(DomainSpec::Resolver(_)) => {
            (anything(), Some(Issue::UnknownDomain("<domain resolver>".to_string())))
        },
        Some(DomainSpec::Domain(domain)) => match engine.simplify(scope, domain) {
            Some(domain) => (domain, None),
            None => (anything(), Some(Issue::UnknownDomain(domain.to_string()))),
        },
    };

    let value = raw.value.as_ref().map(|value| canonical_value(engine, scope, value));
    let hold = symbol_hold(raw.hold) || value.is_none();
    let def = SymbolDefinition {
        domain,
        constant: raw.constant.unwrap_or(false),
        value,
        hold,
        wikidata: raw.wikidata.clone(),
    };
    (def, issue)
}

/// Normalizes a definition with function fields, layering them over the function template.
fn normalize_function<E: Engine + ?Sized>(
    engine: &mut E,
    scope: &Scope<'_>,
    raw: &RawDefinition,
    resolved: Option<Expr>,
) -> (FunctionDefinition, Option<Issue>) {
    let template = FunctionDefinition::default();
    let domain = match &raw.domain {
        Some(DomainSpec::Resolver(resolver)) => DomainSpec::Resolver(resolver.clone()),
        Some(DomainSpec::Domain(domain)) => DomainSpec::Domain(resolved.unwrap_or_else(|| domain.clone())),
        None => template.domain,
    };

    let value = raw.value.as_ref().map(|value| {
        if value.is_literal_number() {
            value.clone()
        } else {
            canonical_value(engine, scope, value)
        }
    });

    let def = FunctionDefinition {
        domain,
        eval_domain: raw.eval_domain.clone(),
        hold: function_hold(raw.hold),
        sequence_hold: raw.sequence_hold.unwrap_or(template.sequence_hold),
        associative: raw.associative.unwrap_or(template.associative),
        commutative: raw.commutative.unwrap_or(template.commutative),
        additive: raw.additive.unwrap_or(template.additive),
        multiplicative: raw.multiplicative.unwrap_or(template.multiplicative),
        outtative: raw.outtative.unwrap_or(template.outtative),
        idempotent: raw.idempotent.unwrap_or(template.idempotent),
        involution: raw.involution.unwrap_or(template.involution),
        numeric: raw.numeric.unwrap_or(template.numeric),
        pure: raw.pure.unwrap_or(template.pure),
        threadable: raw.threadable.unwrap_or(template.threadable),
        scope: raw.scope.as_ref().map(|local| compile_dictionary(engine, scope, local)),
        wikidata: raw.wikidata.clone(),
        value,
    };

    let issue = (raw.eval_domain.is_none() && raw.numeric != Some(true))
        .then_some(Issue::ExpectedNumericOrEvalDomain);
    (def, issue)
}

/// Normalizes a partial definition, deciding which kind of definition it is from the fields it
/// has and from its domain.
fn normalize_partial<E: Engine + ?Sized>(
    engine: &mut E,
    scope: &Scope<'_>,
    raw: &RawDefinition,
) -> (Option<Definition>, Option<Issue>) {
    if raw.constant.is_some() {
        let (def, issue) = normalize_symbol(engine, scope, raw);
        return (Some(Definition::Symbol(def)), issue);
    }

    let written = raw.domain.as_ref().and_then(DomainSpec::as_domain);
    let resolved = written.and_then(|domain| engine.simplify(scope, domain));

    if raw.has_collection_hooks() || within(engine, scope, resolved.as_ref(), domains::COLLECTION) {
        let domain = resolved
            .or_else(|| written.cloned())
            .unwrap_or_else(|| Expr::symbol(domains::COLLECTION));
        let hooks = CollectionHooks {
            iterator: raw.iterator.clone(),
            at: raw.at.clone(),
            size: raw.size.clone(),
        };
        let def = CollectionDefinition::new(domain, hooks, raw.wikidata.clone());
        return (Some(Definition::Collection(def)), None);
    }

    if raw.has_function_fields() || within(engine, scope, resolved.as_ref(), domains::FUNCTION) {
        let (def, issue) = normalize_function(engine, scope, raw, resolved);
        return (Some(Definition::Function(def)), issue);
    }

    if let Some(supersets) = &raw.supersets {
        let domain = resolved
            .or_else(|| written.cloned())
            .unwrap_or_else(|| Expr::symbol(domains::SET));
        let value = raw.value.as_ref().map(|value| match value {
            Value::Expr(expr) => Value::Expr(engine.simplify(scope, expr).unwrap_or_else(|| expr.clone())),
            other => other.clone(),
        });
        let def = SetDefinition {
            domain,
            supersets: supersets.clone(),
            value,
            wikidata: raw.wikidata.clone(),
        };
        return (Some(Definition::Set(def)), None);
    }

    match resolved {
        Some(domain) if within(engine, scope, Some(&domain), domains::NUMBER) => {
            let Some(value) = &raw.value else {
                return (None, Some(Issue::ExpectedValue));
            };
            let def = SymbolDefinition {
                domain,
                constant: false,
                value: Some(canonical_value(engine, scope, value)),
                hold: symbol_hold(raw.hold),
                wikidata: raw.wikidata.clone(),
            };
            let issue = Issue::MissingField { variant: "symbol", field: "constant" };
            (Some(Definition::Symbol(def)), Some(issue))
        },
        Some(domain) if within(engine, scope, Some(&domain), domains::SET) => {
            let def = SetDefinition {
                domain,
                supersets: Vec::new(),
                value: raw.value.clone(),
                wikidata: raw.wikidata.clone(),
            };
            let issue = Issue::MissingField { variant: "set", field: "supersets" };
            (Some(Definition::Set(def)), Some(issue))
        },
        _ => (None, Some(Issue::NotValidated)),
    }
}

/// Normalizes a raw dictionary entry into a [`Definition`].
///
/// The kind of definition is decided by the first rule that applies:
///
/// 1. A bare number is a variable holding that number.
/// 2. A bare string is parsed by the engine; the entry is a variable holding the parsed value,
///    or is dropped if the string cannot be parsed.
/// 3. A definition with a `constant` field is a symbol.
/// 4. A definition with collection hooks, or whose domain is a collection, is a collection.
/// 5. A definition with function fields, or whose domain is a function, is a function.
/// 6. A definition with `supersets` is a set.
/// 7. Otherwise, a definition whose domain is a number is a symbol, and one whose domain is a
///    set is a set, both with an issue naming the missing field. Anything else is dropped.
///
/// Returns the definition, or [`None`] if the entry must be dropped, along with the issue found
/// while normalizing it, if any.
pub fn normalize_definition<E: Engine + ?Sized>(
    engine: &mut E,
    scope: &Scope<'_>,
    entry: &RawEntry,
) -> (Option<Definition>, Option<Issue>) {
    match entry {
        RawEntry::Number(n) => {
            let def = SymbolDefinition {
                domain: infer_numeric_domain(*n),
                constant: false,
                value: Some(Value::Expr(Expr::Number(*n))),
                hold: false,
                wikidata: None,
            };
            (Some(Definition::Symbol(def)), None)
        },
        RawEntry::Text(text) => match engine.parse(text) {
            Some(value) => {
                let def = SymbolDefinition {
                    domain: engine.domain_of(scope, &value),
                    constant: false,
                    value: Some(Value::Expr(value)),
                    hold: false,
                    wikidata: None,
                };
                (Some(Definition::Symbol(def)), None)
            },
            None => (None, Some(Issue::UnparsableString)),
        },
        RawEntry::Definition(raw) => normalize_partial(engine, scope, raw),
    }
}
