use cas_error::Signal;
use crate::{engine::{Engine, Scope}, expr::Expr};
use levenshtein::levenshtein;
use std::collections::HashMap;
use super::{
    definition::{CompiledDictionary, Definition, DomainSpec, Hold},
    domains,
    error::{
        CyclicDefinition,
        DuplicateWikidata,
        ExpectedSupersets,
        InvalidDictionaryEntry,
        InvalidName,
        Issue,
        UnknownDomain,
    },
};

/// Returns true if the name is a single character, or an ASCII letter followed by ASCII letters,
/// digits or hyphens.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(_) if name.chars().count() == 1 => true,
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
        },
        _ => false,
    }
}

/// Builds an [`UnknownDomain`] signal kind, suggesting the sets in scope with a similar name.
fn unknown_domain(scope: &Scope<'_>, domain: &Expr) -> UnknownDomain {
    let written = domain.name().unwrap_or_default();
    let mut suggestions = Vec::new();
    for frame in scope.frames() {
        for (name, def) in frame.dictionary() {
            if matches!(def, Definition::Set(_))
                && levenshtein(name, written) <= 2
                && !suggestions.contains(name)
            {
                suggestions.push(name.clone());
            }
        }
    }
    suggestions.truncate(3);

    UnknownDomain {
        domain: domain.to_string(),
        suggestions,
    }
}

/// Renders the chain of supersets of a set, such as `A ➔ B ➔ A ↩`.
///
/// A name that is not a set is marked with `?!`. The supersets of a set with more than one
/// superset are listed in brackets.
pub fn describe_supersets<E: Engine + ?Sized>(engine: &E, scope: &Scope<'_>, name: &str) -> String {
    fn describe<E: Engine + ?Sized>(engine: &E, scope: &Scope<'_>, name: &str, visited: &mut Vec<String>) -> String {
        if visited.iter().any(|v| v == name) {
            return format!("{} ↩", name);
        }
        let Some(Definition::Set(set)) = engine.get_definition(scope, name) else {
            return format!("{}?!", name);
        };

        visited.push(name.to_string());
        let parents = set.supersets.iter()
            .map(|parent| describe(engine, scope, parent, &mut visited.clone()))
            .collect::<Vec<_>>();
        match parents.as_slice() {
            [] => name.to_string(),
            [parent] => format!("{} ➔ {}", name, parent),
            parents => format!("{} ➔ [{}]", name, parents.join(", ")),
        }
    }

    describe(engine, scope, name, &mut Vec::new())
}

/// Validates one entry. Returns true if the entry is part of a superset cycle and must be
/// removed. Every superset is still checked after a cycle is found, but the cycle is reported
/// once.
fn validate_entry<E: Engine + ?Sized>(
    engine: &mut E,
    scope: &Scope<'_>,
    name: &str,
    def: &Definition,
    wikidata: &mut HashMap<String, String>,
) -> bool {
    if !is_valid_name(name) {
        engine.signal(Signal::error(name, InvalidName { name: name.to_string() }));
    }

    if let Some(id) = def.wikidata() {
        match wikidata.get(id) {
            Some(first) => engine.signal(Signal::warning(name, DuplicateWikidata {
                wikidata: id.to_string(),
                first: first.clone(),
            })),
            None => {
                wikidata.insert(id.to_string(), name.to_string());
            },
        }
    }

    let anything = Expr::symbol(domains::ANYTHING);
    let invalid = |issue| InvalidDictionaryEntry { issue };
    match def {
        Definition::Symbol(symbol) => {
            if !engine.is_subset_of(scope, &symbol.domain, &anything) {
                let kind = unknown_domain(scope, &symbol.domain);
                engine.signal(Signal::warning(name, kind));
            }
            if !symbol.hold && symbol.value.is_none() {
                engine.signal(Signal::warning(name, invalid(Issue::HoldWithoutValue)));
            }
        },
        Definition::Function(function) => {
            if let Some(DomainSpec::Domain(domain)) = &function.eval_domain {
                if !engine.is_subset_of(scope, domain, &anything) {
                    let kind = unknown_domain(scope, domain);
                    engine.signal(Signal::warning(name, kind));
                }
            }
            if function.numeric && function.hold != Hold::None {
                engine.signal(Signal::warning(name, invalid(Issue::HoldOnNumericFunction)));
            }
            if function.idempotent && function.involution {
                engine.signal(Signal::warning(name, invalid(Issue::IdempotentInvolution)));
            }
        },
        Definition::Collection(_) => (),
        Definition::Set(set) => {
            if set.supersets.is_empty() && name != domains::ANYTHING {
                engine.signal(Signal::warning(name, ExpectedSupersets { parent: None }));
            }

            let this = Expr::symbol(name);
            let mut cyclic = false;
            for parent in &set.supersets {
                let parent_expr = Expr::symbol(parent);
                if !engine.is_subset_of(scope, &parent_expr, &anything) {
                    engine.signal(Signal::warning(name, ExpectedSupersets { parent: Some(parent.clone()) }));
                }
                if !cyclic && engine.is_subset_of(scope, &parent_expr, &this) {
                    let chain = describe_supersets(engine, scope, name);
                    engine.signal(Signal::warning(name, CyclicDefinition { chain }));
                    cyclic = true;
                }
            }
            return cyclic;
        },
    }

    false
}

/// Validates every entry of a compiled dictionary, in order, reporting problems through
/// [`Engine::signal`].
///
/// Each entry is checked in a scope where the dictionary itself is visible, so that entries can
/// refer to each other. A set whose supersets lead back to itself is removed immediately, so the
/// entries after it no longer see it. Every other problem is only reported.
pub fn validate_dictionary<E: Engine + ?Sized>(
    engine: &mut E,
    scope: &Scope<'_>,
    dictionary: &mut CompiledDictionary,
) {
    let names = dictionary.keys().cloned().collect::<Vec<_>>();
    let mut wikidata = HashMap::new();

    for name in names {
        let cyclic = {
            let frame = scope.push(&*dictionary);
            match frame.dictionary().get(&name) {
                Some(def) => validate_entry(engine, &frame, &name, def, &mut wikidata),
                None => false,
            }
        };

        if cyclic {
            dictionary.shift_remove(&name);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        dictionary::{default_library, SetDefinition, SymbolDefinition, FunctionDefinition},
        engine::BasicEngine,
    };
    use pretty_assertions::assert_eq;
    use super::*;

    fn set(supersets: &[&str]) -> Definition {
        Definition::Set(SetDefinition {
            domain: Expr::symbol("Domain"),
            supersets: supersets.iter().map(|s| s.to_string()).collect(),
            value: None,
            wikidata: None,
        })
    }

    fn codes(engine: &BasicEngine) -> Vec<(&str, &'static str)> {
        engine.signals()
            .iter()
            .map(|signal| (signal.name.as_str(), signal.code()))
            .collect()
    }

    #[test]
    fn names() {
        assert!(is_valid_name("x"));
        assert!(is_valid_name("π"));
        assert!(is_valid_name("Real-Number2"));
        assert!(!is_valid_name("2x"));
        assert!(!is_valid_name("a b"));
        assert!(!is_valid_name("x!"));
        assert!(!is_valid_name(""));
    }

    #[test]
    fn cyclic_set_is_removed() {
        let mut engine = BasicEngine::new();
        let library = default_library(&mut engine);
        let scope = Scope::root(&library);

        let mut dictionary = CompiledDictionary::from([
            ("Loop".to_string(), set(&["Loop"])),
            ("A".to_string(), set(&["B"])),
            ("B".to_string(), set(&["A"])),
            ("Fine".to_string(), set(&["Number"])),
        ]);
        validate_dictionary(&mut engine, &scope, &mut dictionary);

        assert_eq!(dictionary.keys().collect::<Vec<_>>(), vec!["B", "Fine"]);
        let cycles = engine.signals()
            .iter()
            .filter_map(|signal| signal.downcast_ref::<CyclicDefinition>().map(|kind| (signal.name.as_str(), kind.chain.as_str())))
            .collect::<Vec<_>>();
        assert_eq!(cycles, vec![("Loop", "Loop ➔ Loop ↩"), ("A", "A ➔ B ➔ A ↩")]);
    }

    #[test]
    fn supersets_after_a_cycle_are_checked() {
        let mut engine = BasicEngine::new();
        let library = default_library(&mut engine);
        let scope = Scope::root(&library);

        let mut dictionary = CompiledDictionary::from([
            ("Loop".to_string(), set(&["Loop", "Nowhere", "Loop"])),
        ]);
        validate_dictionary(&mut engine, &scope, &mut dictionary);

        assert!(dictionary.is_empty());
        assert_eq!(codes(&engine), vec![
            ("Loop", "expected-supersets"),
            ("Loop", "cyclic-definition"),
            ("Loop", "expected-supersets"),
            ("Loop", "expected-supersets"),
        ]);
        let unknown = engine.signals()
            .iter()
            .filter_map(|signal| signal.downcast_ref::<ExpectedSupersets>())
            .map(|kind| kind.parent.as_deref())
            .collect::<Vec<_>>();
        assert_eq!(unknown, vec![Some("Loop"), Some("Nowhere"), Some("Loop")]);
    }

    #[test]
    fn supersets() {
        let mut engine = BasicEngine::new();
        let library = default_library(&mut engine);
        let scope = Scope::root(&library);

        let mut dictionary = CompiledDictionary::from([
            ("Empty".to_string(), set(&[])),
            ("Orphan".to_string(), set(&["Nowhere"])),
        ]);
        validate_dictionary(&mut engine, &scope, &mut dictionary);

        assert_eq!(codes(&engine), vec![("Empty", "expected-supersets"), ("Orphan", "expected-supersets")]);
        assert_eq!(
            engine.signals()[1].downcast_ref::<ExpectedSupersets>(),
            Some(&ExpectedSupersets { parent: Some("Nowhere".to_string()) }),
        );
        assert_eq!(dictionary.len(), 2);
    }

    #[test]
    fn duplicate_wikidata() {
        let mut engine = BasicEngine::new();
        let symbol = |wikidata: &str| Definition::Symbol(SymbolDefinition {
            domain: Expr::symbol("RealNumber"),
            constant: true,
            value: None,
            hold: true,
            wikidata: Some(wikidata.to_string()),
        });
        let library = default_library(&mut engine);
        let scope = Scope::root(&library);

        let mut dictionary = CompiledDictionary::from([
            ("Pi".to_string(), symbol("Q167")),
            ("π".to_string(), symbol("Q167")),
            ("E".to_string(), symbol("Q82435")),
        ]);
        validate_dictionary(&mut engine, &scope, &mut dictionary);

        assert_eq!(codes(&engine), vec![("π", "duplicate-wikidata")]);
        assert_eq!(
            engine.signals()[0].downcast_ref::<DuplicateWikidata>(),
            Some(&DuplicateWikidata { wikidata: "Q167".to_string(), first: "Pi".to_string() }),
        );
        assert!(dictionary.contains_key("Pi") && dictionary.contains_key("π"));
    }

    #[test]
    fn symbols_and_functions() {
        let mut engine = BasicEngine::new();
        let library = default_library(&mut engine);
        let scope = Scope::root(&library);

        let mut dictionary = CompiledDictionary::from([
            ("x".to_string(), Definition::Symbol(SymbolDefinition {
                domain: Expr::symbol("Integr"),
                constant: false,
                value: None,
                hold: false,
                wikidata: None,
            })),
            ("F".to_string(), Definition::Function(FunctionDefinition {
                eval_domain: Some(DomainSpec::Domain(Expr::symbol("Nowhere"))),
                numeric: true,
                hold: Hold::First,
                idempotent: true,
                involution: true,
                ..Default::default()
            })),
            ("2x".to_string(), set(&["Anything"])),
        ]);
        validate_dictionary(&mut engine, &scope, &mut dictionary);

        assert_eq!(codes(&engine), vec![
            ("x", "unknown-domain"),
            ("x", "invalid-dictionary-entry"),
            ("F", "unknown-domain"),
            ("F", "invalid-dictionary-entry"),
            ("F", "invalid-dictionary-entry"),
            ("2x", "invalid-name"),
        ]);
        assert_eq!(
            engine.signals()[0].downcast_ref::<UnknownDomain>().map(|kind| kind.suggestions.clone()),
            Some(vec!["Integer".to_string()]),
        );
        assert_eq!(dictionary.len(), 3);
    }

    #[test]
    fn describe_chains() {
        let mut engine = BasicEngine::new();
        let library = default_library(&mut engine);
        let scope = Scope::root(&library);
        assert_eq!(describe_supersets(&engine, &scope, "Integer"), "Integer ➔ RationalNumber ➔ RealNumber ➔ [ComplexNumber ➔ ExtendedComplexNumber ➔ Number ➔ Anything, ExtendedRealNumber ➔ ExtendedComplexNumber ➔ Number ➔ Anything]");
        assert_eq!(describe_supersets(&engine, &scope, "Nowhere"), "Nowhere?!");
    }
}
