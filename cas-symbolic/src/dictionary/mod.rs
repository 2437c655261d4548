//! Compilation of dictionaries of definitions.
//!
//! A dictionary is written as a [`RawDictionary`]: entry names mapped to bare numbers, bare
//! strings, or partial definitions. Compiling it normalizes every entry into one of the four
//! [`Definition`] variants, then validates the batch as a whole. Problems never abort
//! compilation; they are reported to the engine as [`Signal`]s, and the offending entries are
//! either kept (with a warning) or dropped (with an error).
//!
//! A library is assembled from several category dictionaries, compiled in the fixed order of
//! [`Category`]. Each category sees the categories compiled before it, never the ones after.

pub mod definition;
pub mod domains;
pub mod error;
pub mod normalize;
pub mod raw;
mod validate;

pub use definition::{
    CollectionDefinition,
    CollectionHooks,
    CompiledDictionary,
    Definition,
    DomainSpec,
    FunctionDefinition,
    Hold,
    SetDefinition,
    SymbolDefinition,
    Value,
};
pub use normalize::normalize_definition;
pub use raw::{RawDefinition, RawDictionary, RawEntry};
pub use validate::{describe_supersets, validate_dictionary};

use cas_error::Signal;
use crate::engine::{Engine, Scope};
use error::InvalidDictionaryEntry;
use log::debug;
use std::{fmt, str::FromStr};

/// Compiles a raw dictionary.
///
/// Every entry is normalized in the given scope, then the resulting dictionary is validated in a
/// scope where it is pushed on top of the given one. Entries that cannot be normalized are
/// dropped with an error signal; entries normalized with an issue are kept with a warning.
///
/// An absent dictionary compiles to an absent result with [`Option::map`]:
///
/// ```
/// use cas_symbolic::{dictionary::{compile_dictionary, RawDictionary}, engine::{BasicEngine, Scope}};
///
/// let mut engine = BasicEngine::new();
/// let raw: Option<RawDictionary> = None;
/// let compiled = raw.as_ref().map(|raw| compile_dictionary(&mut engine, &Scope::empty(), raw));
/// assert!(compiled.is_none());
/// ```
pub fn compile_dictionary<E: Engine + ?Sized>(
    engine: &mut E,
    scope: &Scope<'_>,
    raw: &RawDictionary,
) -> CompiledDictionary {
    let mut dictionary = CompiledDictionary::with_capacity(raw.len());

    for (name, entry) in raw {
        let (def, issue) = normalize_definition(engine, scope, entry);
        if let Some(issue) = issue {
            let kind = InvalidDictionaryEntry { issue };
            let signal = match def {
                Some(_) => Signal::warning(name, kind),
                None => Signal::error(name, kind),
            };
            engine.signal(signal);
        }

        if let Some(def) = def {
            dictionary.insert(name.clone(), def);
        }
    }

    validate_dictionary(engine, scope, &mut dictionary);
    debug!("compiled {} of {} entries", dictionary.len(), raw.len());
    dictionary
}

/// The categories of a library, in the order they are compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Domains,
    Core,
    Collections,
    Algebra,
    Arithmetic,
    Calculus,
    Combinatorics,
    Dimensions,
    Inequalities,
    LinearAlgebra,
    Logic,
    Numeric,
    Other,
    Physics,
    Polynomials,
    Relations,
    Statistics,
    Trigonometry,
    Units,
}

impl Category {
    /// Every category, in load order.
    pub const ALL: [Category; 19] = [
        Category::Domains,
        Category::Core,
        Category::Collections,
        Category::Algebra,
        Category::Arithmetic,
        Category::Calculus,
        Category::Combinatorics,
        Category::Dimensions,
        Category::Inequalities,
        Category::LinearAlgebra,
        Category::Logic,
        Category::Numeric,
        Category::Other,
        Category::Physics,
        Category::Polynomials,
        Category::Relations,
        Category::Statistics,
        Category::Trigonometry,
        Category::Units,
    ];

    /// The name of the category, such as `linear-algebra`.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Domains => "domains",
            Category::Core => "core",
            Category::Collections => "collections",
            Category::Algebra => "algebra",
            Category::Arithmetic => "arithmetic",
            Category::Calculus => "calculus",
            Category::Combinatorics => "combinatorics",
            Category::Dimensions => "dimensions",
            Category::Inequalities => "inequalities",
            Category::LinearAlgebra => "linear-algebra",
            Category::Logic => "logic",
            Category::Numeric => "numeric",
            Category::Other => "other",
            Category::Physics => "physics",
            Category::Polynomials => "polynomials",
            Category::Relations => "relations",
            Category::Statistics => "statistics",
            Category::Trigonometry => "trigonometry",
            Category::Units => "units",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The given name is not the name of a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCategory(pub String);

impl fmt::Display for InvalidCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a dictionary category", self.0)
    }
}

impl std::error::Error for InvalidCategory {}

impl FromStr for Category {
    type Err = InvalidCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL.into_iter()
            .find(|category| category.name() == s)
            .ok_or_else(|| InvalidCategory(s.to_string()))
    }
}

/// Compiles category dictionaries into a single library.
///
/// Categories are compiled in load order, whatever order they are given in. Each category is
/// compiled in a scope containing everything compiled before it. An entry that is defined again
/// by a later category replaces the earlier definition.
pub fn compile_library<'r, E: Engine + ?Sized>(
    engine: &mut E,
    scope: &Scope<'_>,
    categories: impl IntoIterator<Item = (Category, &'r RawDictionary)>,
) -> CompiledDictionary {
    let mut categories = categories.into_iter().collect::<Vec<_>>();
    categories.sort_by_key(|(category, _)| *category);

    let mut library = CompiledDictionary::new();
    for (category, raw) in categories {
        let compiled = {
            let frame = scope.push(&library);
            compile_dictionary(engine, &frame, raw)
        };

        debug!("category `{}`: {} entries", category, compiled.len());
        for (name, def) in compiled {
            if library.contains_key(&name) {
                debug!("`{}` is redefined by category `{}`", name, category);
            }
            library.insert(name, def);
        }
    }
    library
}

/// Compiles the library of built-in domains.
pub fn default_library<E: Engine + ?Sized>(engine: &mut E) -> CompiledDictionary {
    compile_library(engine, &Scope::empty(), [(Category::Domains, domains::domains_dictionary())])
}

#[cfg(test)]
mod tests {
    use crate::{engine::BasicEngine, expr::Expr};
    use super::error::CyclicDefinition;
    use pretty_assertions::assert_eq;
    use super::*;

    fn raw(json: &str) -> RawDictionary {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn default_library_is_clean() {
        let mut engine = BasicEngine::new();
        let library = default_library(&mut engine);
        assert!(engine.signals().is_empty(), "{:?}", engine.signals());
        assert_eq!(library.len(), domains_count());
        assert!(library.values().all(|def| def.as_set().is_some()));
    }

    fn domains_count() -> usize {
        domains::domains_dictionary().len()
    }

    #[test]
    fn severities() {
        let mut engine = BasicEngine::new();
        let library = default_library(&mut engine);
        let compiled = compile_dictionary(&mut engine, &Scope::root(&library), &raw(r#"{
            "Bad": "1 +",
            "Half": 0.5,
            "Guess": { "domain": "Integer", "value": 3 },
            "Nothing": {}
        }"#));

        assert_eq!(compiled.keys().collect::<Vec<_>>(), vec!["Half", "Guess"]);
        let signals = engine.signals()
            .iter()
            .map(|signal| (signal.name.as_str(), signal.severity))
            .collect::<Vec<_>>();
        assert_eq!(signals, vec![
            ("Bad", cas_error::Severity::Error),
            ("Guess", cas_error::Severity::Warning),
            ("Nothing", cas_error::Severity::Error),
        ]);
    }

    #[test]
    fn cycles_are_pruned() {
        let mut engine = BasicEngine::new();
        let library = default_library(&mut engine);
        let compiled = compile_dictionary(&mut engine, &Scope::root(&library), &raw(r#"{
            "Weird": { "domain": "Domain", "supersets": ["Strange"] },
            "Strange": { "domain": "Domain", "supersets": ["Weird"] },
            "Good": { "domain": "Domain", "supersets": ["RealNumber"] }
        }"#));

        assert!(!compiled.contains_key("Weird"));
        assert!(compiled.contains_key("Good"));
        let cycles = engine.signals()
            .iter()
            .filter(|signal| signal.downcast_ref::<CyclicDefinition>().is_some())
            .count();
        assert_eq!(cycles, 1);
    }

    #[test]
    fn categories() {
        assert_eq!("linear-algebra".parse::<Category>(), Ok(Category::LinearAlgebra));
        assert_eq!("geometry".parse::<Category>(), Err(InvalidCategory("geometry".to_string())));
        assert_eq!(Category::LinearAlgebra.to_string(), "linear-algebra");
        assert_eq!(Category::ALL[0], Category::Domains);
        assert!(Category::ALL.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn later_categories_see_earlier_ones() {
        let core = raw(r#"{ "Positive": { "domain": "Domain", "supersets": ["RealNumber"] } }"#);
        let arithmetic = raw(r#"{
            "Sqrt": { "domain": "Function", "numeric": true, "evalDomain": "Positive" },
            "Tiny": { "domain": "Domain", "supersets": ["Statistic"] }
        }"#);
        let statistics = raw(r#"{ "Statistic": { "domain": "Domain", "supersets": ["Positive"] } }"#);

        let mut engine = BasicEngine::new();
        let library = compile_library(&mut engine, &Scope::empty(), [
            (Category::Statistics, &statistics),
            (Category::Arithmetic, &arithmetic),
            (Category::Core, &core),
            (Category::Domains, domains::domains_dictionary()),
        ]);

        // `Sqrt` sees `Positive` from an earlier category; `Tiny` does not see `Statistic` yet
        let signals = engine.signals()
            .iter()
            .map(|signal| (signal.name.as_str(), signal.code()))
            .collect::<Vec<_>>();
        assert_eq!(signals, vec![("Tiny", "expected-supersets")]);
        assert!(library.contains_key("Statistic"));
        assert!(library.get_index_of("Positive").unwrap() < library.get_index_of("Sqrt").unwrap());
        let sqrt = library["Sqrt"].as_function().unwrap();
        assert_eq!(sqrt.eval_domain.as_ref().and_then(DomainSpec::as_domain), Some(&Expr::symbol("Positive")));
    }
}
