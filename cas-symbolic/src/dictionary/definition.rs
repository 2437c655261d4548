//! The normalized form of dictionary entries.
//!
//! Every entry of a compiled dictionary is exactly one of the four [`Definition`] variants. The
//! variant is decided once, when the raw entry is normalized, and never re-inferred afterward.

use crate::expr::Expr;
use indexmap::IndexMap;
use rug::{Complex, Float};
use serde::Deserialize;
use std::{fmt, sync::Arc};
use super::domains;

/// Generates a cloneable wrapper around a shared callback.
macro_rules! hook {
    ($(#[$meta:meta])* $name:ident(|$($arg:ident: $ty:ty),*| -> $ret:ty)) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(Arc<dyn Fn($($ty),*) -> $ret + Send + Sync>);

        impl $name {
            /// Wraps the given callback.
            pub fn new(f: impl Fn($($ty),*) -> $ret + Send + Sync + 'static) -> Self {
                Self(Arc::new(f))
            }

            /// Invokes the callback.
            pub fn call(&self, $($arg: $ty),*) -> $ret {
                (self.0)($($arg),*)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(..)"))
            }
        }
    };
}

hook!(
    /// Computes the domain of a function call from its arguments. Returns [`None`] if the
    /// arguments are not valid for the function.
    DomainResolver(|args: &[Expr]| -> Option<Expr>)
);

hook!(
    /// Returns the elements of a collection.
    IteratorHook(|collection: &Expr| -> Vec<Expr>)
);

hook!(
    /// Returns the element of a collection at the given (zero-based) index.
    AtHook(|collection: &Expr, index: usize| -> Option<Expr>)
);

hook!(
    /// Returns the number of elements of a collection.
    SizeHook(|collection: &Expr| -> usize)
);

/// The domain of a function, or of the values a function evaluates to.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "Expr")]
pub enum DomainSpec {
    /// A concrete domain expression, such as `RealNumber` or `Function(Number, Number)`.
    Domain(Expr),

    /// A callback computing the domain from the arguments of a call.
    Resolver(DomainResolver),
}

impl DomainSpec {
    /// Returns the domain expression if this is a concrete domain.
    pub fn as_domain(&self) -> Option<&Expr> {
        match self {
            Self::Domain(domain) => Some(domain),
            Self::Resolver(_) => None,
        }
    }
}

impl From<Expr> for DomainSpec {
    fn from(domain: Expr) -> Self {
        Self::Domain(domain)
    }
}

/// Which arguments of a function are held, that is, not evaluated before the function is
/// applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hold {
    /// No argument is held.
    #[default]
    None,

    /// Every argument is held.
    All,

    /// Only the first argument is held.
    First,

    /// Every argument but the first is held.
    Rest,

    /// Only the last argument is held.
    Last,

    /// Every argument but the last is held.
    Most,
}

/// The value of a definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Expr")]
pub enum Value {
    /// A symbolic expression.
    Expr(Expr),

    /// A high-precision real number.
    Float(Float),

    /// A high-precision complex number.
    Complex(Complex),
}

impl Value {
    /// Returns true if this value is a number of any precision.
    pub fn is_literal_number(&self) -> bool {
        match self {
            Self::Expr(expr) => expr.as_number().is_some(),
            Self::Float(_) | Self::Complex(_) => true,
        }
    }
}

impl From<Expr> for Value {
    fn from(expr: Expr) -> Self {
        Self::Expr(expr)
    }
}

impl From<Float> for Value {
    fn from(float: Float) -> Self {
        Self::Float(float)
    }
}

impl From<Complex> for Value {
    fn from(complex: Complex) -> Self {
        Self::Complex(complex)
    }
}

/// The callbacks that give a collection its capabilities.
#[derive(Debug, Clone, Default)]
pub struct CollectionHooks {
    /// Returns the elements of the collection.
    pub iterator: Option<IteratorHook>,

    /// Returns the element at an index.
    pub at: Option<AtHook>,

    /// Returns the number of elements.
    pub size: Option<SizeHook>,
}

impl CollectionHooks {
    /// Returns true if no hook is set.
    pub fn is_empty(&self) -> bool {
        self.iterator.is_none() && self.at.is_none() && self.size.is_none()
    }
}

/// A symbol, such as a constant or a variable.
#[derive(Debug, Clone)]
pub struct SymbolDefinition {
    /// The domain of the symbol.
    pub domain: Expr,

    /// If true, the value of the symbol cannot be changed.
    pub constant: bool,

    /// The value of the symbol.
    pub value: Option<Value>,

    /// If true, the value is not substituted for the symbol automatically.
    pub hold: bool,

    /// An external identifier for the symbol.
    pub wikidata: Option<String>,
}

/// A function, such as `Add` or `Sin`.
///
/// The [`Default`] implementation is the template every function definition starts from: a
/// pure function in the `Function` domain, with every other flag false.
#[derive(Debug, Clone)]
pub struct FunctionDefinition {
    pub domain: DomainSpec,
    pub eval_domain: Option<DomainSpec>,
    pub hold: Hold,
    pub sequence_hold: bool,
    pub associative: bool,
    pub commutative: bool,
    pub additive: bool,
    pub multiplicative: bool,
    pub outtative: bool,
    pub idempotent: bool,
    pub involution: bool,
    pub numeric: bool,
    pub pure: bool,
    pub threadable: bool,

    /// Definitions local to the function.
    pub scope: Option<CompiledDictionary>,

    pub wikidata: Option<String>,
    pub value: Option<Value>,
}

impl Default for FunctionDefinition {
    fn default() -> Self {
        Self {
            domain: DomainSpec::Domain(Expr::symbol(domains::FUNCTION)),
            eval_domain: None,
            hold: Hold::None,
            sequence_hold: false,
            associative: false,
            commutative: false,
            additive: false,
            multiplicative: false,
            outtative: false,
            idempotent: false,
            involution: false,
            numeric: false,
            pure: true,
            threadable: false,
            scope: None,
            wikidata: None,
            value: None,
        }
    }
}

/// A collection, such as a list.
#[derive(Debug, Clone)]
pub struct CollectionDefinition {
    pub domain: Expr,

    /// True if the collection has an iterator hook.
    pub iterable: bool,

    /// True if the collection has an `at` hook.
    pub indexable: bool,

    /// True if the collection has a size hook.
    pub countable: bool,

    pub hooks: CollectionHooks,
    pub wikidata: Option<String>,
}

impl CollectionDefinition {
    /// Creates a collection definition whose capabilities follow from the given hooks.
    pub fn new(domain: Expr, hooks: CollectionHooks, wikidata: Option<String>) -> Self {
        Self {
            domain,
            iterable: hooks.iterator.is_some(),
            indexable: hooks.at.is_some(),
            countable: hooks.size.is_some(),
            hooks,
            wikidata,
        }
    }
}

/// A set, such as a domain.
#[derive(Debug, Clone)]
pub struct SetDefinition {
    pub domain: Expr,

    /// The names of the sets this set is a subset of, in declaration order.
    pub supersets: Vec<String>,

    pub value: Option<Value>,
    pub wikidata: Option<String>,
}

/// A normalized dictionary entry.
#[derive(Debug, Clone)]
pub enum Definition {
    Symbol(SymbolDefinition),
    Function(FunctionDefinition),
    Collection(CollectionDefinition),
    Set(SetDefinition),
}

impl Definition {
    /// The external identifier of the definition, whatever its variant.
    pub fn wikidata(&self) -> Option<&str> {
        match self {
            Self::Symbol(def) => def.wikidata.as_deref(),
            Self::Function(def) => def.wikidata.as_deref(),
            Self::Collection(def) => def.wikidata.as_deref(),
            Self::Set(def) => def.wikidata.as_deref(),
        }
    }

    /// A short name for the variant, used in messages.
    pub fn variant(&self) -> &'static str {
        match self {
            Self::Symbol(_) => "symbol",
            Self::Function(_) => "function",
            Self::Collection(_) => "collection",
            Self::Set(_) => "set",
        }
    }

    pub fn as_symbol(&self) -> Option<&SymbolDefinition> {
        match self {
            Self::Symbol(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionDefinition> {
        match self {
            Self::Function(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionDefinition> {
        match self {
            Self::Collection(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetDefinition> {
        match self {
            Self::Set(def) => Some(def),
            _ => None,
        }
    }
}

/// A compiled dictionary: entry names mapped to their definitions, in insertion order.
pub type CompiledDictionary = IndexMap<String, Definition>;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn function_template() {
        let def = FunctionDefinition::default();
        assert!(def.pure);
        assert_eq!(def.hold, Hold::None);
        assert!(!def.numeric && !def.threadable && !def.sequence_hold);
        assert_eq!(def.domain.as_domain(), Some(&Expr::symbol("Function")));
    }

    #[test]
    fn hooks() {
        let resolver = DomainResolver::new(|args| Some(Expr::symbol(if args.is_empty() { "Nothing" } else { "Number" })));
        assert_eq!(resolver.call(&[]), Some(Expr::symbol("Nothing")));
        assert_eq!(format!("{:?}", resolver), "DomainResolver(..)");

        let hooks = CollectionHooks {
            size: Some(SizeHook::new(|list| list.args().len())),
            ..Default::default()
        };
        let def = CollectionDefinition::new(Expr::symbol("List"), hooks, None);
        assert_eq!((def.iterable, def.indexable, def.countable), (false, false, true));
        let list = Expr::function("List", vec![Expr::Number(1.0), Expr::Number(2.0)]);
        assert_eq!(def.hooks.size.as_ref().map(|size| size.call(&list)), Some(2));
    }

    #[test]
    fn literal_numbers() {
        assert!(Value::Expr(Expr::Number(1.0)).is_literal_number());
        assert!(Value::Float(Float::with_val(128, 1.5)).is_literal_number());
        assert!(!Value::Expr(Expr::symbol("x")).is_literal_number());
    }
}
