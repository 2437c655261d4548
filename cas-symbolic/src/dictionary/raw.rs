//! Dictionary entries as they are written, before normalization.
//!
//! A raw dictionary maps entry names to one of three shapes: a bare number, a bare string (text
//! to be parsed by the engine), or a partial definition whose fields hint at the kind of entry it
//! is. Every field of a partial definition is optional; [`normalize_definition`] decides what the
//! entry is and fills in the rest.
//!
//! Raw dictionaries can be read from JSON, where field names are written in camel case:
//!
//! ```
//! use cas_symbolic::dictionary::raw::{RawDictionary, RawEntry};
//!
//! let raw: RawDictionary = serde_json::from_str(r#"{
//!     "Pi": { "domain": "TranscendentalNumber", "constant": true, "wikidata": "Q167" },
//!     "Sin": { "domain": "Function", "numeric": true, "evalDomain": "RealNumber" },
//!     "Half": 0.5,
//!     "Golden": "['Divide', ['Add', 1, ['Sqrt', 5]], 2]"
//! }"#).unwrap();
//!
//! assert!(matches!(raw["Half"], RawEntry::Number(_)));
//! assert!(matches!(raw["Golden"], RawEntry::Text(_)));
//! ```
//!
//! Callbacks (domain resolvers and collection hooks) cannot be written in JSON; they are set on
//! the raw definition in code.
//!
//! [`normalize_definition`]: super::normalize::normalize_definition

use indexmap::IndexMap;
use serde::Deserialize;
use super::definition::{AtHook, DomainSpec, Hold, IteratorHook, SizeHook, Value};

/// A raw `hold` field: either a flag or a hold policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawHold {
    Flag(bool),
    Policy(Hold),
}

/// A partial definition. Which fields are present decides the kind of definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDefinition {
    pub domain: Option<DomainSpec>,
    pub wikidata: Option<String>,
    pub value: Option<Value>,
    pub hold: Option<RawHold>,

    // symbols
    pub constant: Option<bool>,

    // functions
    pub eval_domain: Option<DomainSpec>,
    pub sequence_hold: Option<bool>,
    pub associative: Option<bool>,
    pub commutative: Option<bool>,
    pub additive: Option<bool>,
    pub multiplicative: Option<bool>,
    pub outtative: Option<bool>,
    pub idempotent: Option<bool>,
    pub involution: Option<bool>,
    pub numeric: Option<bool>,
    pub pure: Option<bool>,
    pub threadable: Option<bool>,
    pub scope: Option<RawDictionary>,

    // collections
    #[serde(skip)]
    pub iterator: Option<IteratorHook>,
    #[serde(skip)]
    pub at: Option<AtHook>,
    #[serde(skip)]
    pub size: Option<SizeHook>,

    // sets
    pub supersets: Option<Vec<String>>,
}

impl RawDefinition {
    /// Returns true if any collection hook is set.
    pub fn has_collection_hooks(&self) -> bool {
        self.iterator.is_some() || self.at.is_some() || self.size.is_some()
    }

    /// Returns true if any field that only functions have is set. `hold` is not one of them, as
    /// symbols have it too.
    pub fn has_function_fields(&self) -> bool {
        self.eval_domain.is_some()
            || self.numeric.is_some()
            || self.sequence_hold.is_some()
            || [
                self.associative,
                self.commutative,
                self.additive,
                self.multiplicative,
                self.outtative,
                self.idempotent,
                self.involution,
                self.pure,
                self.threadable,
            ].iter().any(Option::is_some)
            || self.scope.is_some()
    }
}

/// A raw dictionary entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    /// A bare number, defining a variable with that value.
    Number(f64),

    /// Text to be parsed by the engine, defining a variable with the parsed value.
    Text(String),

    /// A partial definition.
    Definition(RawDefinition),
}

impl From<f64> for RawEntry {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<RawDefinition> for RawEntry {
    fn from(def: RawDefinition) -> Self {
        Self::Definition(def)
    }
}

/// A raw dictionary: entry names mapped to raw entries, in the order they were written.
pub type RawDictionary = IndexMap<String, RawEntry>;
