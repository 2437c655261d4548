//! The built-in domain hierarchy.
//!
//! Domains are [`Set`](super::definition::SetDefinition) definitions related to each other by
//! their supersets. The hierarchy is rooted at [`ANYTHING`], the universal domain, and is
//! compiled as the first category of every library so that later categories can refer to it.

use crate::expr::Expr;
use once_cell::sync::Lazy;
use super::{definition::DomainSpec, raw::{RawDefinition, RawDictionary, RawEntry}};

pub const ANYTHING: &str = "Anything";
pub const DOMAIN: &str = "Domain";
pub const BOOLEAN: &str = "Boolean";
pub const STRING: &str = "String";
pub const SYMBOL: &str = "Symbol";
pub const NUMBER: &str = "Number";
pub const EXTENDED_COMPLEX_NUMBER: &str = "ExtendedComplexNumber";
pub const COMPLEX_NUMBER: &str = "ComplexNumber";
pub const IMAGINARY_NUMBER: &str = "ImaginaryNumber";
pub const EXTENDED_REAL_NUMBER: &str = "ExtendedRealNumber";
pub const REAL_NUMBER: &str = "RealNumber";
pub const RATIONAL_NUMBER: &str = "RationalNumber";
pub const INTEGER: &str = "Integer";
pub const NATURAL_NUMBER: &str = "NaturalNumber";
pub const COLLECTION: &str = "Collection";
pub const LIST: &str = "List";
pub const DICTIONARY: &str = "Dictionary";
pub const SET: &str = "Set";
pub const FUNCTION: &str = "Function";
pub const PREDICATE: &str = "Predicate";

/// Each domain, its supersets, and its external identifier.
const HIERARCHY: &[(&str, &[&str], Option<&str>)] = &[
    (ANYTHING, &[], None),
    (DOMAIN, &[ANYTHING], None),
    (BOOLEAN, &[ANYTHING], None),
    (STRING, &[ANYTHING], None),
    (SYMBOL, &[ANYTHING], None),
    (NUMBER, &[ANYTHING], Some("Q11563")),
    (EXTENDED_COMPLEX_NUMBER, &[NUMBER], None),
    (COMPLEX_NUMBER, &[EXTENDED_COMPLEX_NUMBER], Some("Q11567")),
    (IMAGINARY_NUMBER, &[COMPLEX_NUMBER], Some("Q9165172")),
    (EXTENDED_REAL_NUMBER, &[EXTENDED_COMPLEX_NUMBER], None),
    (REAL_NUMBER, &[COMPLEX_NUMBER, EXTENDED_REAL_NUMBER], Some("Q12916")),
    (RATIONAL_NUMBER, &[REAL_NUMBER], Some("Q1244890")),
    (INTEGER, &[RATIONAL_NUMBER], Some("Q12503")),
    (NATURAL_NUMBER, &[INTEGER], Some("Q21199")),
    (COLLECTION, &[ANYTHING], None),
    (LIST, &[COLLECTION], None),
    (DICTIONARY, &[COLLECTION], None),
    (SET, &[ANYTHING], None),
    (FUNCTION, &[ANYTHING], None),
    (PREDICATE, &[FUNCTION], None),
];

static DOMAINS: Lazy<RawDictionary> = Lazy::new(|| {
    HIERARCHY.iter()
        .map(|(name, supersets, wikidata)| {
            let def = RawDefinition {
                domain: Some(DomainSpec::Domain(Expr::symbol(DOMAIN))),
                supersets: Some(supersets.iter().map(|s| s.to_string()).collect()),
                wikidata: wikidata.map(str::to_string),
                ..Default::default()
            };
            (name.to_string(), RawEntry::Definition(def))
        })
        .collect()
});

/// The raw dictionary of the built-in domains.
pub fn domains_dictionary() -> &'static RawDictionary {
    &DOMAINS
}

/// Returns the narrowest built-in domain containing the given number.
pub fn infer_numeric_domain(n: f64) -> Expr {
    let name = if n.is_nan() {
        NUMBER
    } else if n.is_infinite() {
        EXTENDED_REAL_NUMBER
    } else if n.fract() == 0.0 {
        INTEGER
    } else {
        REAL_NUMBER
    };
    Expr::symbol(name)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn numeric_domains() {
        assert_eq!(infer_numeric_domain(3.0), Expr::symbol("Integer"));
        assert_eq!(infer_numeric_domain(-0.5), Expr::symbol("RealNumber"));
        assert_eq!(infer_numeric_domain(f64::NEG_INFINITY), Expr::symbol("ExtendedRealNumber"));
        assert_eq!(infer_numeric_domain(f64::NAN), Expr::symbol("Number"));
    }

    #[test]
    fn hierarchy_is_rooted() {
        let domains = domains_dictionary();
        assert_eq!(domains.get_index(0).map(|(name, _)| name.as_str()), Some(ANYTHING));
        for (name, entry) in domains {
            let RawEntry::Definition(def) = entry else {
                panic!("`{}` is not a definition", name);
            };
            for parent in def.supersets.iter().flatten() {
                let parent_index = domains.get_index_of(parent).unwrap();
                assert!(parent_index < domains.get_index_of(name).unwrap());
            }
        }
    }
}
