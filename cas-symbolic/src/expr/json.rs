//! Conversion between [`Expr`] and MathJSON.
//!
//! | MathJSON                                  | [`Expr`]                          |
//! | ----------------------------------------- | --------------------------------- |
//! | `2`, `3.14`                               | [`Expr::Number`]                  |
//! | `{"num": "NaN"}`, `{"num": "-Infinity"}`  | [`Expr::Number`]                  |
//! | `"'hello'"`, `{"str": "hello"}`           | [`Expr::String`]                  |
//! | `"x"`, `{"sym": "Pi", "wikidata": "Q167"}`| [`Expr::Symbol`]                  |
//! | `{"dict": {"a": 1}}`                      | [`Expr::Dictionary`]              |
//! | `["Add", 1, "x"]`, `{"fn": ["Add", 1]}`   | [`Expr::Call`]                    |
//!
//! Serialization produces the shortest of these forms that round-trips.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use std::fmt::{self, Display, Formatter};
use super::{Expr, Symbol};

/// Errors that can occur when reading an expression from MathJSON.
#[derive(Debug, Clone, PartialEq)]
pub enum MathJsonError {
    /// A JSON value with no expression equivalent, such as `null` or `true`.
    UnsupportedValue(String),

    /// A function call with no head, such as `[]`.
    EmptyCall,

    /// The text of a `{"num": ...}` object is not a number.
    InvalidNumber(String),

    /// An object without any of the recognized keys.
    UnknownObject(Vec<String>),
}

impl Display for MathJsonError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedValue(value) => write!(f, "`{}` is not a valid expression", value),
            Self::EmptyCall => write!(f, "a function call must have a head"),
            Self::InvalidNumber(text) => write!(f, "`{}` is not a valid number", text),
            Self::UnknownObject(keys) => write!(
                f,
                "expected an object with a `num`, `str`, `sym`, `dict` or `fn` key, found keys: {}",
                keys.join(", "),
            ),
        }
    }
}

impl std::error::Error for MathJsonError {}

/// Parses the text of a `{"num": ...}` object.
fn parse_number(text: &str) -> Result<f64, MathJsonError> {
    match text {
        "NaN" => Ok(f64::NAN),
        "Infinity" | "+Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        _ => text.parse().map_err(|_| MathJsonError::InvalidNumber(text.to_string())),
    }
}

/// Converts a JSON number to an `f64`.
fn number_to_f64(n: &Number) -> Result<f64, MathJsonError> {
    n.as_f64().ok_or_else(|| MathJsonError::InvalidNumber(n.to_string()))
}

/// Builds a function call from the elements of an array, the first being the head.
fn call_from_array(items: Vec<Value>) -> Result<Expr, MathJsonError> {
    let mut items = items.into_iter();
    let head = items.next().ok_or(MathJsonError::EmptyCall)?;
    let head = Expr::try_from(head)?;
    let args = items.map(Expr::try_from).collect::<Result<Vec<_>, _>>()?;
    Ok(Expr::call(head, args))
}

/// Reads one of the object forms.
fn from_object(mut object: Map<String, Value>) -> Result<Expr, MathJsonError> {
    if let Some(num) = object.remove("num") {
        return match num {
            Value::String(text) => parse_number(&text).map(Expr::Number),
            Value::Number(n) => number_to_f64(&n).map(Expr::Number),
            other => Err(MathJsonError::InvalidNumber(other.to_string())),
        };
    }

    if let Some(text) = object.remove("str") {
        return match text {
            Value::String(text) => Ok(Expr::String(text)),
            other => Err(MathJsonError::UnsupportedValue(other.to_string())),
        };
    }

    if let Some(name) = object.remove("sym") {
        let Value::String(name) = name else {
            return Err(MathJsonError::UnsupportedValue(name.to_string()));
        };
        let wikidata = match object.remove("wikidata") {
            Some(Value::String(id)) => Some(id),
            Some(other) => return Err(MathJsonError::UnsupportedValue(other.to_string())),
            None => None,
        };
        return Ok(Expr::Symbol(Symbol { name, wikidata }));
    }

    if let Some(entries) = object.remove("dict") {
        let Value::Object(entries) = entries else {
            return Err(MathJsonError::UnsupportedValue(entries.to_string()));
        };
        return entries.into_iter()
            .map(|(key, value)| Ok::<_, MathJsonError>((key, Expr::try_from(value)?)))
            .collect::<Result<IndexMap<_, _>, _>>()
            .map(Expr::Dictionary);
    }

    if let Some(items) = object.remove("fn") {
        let Value::Array(items) = items else {
            return Err(MathJsonError::UnsupportedValue(items.to_string()));
        };
        return call_from_array(items);
    }

    Err(MathJsonError::UnknownObject(object.keys().cloned().collect()))
}

impl TryFrom<Value> for Expr {
    type Error = MathJsonError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => number_to_f64(&n).map(Expr::Number),
            Value::String(text) => {
                match text.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')) {
                    Some(inner) => Ok(Expr::String(inner.to_string())),
                    None => Ok(Expr::symbol(text)),
                }
            },
            Value::Array(items) => call_from_array(items),
            Value::Object(object) => from_object(object),
            other @ (Value::Null | Value::Bool(_)) => Err(MathJsonError::UnsupportedValue(other.to_string())),
        }
    }
}

impl From<&Expr> for Value {
    fn from(expr: &Expr) -> Self {
        match expr {
            Expr::Number(n) if n.is_nan() => single("num", Value::from("NaN")),
            Expr::Number(n) if n.is_infinite() => {
                let text = if n.is_sign_positive() { "+Infinity" } else { "-Infinity" };
                single("num", Value::from(text))
            },
            // integers that fit exactly in an `f64` are written without a fractional part, except
            // `-0`, whose sign would be lost
            Expr::Number(n) if n.fract() == 0.0
                && n.abs() < 9007199254740992.0
                && !(*n == 0.0 && n.is_sign_negative()) => {
                Value::from(*n as i64)
            },
            Expr::Number(n) => Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null),
            Expr::String(text) => Value::String(format!("'{}'", text)),
            Expr::Symbol(Symbol { name, wikidata: None }) if !name.starts_with('\'') => {
                Value::String(name.clone())
            },
            Expr::Symbol(Symbol { name, wikidata }) => {
                let mut object = Map::new();
                object.insert("sym".to_string(), Value::String(name.clone()));
                if let Some(id) = wikidata {
                    object.insert("wikidata".to_string(), Value::String(id.clone()));
                }
                Value::Object(object)
            },
            Expr::Dictionary(entries) => {
                let entries = entries.iter()
                    .map(|(key, value)| (key.clone(), Value::from(value)))
                    .collect::<Map<_, _>>();
                single("dict", Value::Object(entries))
            },
            Expr::Call(head, args) => {
                Value::Array(
                    std::iter::once(&**head)
                        .chain(args)
                        .map(Value::from)
                        .collect()
                )
            },
        }
    }
}

impl From<Expr> for Value {
    fn from(expr: Expr) -> Self {
        Value::from(&expr)
    }
}

/// Creates an object with a single key.
fn single(key: &str, value: Value) -> Value {
    let mut object = Map::new();
    object.insert(key.to_string(), value);
    Value::Object(object)
}
