//! Universal value type stored in a Thing's slots.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{PredicatesObjects, PredicatesObjectsBuilder};
use crate::{Error, Result};

/// The object of a predicate.
///
/// Covers:
/// - Scalars: Bool, Int, Float, String, LangString
/// - References: Link (an IRI pointing at another Thing, distinct from text)
/// - Temporal: Date, DateTime
/// - Nested: Struct (a blank node, `PredicatesObjects` without its own IRI)
///
/// `Null` and `Literal` are input-only: builders absorb `Null` and split a
/// `Literal` into its text plus a datatype annotation, so neither is ever
/// found inside a built Thing.
///
/// Floats compare and hash by bit pattern, which keeps `Eq` and `Hash`
/// consistent (so `NaN == NaN`, and `0.0 != -0.0`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    LangString(LangString),
    Link(Link),
    Literal(Literal),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Struct(Box<PredicatesObjects>),
}

/// An IRI reference to another Thing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Link(String);

impl Link {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn iri(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Link { fn from(iri: &str) -> Self { Link::new(iri) } }
impl From<String> for Link { fn from(iri: String) -> Self { Link(iri) } }

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Text in a given natural language (BCP 47 tag, e.g. `en` or `de-CH`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LangString {
    pub text: String,
    pub language: String,
}

impl LangString {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self { text: text.into(), language: language.into() }
    }
}

impl fmt::Display for LangString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"@{}", self.text, self.language)
    }
}

/// A lexical form tagged with the IRI of its datatype, e.g. `"2024-10-06"^^xsd:date`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
    pub datatype: String,
}

impl Literal {
    pub fn new(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self { value: value.into(), datatype: datatype.into() }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"^^<{}>", self.value, self.datatype)
    }
}

// ============================================================================
// Type checking
// ============================================================================

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::Int(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::String(_) => "STRING",
            Value::LangString(_) => "LANG_STRING",
            Value::Link(_) => "LINK",
            Value::Literal(_) => "LITERAL",
            Value::Date(_) => "DATE",
            Value::DateTime(_) => "DATETIME",
            Value::Struct(_) => "STRUCT",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }
    pub fn is_link(&self) -> bool { matches!(self, Value::Link(_)) }
    pub fn is_struct(&self) -> bool { matches!(self, Value::Struct(_)) }

    /// Values that builders silently drop: `Null` and empty text.
    pub fn is_absent(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Literal(l) => l.value.is_empty(),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Value::Link(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&PredicatesObjects> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// The plain text of a scalar: strings as-is, links as their IRI, language
    /// strings without their tag, numbers and temporals in lexical form.
    /// `None` for `Null` and structs, which have no text.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null | Value::Struct(_) => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(v) => Some(v.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::LangString(l) => Some(l.text.clone()),
            Value::Link(l) => Some(l.iri().to_owned()),
            Value::Literal(l) => Some(l.value.clone()),
            Value::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Value::DateTime(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }

    /// Convert a JSON document into a value. Objects become nested structs
    /// whose keys are used as predicate IRIs; arrays are only accepted as
    /// object members (see [`PredicatesObjectsBuilder::from_json`]).
    pub fn from_json(json: &serde_json::Value) -> Result<Value> {
        use serde_json::Value as Json;
        Ok(match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).ok_or_else(|| Error::TypeError {
                    expected: "number".into(),
                    got: n.to_string(),
                })?,
            },
            Json::String(s) => Value::String(s.clone()),
            Json::Array(_) => {
                return Err(Error::TypeError {
                    expected: "scalar or object".into(),
                    got: "array".into(),
                })
            }
            Json::Object(map) => {
                Value::Struct(Box::new(PredicatesObjectsBuilder::from_json(map)?.build()?))
            }
        })
    }
}

// ============================================================================
// Equality & hashing
// ============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::LangString(a), Value::LangString(b)) => a == b,
            (Value::Link(a), Value::Link(b)) => a == b,
            (Value::Literal(a), Value::Literal(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::LangString(l) => l.hash(state),
            Value::Link(l) => l.hash(state),
            Value::Literal(l) => l.hash(state),
            Value::Date(d) => d.hash(state),
            Value::DateTime(dt) => dt.hash(state),
            Value::Struct(s) => s.hash(state),
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Int(v as i64) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Int(v) } }
impl From<u32> for Value { fn from(v: u32) -> Self { Value::Int(v as i64) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Float(v) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::String(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_owned()) } }
impl From<Link> for Value { fn from(v: Link) -> Self { Value::Link(v) } }
impl From<LangString> for Value { fn from(v: LangString) -> Self { Value::LangString(v) } }
impl From<Literal> for Value { fn from(v: Literal) -> Self { Value::Literal(v) } }
impl From<NaiveDate> for Value { fn from(v: NaiveDate) -> Self { Value::Date(v) } }
impl From<DateTime<Utc>> for Value { fn from(v: DateTime<Utc>) -> Self { Value::DateTime(v) } }
impl From<PredicatesObjects> for Value {
    fn from(v: PredicatesObjects) -> Self { Value::Struct(Box::new(v)) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Value::Null) }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Value::LangString(l) => write!(f, "{l}"),
            Value::Link(l) => write!(f, "{l}"),
            Value::Literal(l) => write!(f, "{l}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Struct(s) => write!(f, "{s}"),
        }
    }
}
