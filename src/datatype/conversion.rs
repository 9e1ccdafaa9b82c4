//! Target kinds and the `FromValue` extraction trait.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{LangString, Link, PredicatesObjects, Value};
use crate::{Error, Result};

/// The runtime shape a caller wants a stored value in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Whatever is stored, unconverted.
    Any,
    Bool,
    Int,
    Float,
    String,
    LangString,
    Link,
    Date,
    DateTime,
    Struct,
}

impl ValueKind {
    /// The kind a stored value already has. Literals count as text, since
    /// their datatype lives beside them.
    pub fn of(value: &Value) -> ValueKind {
        match value {
            Value::Null => ValueKind::Any,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) | Value::Literal(_) => ValueKind::String,
            Value::LangString(_) => ValueKind::LangString,
            Value::Link(_) => ValueKind::Link,
            Value::Date(_) => ValueKind::Date,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Struct(_) => ValueKind::Struct,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Any => "ANY",
            ValueKind::Bool => "BOOLEAN",
            ValueKind::Int => "INTEGER",
            ValueKind::Float => "FLOAT",
            ValueKind::String => "STRING",
            ValueKind::LangString => "LANG_STRING",
            ValueKind::Link => "LINK",
            ValueKind::Date => "DATE",
            ValueKind::DateTime => "DATETIME",
            ValueKind::Struct => "STRUCT",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert from Value to concrete types.
///
/// `KIND` tells the datatype registry what to convert a stored value into
/// before `from_value` picks it apart.
pub trait FromValue: Sized {
    const KIND: ValueKind;

    fn from_value(val: &Value) -> Result<Self>;
}

fn type_error(expected: ValueKind, val: &Value) -> Error {
    Error::TypeError {
        expected: expected.name().into(),
        got: val.type_name().into(),
    }
}

impl FromValue for Value {
    const KIND: ValueKind = ValueKind::Any;

    fn from_value(val: &Value) -> Result<Self> {
        Ok(val.clone())
    }
}

impl FromValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_value(val: &Value) -> Result<Self> {
        val.as_bool().ok_or_else(|| type_error(Self::KIND, val))
    }
}

impl FromValue for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn from_value(val: &Value) -> Result<Self> {
        val.as_int().ok_or_else(|| type_error(Self::KIND, val))
    }
}

impl FromValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn from_value(val: &Value) -> Result<Self> {
        val.as_float().ok_or_else(|| type_error(Self::KIND, val))
    }
}

impl FromValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::String(s) => Ok(s.clone()),
            Value::Literal(l) => Ok(l.value.clone()),
            _ => Err(type_error(Self::KIND, val)),
        }
    }
}

impl FromValue for Link {
    const KIND: ValueKind = ValueKind::Link;

    fn from_value(val: &Value) -> Result<Self> {
        val.as_link().cloned().ok_or_else(|| type_error(Self::KIND, val))
    }
}

impl FromValue for LangString {
    const KIND: ValueKind = ValueKind::LangString;

    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::LangString(l) => Ok(l.clone()),
            _ => Err(type_error(Self::KIND, val)),
        }
    }
}

impl FromValue for NaiveDate {
    const KIND: ValueKind = ValueKind::Date;

    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::Date(d) => Ok(*d),
            _ => Err(type_error(Self::KIND, val)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    const KIND: ValueKind = ValueKind::DateTime;

    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::DateTime(dt) => Ok(*dt),
            _ => Err(type_error(Self::KIND, val)),
        }
    }
}

impl FromValue for PredicatesObjects {
    const KIND: ValueKind = ValueKind::Struct;

    fn from_value(val: &Value) -> Result<Self> {
        val.as_struct().cloned().ok_or_else(|| type_error(Self::KIND, val))
    }
}
