//! Datatypes backed by a lexical form: parse text into a typed value, print
//! a typed value back as canonical text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::{Datatype, ValueKind};
use crate::model::vocab::{enola, rdf, xsd};
use crate::model::{LangString, Link, Value};

type Parse = fn(&str) -> Result<Value, String>;

/// A datatype defined by a parser from its lexical space.
///
/// Values are stored as their canonical text unless the datatype is
/// `native`, in which case the parsed value itself is stored (links,
/// language strings and JSON structs have their own model representation).
#[derive(Debug, Clone)]
pub struct LexicalDatatype {
    iri: String,
    kind: ValueKind,
    native: bool,
    parse: Parse,
}

impl LexicalDatatype {
    pub fn new(iri: impl Into<String>, kind: ValueKind, parse: Parse) -> Self {
        Self { iri: iri.into(), kind, native: false, parse }
    }

    /// Store parsed values as-is instead of as text.
    pub fn native(mut self) -> Self {
        self.native = true;
        self
    }

    /// Native values of the right kind pass through; everything else goes
    /// through the lexical space, so out-of-range values are rejected.
    fn parse_value(&self, raw: &Value) -> Result<Value, String> {
        if self.native && ValueKind::of(raw) == self.kind {
            return Ok(raw.clone());
        }
        let text = canonical(raw)
            .ok_or_else(|| format!("{} has no lexical form", raw.type_name()))?;
        (self.parse)(&text)
    }
}

impl Datatype for LexicalDatatype {
    fn iri(&self) -> &str {
        &self.iri
    }

    fn kind(&self) -> ValueKind {
        self.kind
    }

    fn read(&self, raw: &Value, target: ValueKind) -> Result<Value, String> {
        let parsed = self.parse_value(raw)?;
        match target {
            ValueKind::Any => Ok(parsed),
            t if t == self.kind => Ok(parsed),
            ValueKind::String => canonical(&parsed)
                .map(Value::String)
                .ok_or_else(|| format!("{} has no lexical form", parsed.type_name())),
            other => Err(format!("{} values are {}, not {}", self.iri, self.kind, other)),
        }
    }

    fn write(&self, value: &Value) -> Result<Value, String> {
        let parsed = self.parse_value(value)?;
        if self.native {
            return Ok(parsed);
        }
        canonical(&parsed)
            .map(Value::String)
            .ok_or_else(|| format!("{} has no lexical form", parsed.type_name()))
    }
}

/// Canonical text; XSD spells the special floats `INF`, `-INF` and `NaN`.
fn canonical(value: &Value) -> Option<String> {
    match value {
        Value::Float(f) if f.is_nan() => Some("NaN".into()),
        Value::Float(f) if f.is_infinite() => {
            Some(if *f > 0.0 { "INF" } else { "-INF" }.into())
        }
        other => other.to_text(),
    }
}

// ============================================================================
// Builtins
// ============================================================================

pub(crate) fn all() -> Vec<LexicalDatatype> {
    vec![
        LexicalDatatype::new(xsd::STRING, ValueKind::String, parse_string),
        LexicalDatatype::new(xsd::BOOLEAN, ValueKind::Bool, parse_boolean),
        LexicalDatatype::new(xsd::INT, ValueKind::Int, parse_int),
        LexicalDatatype::new(xsd::LONG, ValueKind::Int, parse_long),
        LexicalDatatype::new(xsd::UNSIGNED_INT, ValueKind::Int, parse_unsigned_int),
        LexicalDatatype::new(enola::UNSIGNED_LONG, ValueKind::Int, parse_unsigned_long),
        LexicalDatatype::new(xsd::DOUBLE, ValueKind::Float, parse_double),
        LexicalDatatype::new(xsd::FLOAT, ValueKind::Float, parse_float),
        LexicalDatatype::new(xsd::DATE, ValueKind::Date, parse_date),
        LexicalDatatype::new(xsd::DATE_TIME, ValueKind::DateTime, parse_date_time),
        LexicalDatatype::new(xsd::ANY_URI, ValueKind::Link, parse_any_uri).native(),
        LexicalDatatype::new(rdf::LANG_STRING, ValueKind::LangString, parse_lang_string).native(),
        LexicalDatatype::new(rdf::JSON, ValueKind::Struct, parse_json).native(),
    ]
}

fn parse_string(text: &str) -> Result<Value, String> {
    Ok(Value::String(text.to_owned()))
}

fn parse_boolean(text: &str) -> Result<Value, String> {
    match text.trim() {
        "true" | "True" | "TRUE" | "1" => Ok(Value::Bool(true)),
        "false" | "False" | "FALSE" | "0" => Ok(Value::Bool(false)),
        other => Err(format!("'{other}' is not a boolean")),
    }
}

fn parse_int(text: &str) -> Result<Value, String> {
    text.trim().parse::<i32>().map(Value::from).map_err(|e| e.to_string())
}

fn parse_long(text: &str) -> Result<Value, String> {
    text.trim().parse::<i64>().map(Value::Int).map_err(|e| e.to_string())
}

fn parse_unsigned_int(text: &str) -> Result<Value, String> {
    text.trim().parse::<u32>().map(Value::from).map_err(|e| e.to_string())
}

fn parse_unsigned_long(text: &str) -> Result<Value, String> {
    let n = text.trim().parse::<u64>().map_err(|e| e.to_string())?;
    i64::try_from(n)
        .map(Value::Int)
        .map_err(|_| format!("{n} does not fit a signed 64-bit integer"))
}

fn parse_double(text: &str) -> Result<Value, String> {
    match text.trim() {
        "INF" | "+INF" => Ok(Value::Float(f64::INFINITY)),
        "-INF" => Ok(Value::Float(f64::NEG_INFINITY)),
        "NaN" => Ok(Value::Float(f64::NAN)),
        other => other.parse::<f64>().map(Value::Float).map_err(|e| e.to_string()),
    }
}

/// Single precision, widened; finite text that overflows `f32` is rejected.
fn parse_float(text: &str) -> Result<Value, String> {
    let Value::Float(wide) = parse_double(text)? else {
        return Err(format!("'{text}' is not a float"));
    };
    let narrow = wide as f32;
    if wide.is_finite() && !narrow.is_finite() {
        return Err(format!("'{}' is out of range for a 32-bit float", text.trim()));
    }
    Ok(Value::Float(f64::from(narrow)))
}

fn parse_date(text: &str) -> Result<Value, String> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map(Value::Date)
        .map_err(|e| e.to_string())
}

/// RFC 3339; a timestamp without offset is taken as UTC.
fn parse_date_time(text: &str) -> Result<Value, String> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(Value::DateTime(dt.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Value::DateTime(naive.and_utc()))
        .map_err(|e| e.to_string())
}

/// An absolute IRI: `scheme:rest`, optionally wrapped in `<>`, no whitespace.
fn parse_any_uri(text: &str) -> Result<Value, String> {
    let iri = text.trim();
    let iri = iri
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(iri);

    let valid_scheme = iri.split_once(':').is_some_and(|(scheme, _)| {
        let mut chars = scheme.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    });
    if !valid_scheme || iri.chars().any(char::is_whitespace) {
        return Err(format!("'{iri}' is not an absolute IRI"));
    }
    Ok(Value::Link(Link::new(iri)))
}

/// `text@lang`, split at the last `@`.
fn parse_lang_string(text: &str) -> Result<Value, String> {
    let (text, language) = text
        .rsplit_once('@')
        .ok_or_else(|| format!("'{text}' has no @language tag"))?;
    if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(format!("'{language}' is not a language tag"));
    }
    Ok(Value::LangString(LangString::new(text, language)))
}

fn parse_json(text: &str) -> Result<Value, String> {
    let json: serde_json::Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    Value::from_json(&json).map_err(|e| e.to_string())
}
