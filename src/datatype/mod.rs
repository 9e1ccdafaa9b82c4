//! # Datatypes
//!
//! A registry from datatype IRI to converter. Reads turn a stored raw value
//! (usually text annotated with a datatype IRI) into the representation a
//! caller asks for; writes turn a typed value into its stored form.
//!
//! Conversions are exact. A value that needs a datatype to be converted but
//! has none, or names one that is not registered, is an error; there is no
//! best-effort fallback.

pub mod builtin;
pub mod conversion;

pub use builtin::LexicalDatatype;
pub use conversion::{FromValue, ValueKind};

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use tracing::trace;

use crate::model::Value;
use crate::{Error, Result};

/// A converter between the stored and the typed form of one datatype.
///
/// Implementations return a plain reason on failure; the registry wraps it
/// into [`Error::Conversion`] with the predicate and value attached.
pub trait Datatype: Send + Sync + fmt::Debug {
    /// The datatype IRI, e.g. `xsd:date`.
    fn iri(&self) -> &str;

    /// The kind values of this datatype have once read.
    fn kind(&self) -> ValueKind;

    /// Stored → typed. `target` is never `ValueKind::Any` unless the caller
    /// wants the natural kind.
    fn read(&self, raw: &Value, target: ValueKind) -> std::result::Result<Value, String>;

    /// Typed (or lexical) → stored.
    fn write(&self, value: &Value) -> std::result::Result<Value, String>;
}

/// Datatype IRI → converter.
///
/// Build once (usually from [`standard`](Self::standard)), wrap in an `Arc`
/// and share. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct DatatypeRegistry {
    by_iri: HashMap<String, Arc<dyn Datatype>>,
}

impl DatatypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The XSD, RDF and Enola datatypes that ship with the crate.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for datatype in builtin::all() {
            registry.by_iri.insert(datatype.iri().to_owned(), Arc::new(datatype));
        }
        registry
    }

    pub fn register(&mut self, datatype: Arc<dyn Datatype>) -> Result<()> {
        let iri = datatype.iri().to_owned();
        if self.by_iri.contains_key(&iri) {
            return Err(Error::DuplicateDatatype(iri));
        }
        trace!(datatype = %iri, "registered datatype");
        self.by_iri.insert(iri, datatype);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, datatype: impl Datatype + 'static) -> Result<Self> {
        self.register(Arc::new(datatype))?;
        Ok(self)
    }

    pub fn get(&self, iri: &str) -> Option<&Arc<dyn Datatype>> {
        self.by_iri.get(iri)
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.by_iri.contains_key(iri)
    }

    pub fn len(&self) -> usize {
        self.by_iri.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_iri.is_empty()
    }

    /// Convert a stored value of `predicate` into `target`.
    ///
    /// 1. Already the right kind (or `Any` requested): returned as-is.
    /// 2. Text requested: every scalar has a lexical form.
    /// 3. Otherwise the predicate's datatype must be present and registered.
    pub fn convert(
        &self,
        raw: &Value,
        target: ValueKind,
        datatype: Option<&str>,
        predicate: &str,
    ) -> Result<Value> {
        if target == ValueKind::Any || ValueKind::of(raw) == target {
            return Ok(raw.clone());
        }
        if target == ValueKind::String {
            if let Some(text) = raw.to_text() {
                return Ok(Value::String(text));
            }
        }
        let Some(iri) = datatype else {
            return Err(Error::MissingDatatype {
                predicate: predicate.to_owned(),
                value: raw.to_string(),
                target: target.name().into(),
            });
        };
        let dt = self.lookup(iri, predicate)?;
        dt.read(raw, target).map_err(|reason| Error::Conversion {
            datatype: iri.to_owned(),
            value: raw.to_string(),
            target: target.name().into(),
            reason,
        })
    }

    /// Turn a typed value into the form stored under `datatype`. Without a
    /// datatype the value is stored unchanged.
    pub fn normalize(&self, value: Value, datatype: Option<&str>, predicate: &str) -> Result<Value> {
        let Some(iri) = datatype else { return Ok(value) };
        if value.is_absent() {
            return Ok(value);
        }
        let dt = self.lookup(iri, predicate)?;
        dt.write(&value).map_err(|reason| Error::Conversion {
            datatype: iri.to_owned(),
            value: value.to_string(),
            target: "stored form".into(),
            reason,
        })
    }

    fn lookup(&self, iri: &str, predicate: &str) -> Result<&Arc<dyn Datatype>> {
        self.by_iri.get(iri).ok_or_else(|| Error::UnknownDatatype {
            datatype: iri.to_owned(),
            predicate: predicate.to_owned(),
        })
    }
}
