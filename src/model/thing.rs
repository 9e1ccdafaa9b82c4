//! Thing: an IRI-identified `PredicatesObjects`.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::vocab::rdf;
use super::{Link, PredicatesObjects, PredicatesObjectsBuilder, PropertiesBuilder};
use crate::{Error, Result};

/// An entity: one IRI plus its properties.
///
/// Dereferences to [`PredicatesObjects`] for all reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ThingRepr")]
pub struct Thing {
    iri: String,
    properties: PredicatesObjects,
}

#[derive(Deserialize)]
struct ThingRepr {
    iri: String,
    properties: PredicatesObjects,
}

impl TryFrom<ThingRepr> for Thing {
    type Error = String;

    fn try_from(repr: ThingRepr) -> std::result::Result<Self, String> {
        if repr.iri.is_empty() {
            return Err("thing has an empty IRI".into());
        }
        Ok(Self { iri: repr.iri, properties: repr.properties })
    }
}

impl Thing {
    pub fn builder() -> ThingBuilder {
        ThingBuilder::new()
    }

    pub fn iri(&self) -> &str {
        &self.iri
    }

    pub fn properties(&self) -> &PredicatesObjects {
        &self.properties
    }

    /// A builder seeded with this Thing's IRI and properties.
    pub fn copy(&self) -> ThingBuilder {
        ThingBuilder {
            iri: Some(self.iri.clone()),
            inner: self.properties.copy(),
        }
    }

    /// IRIs of the classes this Thing declares itself an instance of.
    pub fn type_iris(&self) -> Vec<&str> {
        self.properties.links(rdf::TYPE).into_iter().map(Link::iri).collect()
    }
}

impl Deref for Thing {
    type Target = PredicatesObjects;

    fn deref(&self) -> &PredicatesObjects {
        &self.properties
    }
}

impl fmt::Display for Thing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {}", self.iri, self.properties)
    }
}

// ============================================================================
// ThingBuilder
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ThingBuilder {
    iri: Option<String>,
    inner: PredicatesObjectsBuilder,
}

impl PropertiesBuilder for ThingBuilder {
    fn properties_mut(&mut self) -> &mut PredicatesObjectsBuilder {
        &mut self.inner
    }
}

impl ThingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(expected_size: usize) -> Self {
        Self { iri: None, inner: PredicatesObjectsBuilder::with_capacity(expected_size) }
    }

    /// Set the identifying IRI. Setting the same IRI twice is harmless;
    /// changing it is recorded as an error.
    pub fn iri(&mut self, iri: impl Into<String>) -> &mut Self {
        let iri = iri.into();
        match &self.iri {
            _ if iri.is_empty() => self.inner.record(Error::EmptyIri),
            Some(current) if *current != iri => self.inner.record(Error::IriAlreadySet {
                current: current.clone(),
                requested: iri,
            }),
            _ => self.iri = Some(iri),
        }
        self
    }

    pub fn get_iri(&self) -> Option<&str> {
        self.iri.as_deref()
    }

    pub fn properties(&self) -> &PredicatesObjectsBuilder {
        &self.inner
    }

    /// The error `build()` would return, if a mutation has already failed.
    pub fn error(&self) -> Option<&Error> {
        self.inner.error()
    }

    /// Add `class_iri` as an `rdf:type` of the Thing being built.
    pub fn add_type(&mut self, class_iri: &str) -> &mut Self {
        let link = Link::new(class_iri);
        let already = self
            .inner
            .get(rdf::TYPE)
            .is_some_and(|slot| slot.contains(&link.clone().into()));
        if !already {
            self.add(rdf::TYPE, link);
        }
        self
    }

    pub fn build(&self) -> Result<Thing> {
        let properties = self.inner.build()?;
        let iri = self.iri.clone().ok_or(Error::MissingIri)?;
        Ok(Thing { iri, properties })
    }
}
