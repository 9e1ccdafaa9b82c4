//! ThingsBuilders: a workspace of in-progress builders, one per IRI.
//!
//! Loaders that see statements about many subjects in arbitrary order keep
//! coming back to the same IRI; this hands them the same builder each time.

use std::sync::Arc;

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use tracing::trace;

use crate::datatype::DatatypeRegistry;
use crate::model::Thing;
use crate::view::{Interface, KindFactory, ViewBuilder};
use crate::Result;

use super::{ThingProvider, ThingRepository};

#[derive(Debug)]
pub struct ThingsBuilders {
    builders: HashMap<String, ViewBuilder>,
    order: Vec<String>,
    kinds: Arc<dyn KindFactory>,
    plain: Arc<Interface>,
    datatypes: Arc<DatatypeRegistry>,
}

impl ThingsBuilders {
    pub fn new(kinds: Arc<dyn KindFactory>, datatypes: Arc<DatatypeRegistry>) -> Self {
        Self {
            builders: HashMap::new(),
            order: Vec::new(),
            kinds,
            plain: Arc::new(Interface::new()),
            datatypes,
        }
    }

    /// The builder for `iri`, creating an untyped one on first use.
    pub fn builder(&mut self, iri: &str) -> &mut ViewBuilder {
        match self.builders.entry(iri.to_owned()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                trace!(iri, "new builder");
                self.order.push(iri.to_owned());
                let mut builder = ViewBuilder::new(Arc::clone(&self.plain), Arc::clone(&self.datatypes));
                builder.iri(iri);
                entry.insert(builder)
            }
        }
    }

    /// The builder for `iri`, created through the kind factory for
    /// `class_iri` on first use. An existing builder just gains the type.
    pub fn builder_of_kind(&mut self, iri: &str, class_iri: &str) -> Result<&mut ViewBuilder> {
        match self.builders.entry(iri.to_owned()) {
            Entry::Occupied(entry) => {
                let builder = entry.into_mut();
                builder.add_type(class_iri);
                Ok(builder)
            }
            Entry::Vacant(entry) => {
                let mut builder = self.kinds.create(class_iri)?;
                trace!(iri, kind = class_iri, "new typed builder");
                builder.iri(iri);
                self.order.push(iri.to_owned());
                Ok(entry.insert(builder))
            }
        }
    }

    pub fn get(&self, iri: &str) -> Option<&ViewBuilder> {
        self.builders.get(iri)
    }

    /// IRIs in the order their builders were first requested.
    pub fn iris(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Build every Thing, in first-requested order. Fails on the first
    /// builder with a pending error.
    pub fn build_all(&self) -> Result<Vec<Thing>> {
        self.order
            .iter()
            .filter_map(|iri| self.builders.get(iri))
            .map(ViewBuilder::build_thing)
            .collect()
    }

    /// Build everything and store it, merging with what `repository` holds.
    pub fn store_into(&self, repository: &ThingRepository) -> Result<usize> {
        repository.store_all(self.build_all()?)
    }
}

/// Lets loaders resolve links between Things that are still being built.
impl ThingProvider for ThingsBuilders {
    fn get(&self, iri: &str) -> Result<Option<Thing>> {
        self.builders.get(iri).map(ViewBuilder::build_thing).transpose()
    }
}
