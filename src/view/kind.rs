//! Kinds: class IRIs bound to interfaces, looked up through a chain of
//! registries.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use tracing::debug;

use crate::datatype::DatatypeRegistry;
use crate::model::Thing;
use crate::{Error, Result};

use super::common::HAS_TYPE;
use super::{Capability, Interface, View, ViewBuilder};

/// Creates views by class IRI.
///
/// Implementations are shared between threads once set up; they must not
/// change after startup.
pub trait KindFactory: Send + Sync + fmt::Debug {
    fn handles(&self, class_iri: &str) -> bool;

    /// A fresh builder for a new Thing of the kind, already typed with
    /// `class_iri`.
    fn create(&self, class_iri: &str) -> Result<ViewBuilder>;

    /// View an existing Thing as the kind. The Thing is not modified.
    fn view(&self, class_iri: &str, thing: Thing) -> Result<View>;
}

// ============================================================================
// KindRegistry
// ============================================================================

/// Class IRI → interface. Built once, then shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct KindRegistry {
    kinds: HashMap<String, Arc<Interface>>,
    datatypes: Arc<DatatypeRegistry>,
}

impl KindRegistry {
    pub fn new(datatypes: Arc<DatatypeRegistry>) -> Self {
        Self { kinds: HashMap::new(), datatypes }
    }

    /// Bind `class_iri` to the union of `capabilities` (plus [`HAS_TYPE`]).
    pub fn register(&mut self, class_iri: &str, capabilities: &[&Capability]) -> Result<()> {
        if self.kinds.contains_key(class_iri) {
            return Err(Error::KindConflict(class_iri.to_owned()));
        }
        let interface = Interface::of(capabilities)?.with(&HAS_TYPE)?;
        debug!(kind = class_iri, capabilities = ?interface.capabilities(), "registered kind");
        self.kinds.insert(class_iri.to_owned(), Arc::new(interface));
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, class_iri: &str, capabilities: &[&Capability]) -> Result<Self> {
        self.register(class_iri, capabilities)?;
        Ok(self)
    }

    pub fn interface(&self, class_iri: &str) -> Option<&Arc<Interface>> {
        self.kinds.get(class_iri)
    }

    pub fn datatypes(&self) -> &Arc<DatatypeRegistry> {
        &self.datatypes
    }

    /// Registered class IRIs, sorted.
    pub fn class_iris(&self) -> Vec<&str> {
        let mut iris: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        iris.sort_unstable();
        iris
    }

    fn lookup(&self, class_iri: &str) -> Result<&Arc<Interface>> {
        self.kinds
            .get(class_iri)
            .ok_or_else(|| Error::NotHandled(format!("kind {class_iri}")))
    }
}

impl KindFactory for KindRegistry {
    fn handles(&self, class_iri: &str) -> bool {
        self.kinds.contains_key(class_iri)
    }

    fn create(&self, class_iri: &str) -> Result<ViewBuilder> {
        let interface = Arc::clone(self.lookup(class_iri)?);
        let mut builder = ViewBuilder::new(interface, Arc::clone(&self.datatypes));
        builder.add_type(class_iri);
        Ok(builder)
    }

    fn view(&self, class_iri: &str, thing: Thing) -> Result<View> {
        let interface = Arc::clone(self.lookup(class_iri)?);
        Ok(View::new(thing, interface, Arc::clone(&self.datatypes)))
    }
}

// ============================================================================
// KindChain
// ============================================================================

/// Factories tried in order; the first that handles a class IRI wins.
#[derive(Debug, Clone, Default)]
pub struct KindChain {
    factories: Vec<Arc<dyn KindFactory>>,
}

impl KindChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, factory: Arc<dyn KindFactory>) {
        self.factories.push(factory);
    }

    pub fn with(mut self, factory: impl KindFactory + 'static) -> Self {
        self.push(Arc::new(factory));
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    fn find(&self, class_iri: &str) -> Result<&Arc<dyn KindFactory>> {
        self.factories.iter().find(|f| f.handles(class_iri)).ok_or_else(|| {
            debug!(kind = class_iri, factories = self.factories.len(), "no factory handles kind");
            Error::NotHandled(format!("kind {class_iri}"))
        })
    }

    /// View `thing` through the first of its `rdf:type`s that some factory
    /// handles.
    pub fn view_of(&self, thing: Thing) -> Result<View> {
        let class_iri = thing
            .type_iris()
            .into_iter()
            .find(|class| self.handles(class))
            .map(str::to_owned);
        match class_iri {
            Some(class_iri) => self.view(&class_iri, thing),
            None => Err(Error::NotHandled(format!("no kind for {}", thing.iri()))),
        }
    }
}

impl KindFactory for KindChain {
    fn handles(&self, class_iri: &str) -> bool {
        self.factories.iter().any(|f| f.handles(class_iri))
    }

    fn create(&self, class_iri: &str) -> Result<ViewBuilder> {
        self.find(class_iri)?.create(class_iri)
    }

    fn view(&self, class_iri: &str, thing: Thing) -> Result<View> {
        self.find(class_iri)?.view(class_iri, thing)
    }
}
