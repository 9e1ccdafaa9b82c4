//! View and ViewBuilder: a Thing (or its builder) read and written through
//! an [`Interface`].

use std::sync::Arc;

use crate::datatype::{DatatypeRegistry, FromValue};
use crate::model::{Link, PredicatesObjectsBuilder, PropertiesBuilder, Thing, ThingBuilder, Value};
use crate::repo::ThingProvider;
use crate::{Error, Result};

use super::{Accessor, Capability, Interface, Multiplicity};

/// Anything that can hand out the [`View`] capability readers dispatch to.
pub trait AsView {
    fn view(&self) -> &View;
}

/// Anything that can hand out the [`ViewBuilder`] capability writers dispatch to.
pub trait AsViewBuilder {
    fn view_builder(&mut self) -> &mut ViewBuilder;
}

// ============================================================================
// View
// ============================================================================

/// An immutable Thing seen through an interface.
///
/// Getters look up the accessor by name, read its predicate and convert the
/// stored values to the accessor's type. The effective datatype is the one
/// stored on the predicate, else the one the accessor declares.
#[derive(Debug, Clone)]
pub struct View {
    thing: Thing,
    interface: Arc<Interface>,
    datatypes: Arc<DatatypeRegistry>,
}

impl AsView for View {
    fn view(&self) -> &View {
        self
    }
}

impl View {
    pub fn new(thing: Thing, interface: Arc<Interface>, datatypes: Arc<DatatypeRegistry>) -> Self {
        Self { thing, interface, datatypes }
    }

    pub fn thing(&self) -> &Thing {
        &self.thing
    }

    pub fn into_thing(self) -> Thing {
        self.thing
    }

    pub fn iri(&self) -> &str {
        self.thing.iri()
    }

    pub fn interface(&self) -> &Arc<Interface> {
        &self.interface
    }

    pub fn implements(&self, capability: &Capability) -> bool {
        self.interface.implements(capability)
    }

    pub fn accessor(&self, name: &str) -> Result<&Accessor> {
        self.interface
            .accessor(name)
            .ok_or_else(|| Error::NotHandled(format!("accessor {name}")))
    }

    /// Single value of accessor `name` as `T`.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<Option<T>> {
        let accessor = self.accessor(name)?;
        self.thing.get_as_with(accessor.predicate, accessor.datatype, &self.datatypes)
    }

    /// All values of accessor `name` as `T`; ordered accessors keep their order.
    pub fn get_all<T: FromValue>(&self, name: &str) -> Result<Vec<T>> {
        let accessor = self.accessor(name)?;
        self.thing.get_all_as_with(accessor.predicate, accessor.datatype, &self.datatypes)
    }

    /// Values of accessor `name`, converted to the kind it declares.
    pub fn values(&self, name: &str) -> Result<Vec<Value>> {
        let accessor = self.accessor(name)?;
        self.thing
            .values_as(accessor.predicate, accessor.kind, accessor.datatype, &self.datatypes)
    }

    /// Resolve the link held by accessor `name`. A link to a Thing the
    /// provider does not know is `None`, like a missing predicate.
    pub fn get_thing(&self, name: &str, provider: &dyn ThingProvider) -> Result<Option<Thing>> {
        match self.get::<Link>(name)? {
            Some(link) => provider.get(link.iri()),
            None => Ok(None),
        }
    }

    /// Resolve every link held by accessor `name`, skipping unknown targets.
    pub fn get_things(&self, name: &str, provider: &dyn ThingProvider) -> Result<Vec<Thing>> {
        let mut things = Vec::new();
        for link in self.get_all::<Link>(name)? {
            if let Some(thing) = provider.get(link.iri())? {
                things.push(thing);
            }
        }
        Ok(things)
    }

    /// A builder seeded with this view's Thing, sharing its interface.
    pub fn copy(&self) -> ViewBuilder {
        ViewBuilder {
            builder: self.thing.copy(),
            interface: Arc::clone(&self.interface),
            datatypes: Arc::clone(&self.datatypes),
        }
    }
}

// ============================================================================
// ViewBuilder
// ============================================================================

/// Builds a Thing through an interface's setters, plus the generic protocol.
#[derive(Debug, Clone)]
pub struct ViewBuilder {
    builder: ThingBuilder,
    interface: Arc<Interface>,
    datatypes: Arc<DatatypeRegistry>,
}

impl AsViewBuilder for ViewBuilder {
    fn view_builder(&mut self) -> &mut ViewBuilder {
        self
    }
}

impl PropertiesBuilder for ViewBuilder {
    fn properties_mut(&mut self) -> &mut PredicatesObjectsBuilder {
        self.builder.properties_mut()
    }
}

impl ViewBuilder {
    pub fn new(interface: Arc<Interface>, datatypes: Arc<DatatypeRegistry>) -> Self {
        Self { builder: ThingBuilder::new(), interface, datatypes }
    }

    /// Wrap an existing Thing builder, e.g. one from `Thing::copy()`.
    pub fn from_builder(
        builder: ThingBuilder,
        interface: Arc<Interface>,
        datatypes: Arc<DatatypeRegistry>,
    ) -> Self {
        Self { builder, interface, datatypes }
    }

    pub fn iri(&mut self, iri: impl Into<String>) -> &mut Self {
        self.builder.iri(iri);
        self
    }

    pub fn add_type(&mut self, class_iri: &str) -> &mut Self {
        self.builder.add_type(class_iri);
        self
    }

    pub fn interface(&self) -> &Arc<Interface> {
        &self.interface
    }

    pub fn thing_builder(&self) -> &ThingBuilder {
        &self.builder
    }

    pub fn error(&self) -> Option<&Error> {
        self.builder.error()
    }

    /// Write one value through accessor `name`: `set` for `One`, `add` for
    /// `Many`, `add_ordered` for `Ordered`, in the accessor's datatype.
    pub fn put(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        let Some(accessor) = self.interface.accessor(name).copied() else {
            self.builder
                .properties_mut()
                .record(Error::NotHandled(format!("accessor {name}")));
            return self;
        };
        let stored = match self.datatypes.normalize(value.into(), accessor.datatype, accessor.predicate) {
            Ok(stored) => stored,
            Err(e) => {
                self.builder.properties_mut().record(e);
                return self;
            }
        };

        let predicate = accessor.predicate;
        match (accessor.multiplicity, accessor.datatype) {
            (Multiplicity::One, Some(dt)) => self.builder.set_with_datatype(predicate, stored, dt),
            (Multiplicity::One, None) => self.builder.set(predicate, stored),
            (Multiplicity::Many, Some(dt)) => self.builder.add_with_datatype(predicate, stored, dt),
            (Multiplicity::Many, None) => self.builder.add(predicate, stored),
            (Multiplicity::Ordered, Some(dt)) => {
                self.builder.add_ordered_with_datatype(predicate, stored, dt)
            }
            (Multiplicity::Ordered, None) => self.builder.add_ordered(predicate, stored),
        };
        self
    }

    pub fn put_all<V: Into<Value>>(
        &mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        for value in values {
            self.put(name, value);
        }
        self
    }

    pub fn build(&self) -> Result<View> {
        Ok(View {
            thing: self.builder.build()?,
            interface: Arc::clone(&self.interface),
            datatypes: Arc::clone(&self.datatypes),
        })
    }

    pub fn build_thing(&self) -> Result<Thing> {
        self.builder.build()
    }
}
