//! PredicatesObjects, the generic store behind every Thing, and its builder.
//!
//! A `PredicatesObjects` without an IRI is what RDF calls a blank node; it is
//! used for structs nested inside Things. `Thing` adds the identifying IRI.

use std::fmt;
use std::hash::{Hash, Hasher};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::slot::unordered_hash;
use super::{Link, Literal, Slot, SlotState, Value};
use crate::datatype::{DatatypeRegistry, FromValue, ValueKind};
use crate::{Error, Result};

// ============================================================================
// PredicatesObjects (immutable)
// ============================================================================

/// Predicate IRI → slot, plus predicate IRI → datatype IRI.
///
/// Immutable once built. Predicates enumerate in the order they were first
/// touched; equality and hashing ignore that order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "PredicatesObjectsRepr")]
pub struct PredicatesObjects {
    properties: HashMap<String, Slot>,
    datatypes: HashMap<String, String>,
    order: Vec<String>,
}

#[derive(Deserialize)]
struct PredicatesObjectsRepr {
    properties: HashMap<String, Slot>,
    datatypes: HashMap<String, String>,
    order: Vec<String>,
}

/// `order` must list every predicate exactly once; datatypes only annotate
/// present predicates.
impl TryFrom<PredicatesObjectsRepr> for PredicatesObjects {
    type Error = String;

    fn try_from(repr: PredicatesObjectsRepr) -> std::result::Result<Self, String> {
        let mut seen = hashbrown::HashSet::with_capacity(repr.order.len());
        for predicate in &repr.order {
            if !repr.properties.contains_key(predicate) {
                return Err(format!("order names <{predicate}>, which has no values"));
            }
            if !seen.insert(predicate.as_str()) {
                return Err(format!("order lists <{predicate}> twice"));
            }
        }
        if seen.len() != repr.properties.len() {
            return Err("order does not list every predicate".into());
        }
        drop(seen);
        if let Some(predicate) = repr.datatypes.keys().find(|p| !repr.properties.contains_key(*p)) {
            return Err(format!("datatype annotates <{predicate}>, which has no values"));
        }
        Ok(Self { properties: repr.properties, datatypes: repr.datatypes, order: repr.order })
    }
}

impl PredicatesObjects {
    pub fn builder() -> PredicatesObjectsBuilder {
        PredicatesObjectsBuilder::new()
    }

    /// A new builder seeded with this store, slot states included.
    pub fn copy(&self) -> PredicatesObjectsBuilder {
        PredicatesObjectsBuilder {
            properties: self.properties.clone(),
            datatypes: self.datatypes.clone(),
            order: self.order.clone(),
            error: None,
        }
    }

    /// Predicate IRIs in first-touched order.
    pub fn predicate_iris(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(predicate, slot)` pairs in first-touched order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.order
            .iter()
            .filter_map(|p| self.properties.get(p).map(|slot| (p.as_str(), slot)))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn contains(&self, predicate: &str) -> bool {
        self.properties.contains_key(predicate)
    }

    /// The stored slot, as-is.
    pub fn get(&self, predicate: &str) -> Option<&Slot> {
        self.properties.get(predicate)
    }

    /// The single stored value of a predicate (scalar or one-element collection).
    pub fn get_value(&self, predicate: &str) -> Option<&Value> {
        self.get(predicate).and_then(Slot::single)
    }

    /// Datatype IRI annotated on the predicate, if any.
    pub fn datatype(&self, predicate: &str) -> Option<&str> {
        self.datatypes.get(predicate).map(String::as_str)
    }

    pub fn datatypes(&self) -> &HashMap<String, String> {
        &self.datatypes
    }

    pub fn slot_state(&self, predicate: &str) -> Option<SlotState> {
        self.get(predicate).map(Slot::state)
    }

    pub fn is_iterable(&self, predicate: &str) -> bool {
        self.get(predicate).is_some_and(Slot::is_multi)
    }

    pub fn is_ordered(&self, predicate: &str) -> bool {
        self.get(predicate).is_some_and(Slot::is_ordered)
    }

    pub fn is_struct(&self, predicate: &str) -> bool {
        self.get_value(predicate).is_some_and(Value::is_struct)
    }

    /// All link objects of a predicate, whether it holds one value or many.
    pub fn links(&self, predicate: &str) -> Vec<&Link> {
        self.get(predicate)
            .map(|slot| slot.values().iter().filter_map(Value::as_link).collect())
            .unwrap_or_default()
    }

    // ========================================================================
    // Typed reads
    // ========================================================================

    /// The predicate's text. Needs no datatype: every scalar has a lexical form.
    pub fn get_string(&self, predicate: &str) -> Result<Option<String>> {
        let Some(raw) = self.scalar(predicate)? else { return Ok(None) };
        Ok(raw.to_text())
    }

    /// The predicate's single value converted to `T`, routed through the
    /// predicate's datatype when the stored form is not already a `T`.
    pub fn get_as<T: FromValue>(
        &self,
        predicate: &str,
        datatypes: &DatatypeRegistry,
    ) -> Result<Option<T>> {
        self.get_as_with(predicate, None, datatypes)
    }

    /// All values of the predicate converted to `T`; empty if absent.
    pub fn get_all_as<T: FromValue>(
        &self,
        predicate: &str,
        datatypes: &DatatypeRegistry,
    ) -> Result<Vec<T>> {
        self.get_all_as_with(predicate, None, datatypes)
    }

    /// Like [`get_as`](Self::get_as), with a fallback datatype used when the
    /// predicate carries no annotation of its own.
    pub(crate) fn get_as_with<T: FromValue>(
        &self,
        predicate: &str,
        fallback: Option<&str>,
        datatypes: &DatatypeRegistry,
    ) -> Result<Option<T>> {
        let Some(raw) = self.scalar(predicate)? else { return Ok(None) };
        let datatype = self.datatype(predicate).or(fallback);
        let converted = datatypes.convert(raw, T::KIND, datatype, predicate)?;
        T::from_value(&converted).map(Some)
    }

    pub(crate) fn get_all_as_with<T: FromValue>(
        &self,
        predicate: &str,
        fallback: Option<&str>,
        datatypes: &DatatypeRegistry,
    ) -> Result<Vec<T>> {
        let Some(slot) = self.get(predicate) else { return Ok(Vec::new()) };
        let datatype = self.datatype(predicate).or(fallback);
        slot.values()
            .iter()
            .map(|raw| {
                let converted = datatypes.convert(raw, T::KIND, datatype, predicate)?;
                T::from_value(&converted)
            })
            .collect()
    }

    /// Converts every value of the predicate to `kind`, keeping them as `Value`s.
    pub(crate) fn values_as(
        &self,
        predicate: &str,
        kind: ValueKind,
        fallback: Option<&str>,
        datatypes: &DatatypeRegistry,
    ) -> Result<Vec<Value>> {
        let Some(slot) = self.get(predicate) else { return Ok(Vec::new()) };
        let datatype = self.datatype(predicate).or(fallback);
        slot.values()
            .iter()
            .map(|raw| datatypes.convert(raw, kind, datatype, predicate))
            .collect()
    }

    fn scalar(&self, predicate: &str) -> Result<Option<&Value>> {
        match self.get(predicate) {
            None => Ok(None),
            Some(slot) => slot
                .single()
                .map(Some)
                .ok_or_else(|| Error::NotScalar { predicate: predicate.to_owned() }),
        }
    }
}

impl PartialEq for PredicatesObjects {
    fn eq(&self, other: &Self) -> bool {
        self.properties == other.properties && self.datatypes == other.datatypes
    }
}

impl Eq for PredicatesObjects {}

impl Hash for PredicatesObjects {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.properties.len());
        state.write_u64(unordered_hash(self.properties.iter()));
        state.write_u64(unordered_hash(self.datatypes.iter()));
    }
}

impl fmt::Display for PredicatesObjects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (predicate, slot)) in self.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "<{predicate}>: {slot}")?;
            if let Some(dt) = self.datatype(predicate) {
                write!(f, "^^<{dt}>")?;
            }
        }
        write!(f, "}}")
    }
}

// ============================================================================
// PropertiesBuilder (the mutation protocol)
// ============================================================================

/// The mutation API shared by every builder: `set`, `add`, `add_ordered` and
/// their bulk and datatype-annotated forms.
///
/// Methods chain. Null and empty-text values, and empty collections, are
/// silently ignored. The first error a mutation runs into (duplicate value in
/// an unordered slot, conflicting datatypes) is kept by the builder and
/// returned from `build()`.
///
/// Builders are single-writer: they take `&mut self` and do no locking.
pub trait PropertiesBuilder {
    /// The underlying generic store being built.
    fn properties_mut(&mut self) -> &mut PredicatesObjectsBuilder;

    /// Replace whatever the predicate held with one value. Drops any datatype
    /// annotation, unless `value` is a [`Literal`]; an annotation recorded
    /// earlier does not survive a plain `set`, so re-state it with
    /// [`set_with_datatype`](Self::set_with_datatype).
    fn set(&mut self, predicate: &str, value: impl Into<Value>) -> &mut Self {
        self.properties_mut().apply_set(predicate, value.into(), None);
        self
    }

    /// Replace whatever the predicate held with one value of the given datatype.
    fn set_with_datatype(
        &mut self,
        predicate: &str,
        value: impl Into<Value>,
        datatype: &str,
    ) -> &mut Self {
        self.properties_mut().apply_set(predicate, value.into(), Some(datatype));
        self
    }

    /// Add one of possibly several values, without order. Duplicates are errors
    /// unless the predicate has been ordered before.
    fn add(&mut self, predicate: &str, value: impl Into<Value>) -> &mut Self {
        self.properties_mut().apply_add(predicate, value.into(), None, false);
        self
    }

    fn add_with_datatype(
        &mut self,
        predicate: &str,
        value: impl Into<Value>,
        datatype: &str,
    ) -> &mut Self {
        self.properties_mut().apply_add(predicate, value.into(), Some(datatype), false);
        self
    }

    /// Append a value, making the predicate ordered for good. Duplicates allowed.
    fn add_ordered(&mut self, predicate: &str, value: impl Into<Value>) -> &mut Self {
        self.properties_mut().apply_add(predicate, value.into(), None, true);
        self
    }

    fn add_ordered_with_datatype(
        &mut self,
        predicate: &str,
        value: impl Into<Value>,
        datatype: &str,
    ) -> &mut Self {
        self.properties_mut().apply_add(predicate, value.into(), Some(datatype), true);
        self
    }

    fn add_all<V: Into<Value>>(
        &mut self,
        predicate: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.properties_mut().apply_add_all(predicate, values, None, false);
        self
    }

    fn add_all_with_datatype<V: Into<Value>>(
        &mut self,
        predicate: &str,
        values: impl IntoIterator<Item = V>,
        datatype: &str,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.properties_mut().apply_add_all(predicate, values, Some(datatype), false);
        self
    }

    fn add_all_ordered<V: Into<Value>>(
        &mut self,
        predicate: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.properties_mut().apply_add_all(predicate, values, None, true);
        self
    }

    fn add_all_ordered_with_datatype<V: Into<Value>>(
        &mut self,
        predicate: &str,
        values: impl IntoIterator<Item = V>,
        datatype: &str,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.properties_mut().apply_add_all(predicate, values, Some(datatype), true);
        self
    }
}

// ============================================================================
// PredicatesObjectsBuilder
// ============================================================================

/// Builder of [`PredicatesObjects`]; also the core that `ThingBuilder` wraps.
#[derive(Debug, Clone, Default)]
pub struct PredicatesObjectsBuilder {
    properties: HashMap<String, Slot>,
    datatypes: HashMap<String, String>,
    order: Vec<String>,
    error: Option<Error>,
}

impl PropertiesBuilder for PredicatesObjectsBuilder {
    fn properties_mut(&mut self) -> &mut PredicatesObjectsBuilder {
        self
    }
}

impl PredicatesObjectsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(expected_size: usize) -> Self {
        Self {
            properties: HashMap::with_capacity(expected_size),
            datatypes: HashMap::new(),
            order: Vec::with_capacity(expected_size),
            error: None,
        }
    }

    /// Load a JSON object: keys are predicate IRIs, arrays become ordered
    /// slots, nested objects become structs.
    pub fn from_json(object: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let mut builder = Self::with_capacity(object.len());
        for (predicate, json) in object {
            match json {
                serde_json::Value::Array(items) => {
                    let values = items.iter().map(Value::from_json).collect::<Result<Vec<_>>>()?;
                    builder.add_all_ordered(predicate, values);
                }
                other => {
                    builder.set(predicate, Value::from_json(other)?);
                }
            }
        }
        Ok(builder)
    }

    /// The first error recorded by a mutation, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// The in-progress slot of a predicate.
    pub fn get(&self, predicate: &str) -> Option<&Slot> {
        self.properties.get(predicate)
    }

    pub fn datatype(&self, predicate: &str) -> Option<&str> {
        self.datatypes.get(predicate).map(String::as_str)
    }

    /// Snapshot the current state. Can be called repeatedly; each call yields
    /// an independent value and leaves the builder usable.
    pub fn build(&self) -> Result<PredicatesObjects> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        Ok(PredicatesObjects {
            properties: self.properties.clone(),
            datatypes: self.datatypes.clone(),
            order: self.order.clone(),
        })
    }

    pub(crate) fn record(&mut self, error: Error) {
        debug!(%error, "builder mutation failed");
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    pub(crate) fn apply_set(&mut self, predicate: &str, value: Value, datatype: Option<&str>) {
        let (value, datatype) = match prepare(predicate, value, datatype) {
            Ok(Some(prepared)) => prepared,
            Ok(None) => return,
            Err(e) => return self.record(e),
        };

        match datatype {
            Some(dt) => { self.datatypes.insert(predicate.to_owned(), dt); }
            None => { self.datatypes.remove(predicate); }
        }

        match self.properties.get_mut(predicate) {
            Some(slot) => slot.set(value),
            None => {
                self.order.push(predicate.to_owned());
                self.properties.insert(predicate.to_owned(), Slot::scalar(value));
            }
        }
    }

    pub(crate) fn apply_add(
        &mut self,
        predicate: &str,
        value: Value,
        datatype: Option<&str>,
        ordered: bool,
    ) {
        let (value, datatype) = match prepare(predicate, value, datatype) {
            Ok(Some(prepared)) => prepared,
            Ok(None) => return,
            Err(e) => return self.record(e),
        };
        if let Some(dt) = datatype {
            if let Err(e) = self.check_datatype(predicate, dt) {
                return self.record(e);
            }
        }

        let rejected = match self.properties.get_mut(predicate) {
            Some(slot) => {
                let before = slot.state();
                let rejected = if ordered {
                    slot.add_ordered(value);
                    None
                } else {
                    slot.add(value).err()
                };
                if before != slot.state() {
                    trace!(
                        predicate,
                        from = ?before,
                        to = ?slot.state(),
                        sticky = slot.ordered_lineage(),
                        "slot promoted"
                    );
                }
                rejected
            }
            None => {
                let slot = if ordered { Slot::ordered(value) } else { Slot::unordered(value) };
                self.order.push(predicate.to_owned());
                self.properties.insert(predicate.to_owned(), slot);
                None
            }
        };

        if let Some(duplicate) = rejected {
            self.record(Error::DuplicateValue {
                predicate: predicate.to_owned(),
                value: duplicate.to_string(),
            });
        }
    }

    pub(crate) fn apply_add_all(
        &mut self,
        predicate: &str,
        values: Vec<Value>,
        datatype: Option<&str>,
        ordered: bool,
    ) {
        for value in values {
            self.apply_add(predicate, value, datatype, ordered);
        }
    }

    /// At most one datatype per predicate: the first one sticks, a different
    /// one later is a caller error.
    fn check_datatype(&mut self, predicate: &str, datatype: String) -> Result<()> {
        match self.datatypes.get(predicate) {
            Some(existing) if *existing != datatype => Err(Error::DatatypeConflict {
                predicate: predicate.to_owned(),
                existing: existing.clone(),
                requested: datatype,
            }),
            Some(_) => Ok(()),
            None => {
                self.datatypes.insert(predicate.to_owned(), datatype);
                Ok(())
            }
        }
    }
}

/// Normalize an incoming value: `None` if it is to be ignored, otherwise the
/// value to store plus its datatype. Literals are split into text + datatype.
fn prepare(
    predicate: &str,
    value: Value,
    datatype: Option<&str>,
) -> Result<Option<(Value, Option<String>)>> {
    if value.is_absent() {
        return Ok(None);
    }
    match value {
        Value::Literal(Literal { value, datatype: literal_datatype }) => match datatype {
            Some(dt) if dt != literal_datatype => Err(Error::DatatypeConflict {
                predicate: predicate.to_owned(),
                existing: literal_datatype,
                requested: dt.to_owned(),
            }),
            _ => Ok(Some((Value::String(value), Some(literal_datatype)))),
        },
        other => Ok(Some((other, datatype.map(str::to_owned)))),
    }
}
