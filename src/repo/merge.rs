//! Merge policies for two Things that share an IRI.

use std::fmt;

use tracing::trace;

use crate::model::{PropertiesBuilder, Slot, SlotState, Thing, ThingBuilder};
use crate::{Error, Result};

/// Combines a stored Thing with an incoming one of the same IRI.
pub trait ThingMerger: Send + Sync + fmt::Debug {
    fn merge(&self, existing: &Thing, incoming: &Thing) -> Result<Thing>;
}

fn check_same_iri(existing: &Thing, incoming: &Thing) -> Result<()> {
    if existing.iri() == incoming.iri() {
        return Ok(());
    }
    Err(Error::MergeConflict {
        iri: existing.iri().to_owned(),
        reason: format!("cannot merge with {}", incoming.iri()),
    })
}

/// Keeps the incoming Thing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastWriteWins;

impl ThingMerger for LastWriteWins {
    fn merge(&self, existing: &Thing, incoming: &Thing) -> Result<Thing> {
        check_same_iri(existing, incoming)?;
        Ok(incoming.clone())
    }
}

/// Accepts the incoming Thing only if it equals the stored one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectMerger;

impl ThingMerger for RejectMerger {
    fn merge(&self, existing: &Thing, incoming: &Thing) -> Result<Thing> {
        check_same_iri(existing, incoming)?;
        if existing == incoming {
            return Ok(existing.clone());
        }
        Err(Error::MergeConflict {
            iri: existing.iri().to_owned(),
            reason: "stored and incoming Things differ".into(),
        })
    }
}

/// Per-predicate union.
///
/// - predicates only one side has are kept as they are;
/// - equal slots are kept once;
/// - if either side is ordered, the incoming values are appended in order;
/// - otherwise the values are combined into an unordered slot, without
///   duplicates (two differing scalars become a two-valued slot).
///
/// Differing datatypes on the same predicate are a [`Error::MergeConflict`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnionMerger;

impl ThingMerger for UnionMerger {
    fn merge(&self, existing: &Thing, incoming: &Thing) -> Result<Thing> {
        check_same_iri(existing, incoming)?;
        let mut builder = existing.copy();

        for (predicate, slot) in incoming.iter() {
            let datatype = incoming.datatype(predicate);
            if let (Some(a), Some(b)) = (existing.datatype(predicate), datatype) {
                if a != b {
                    return Err(Error::MergeConflict {
                        iri: existing.iri().to_owned(),
                        reason: format!("{predicate} is {a} here and {b} there"),
                    });
                }
            }

            match existing.get(predicate) {
                None => copy_slot(&mut builder, predicate, slot, datatype),
                Some(current) if current == slot => {}
                Some(current) if current.is_ordered() || slot.is_ordered() => {
                    trace!(predicate, "appending ordered values");
                    for value in slot.values() {
                        builder.properties_mut().apply_add(predicate, value.clone(), datatype, true);
                    }
                }
                Some(current) => {
                    for value in slot.values().iter().filter(|v| !current.contains(v)) {
                        builder.properties_mut().apply_add(predicate, value.clone(), datatype, false);
                    }
                }
            }
        }

        builder.build()
    }
}

fn copy_slot(builder: &mut ThingBuilder, predicate: &str, slot: &Slot, datatype: Option<&str>) {
    let properties = builder.properties_mut();
    match slot.state() {
        SlotState::Scalar => {
            if let Some(value) = slot.as_scalar() {
                properties.apply_set(predicate, value.clone(), datatype);
            }
        }
        SlotState::Unordered | SlotState::Ordered => {
            let ordered = slot.state() == SlotState::Ordered;
            for value in slot.values() {
                properties.apply_add(predicate, value.clone(), datatype, ordered);
            }
        }
    }
}
