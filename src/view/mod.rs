//! # Typed Views
//!
//! Strongly-typed accessors over generic Things, without per-type codegen.
//!
//! A [`Capability`] is a static table of accessors, each bound to one
//! predicate IRI. Capabilities compose into an [`Interface`]; conflicting
//! bindings are rejected when composing, never when a getter runs. A
//! [`View`] is a built Thing plus the interface it is read through; the
//! `capability!` macro generates the traits that call into it by name.
//!
//! ```text
//!   capability! ──► Capability ──┐
//!   capability! ──► Capability ──┼─► Interface ──► KindRegistry ──► KindChain
//!                                │        │
//!                                │   View / ViewBuilder
//! ```

pub mod common;
pub mod kind;
pub mod typed;

pub use kind::{KindChain, KindFactory, KindRegistry};
pub use typed::{AsView, AsViewBuilder, View, ViewBuilder};

use hashbrown::HashMap;
use tracing::debug;

use crate::datatype::ValueKind;
use crate::{Error, Result};

// ============================================================================
// Accessor tables
// ============================================================================

/// How many values an accessor reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Multiplicity {
    /// Scalar: setter `set`s.
    One,
    /// Unordered: setter `add`s.
    Many,
    /// Sequence: setter `add_ordered`s.
    Ordered,
}

/// One getter/setter pair bound to a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Accessor {
    pub name: &'static str,
    pub predicate: &'static str,
    pub datatype: Option<&'static str>,
    pub kind: ValueKind,
    pub multiplicity: Multiplicity,
}

impl Accessor {
    /// Two accessors on the same predicate must agree on everything but name.
    fn agrees_with(&self, other: &Accessor) -> Option<String> {
        if self.datatype != other.datatype {
            return Some(format!(
                "datatype {} vs {}",
                self.datatype.unwrap_or("none"),
                other.datatype.unwrap_or("none")
            ));
        }
        if self.kind != other.kind {
            return Some(format!("type {} vs {}", self.kind, other.kind));
        }
        if self.multiplicity != other.multiplicity {
            return Some(format!("{:?} vs {:?}", self.multiplicity, other.multiplicity));
        }
        None
    }
}

/// A named, static set of accessors; usually declared with `capability!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub name: &'static str,
    pub accessors: &'static [Accessor],
}

// ============================================================================
// Interface (composed capabilities)
// ============================================================================

/// The union of several capabilities, resolved once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interface {
    capabilities: Vec<Capability>,
    by_name: HashMap<&'static str, Accessor>,
    by_predicate: HashMap<&'static str, Accessor>,
}

impl Interface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(capabilities: &[&Capability]) -> Result<Self> {
        let mut interface = Self::new();
        for capability in capabilities {
            interface.include(capability)?;
        }
        Ok(interface)
    }

    /// Builder-style [`include`](Self::include).
    pub fn with(mut self, capability: &Capability) -> Result<Self> {
        self.include(capability)?;
        Ok(self)
    }

    /// Add a capability. All-or-nothing: on conflict the interface is left
    /// unchanged. A capability is identified by its whole accessor table, so
    /// two tables that share a name are composed like any other pair.
    pub fn include(&mut self, capability: &Capability) -> Result<()> {
        if self.capabilities.contains(capability) {
            return Ok(());
        }

        let mut pending: HashMap<&'static str, &Accessor> = HashMap::new();
        let mut pending_names: HashMap<&'static str, &Accessor> = HashMap::new();
        for accessor in capability.accessors {
            let existing = self
                .by_predicate
                .get(accessor.predicate)
                .or_else(|| pending.get(accessor.predicate).copied());
            if let Some(first) = existing {
                if let Some(reason) = first.agrees_with(accessor) {
                    debug!(predicate = accessor.predicate, %reason, "accessor conflict");
                    return Err(conflict(first, accessor, reason));
                }
            }
            let named = self
                .by_name
                .get(accessor.name)
                .or_else(|| pending_names.get(accessor.name).copied());
            if let Some(first) = named {
                if first.predicate != accessor.predicate {
                    let reason = format!("{} is also bound to {}", accessor.name, first.predicate);
                    debug!(accessor = accessor.name, %reason, "accessor conflict");
                    return Err(conflict(first, accessor, reason));
                }
            }
            pending.insert(accessor.predicate, accessor);
            pending_names.insert(accessor.name, accessor);
        }

        for accessor in capability.accessors {
            self.by_name.insert(accessor.name, *accessor);
            self.by_predicate.entry(accessor.predicate).or_insert(*accessor);
        }
        self.capabilities.push(*capability);
        Ok(())
    }

    pub fn implements(&self, capability: &Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// Names of the included capabilities, in inclusion order.
    pub fn capabilities(&self) -> Vec<&'static str> {
        self.capabilities.iter().map(|c| c.name).collect()
    }

    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.by_name.get(name)
    }

    pub fn for_predicate(&self, predicate: &str) -> Option<&Accessor> {
        self.by_predicate.get(predicate)
    }

    pub fn accessors(&self) -> impl Iterator<Item = &Accessor> {
        self.by_name.values()
    }
}

fn conflict(first: &Accessor, second: &Accessor, reason: String) -> Error {
    Error::AccessorConflict {
        predicate: second.predicate.to_owned(),
        first: first.name.to_owned(),
        second: second.name.to_owned(),
        reason,
    }
}
