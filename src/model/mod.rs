//! # Thing Model
//!
//! The generic entity store: values, per-predicate slots, blank-node structs
//! and IRI-identified Things, each with a builder.
//!
//! Design rule: this module is pure data. No I/O, no global state, no locks.
//! Conversions that need a datatype registry take it as an argument.

pub mod value;
pub mod slot;
pub mod predicates_objects;
pub mod thing;
pub mod vocab;

pub use value::{Value, Link, LangString, Literal};
pub use slot::{Slot, SlotState};
pub use predicates_objects::{PredicatesObjects, PredicatesObjectsBuilder, PropertiesBuilder};
pub use thing::{Thing, ThingBuilder};
