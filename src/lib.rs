//! # thing-rs: Schema-less Things with Typed Views
//!
//! A *Thing* is an entity identified by an IRI that carries an open set of
//! named, typed properties. Application code layers strongly-typed accessor
//! views ("capabilities") over that generic storage without generating code
//! per entity type.
//!
//! ## Design Principles
//!
//! 1. **Immutable snapshots**: `Thing` never changes after `build()`; evolve it with `copy()`
//! 2. **Slots, not lists**: every predicate holds a `Slot` whose cardinality
//!    (scalar, unordered, ordered) follows from the mutations applied to it
//! 3. **Exact conversions**: datatype-driven, never best-effort
//! 4. **No global state**: datatype and kind registries are constructed once and passed around
//!
//! ## Quick Start
//!
//! ```rust
//! use thing_rs::{PropertiesBuilder, Thing, vocab};
//!
//! # fn example() -> thing_rs::Result<()> {
//! let thing = Thing::builder()
//!     .iri("https://example.org/ada")
//!     .set(vocab::schema::NAME, "Ada")
//!     .add_ordered("https://example.org/steps", "first")
//!     .add_ordered("https://example.org/steps", "second")
//!     .build()?;
//!
//! assert_eq!(thing.get_string(vocab::schema::NAME)?, Some("Ada".to_string()));
//! assert!(thing.is_ordered("https://example.org/steps"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Layers
//!
//! | Layer | Module | Description |
//! |-------|--------|-------------|
//! | Model | `model` | `Value`, `Slot`, `PredicatesObjects`, `Thing` and their builders |
//! | Datatypes | `datatype` | IRI → converter registry between stored and typed values |
//! | Views | `view` | Capability tables, composed interfaces, kind registries |
//! | Repository | `repo` | Read contract, in-memory store, merge strategies |

// ============================================================================
// Modules
// ============================================================================

#[macro_use]
mod macros;

pub mod model;
pub mod datatype;
pub mod view;
pub mod repo;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Value, Link, LangString, Literal,
    Slot, SlotState,
    PredicatesObjects, PredicatesObjectsBuilder, PropertiesBuilder,
    Thing, ThingBuilder,
    vocab,
};

// ============================================================================
// Re-exports: Datatypes
// ============================================================================

pub use datatype::{Datatype, DatatypeRegistry, FromValue, LexicalDatatype, ValueKind};

// ============================================================================
// Re-exports: Views
// ============================================================================

pub use view::{
    Accessor, Capability, Interface, Multiplicity,
    View, ViewBuilder, AsView, AsViewBuilder,
    KindFactory, KindRegistry, KindChain,
};

// ============================================================================
// Re-exports: Repository
// ============================================================================

pub use repo::{
    ThingProvider, ThingRepository, ThingsBuilders,
    ThingMerger, MergeStrategy, RepositoryConfig,
    LastWriteWins, UnionMerger, RejectMerger,
};

// ============================================================================
// Error Types
// ============================================================================

/// Everything that can go wrong while building, reading or viewing Things.
///
/// Configuration errors (missing IRI, conflicting bindings, unknown kinds) are
/// caller bugs. Data errors carry the predicate and offending value so the
/// caller can report them. A missing predicate is never an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Cannot build Thing without IRI")]
    MissingIri,

    #[error("IRI must not be empty")]
    EmptyIri,

    #[error("IRI already set to {current}, cannot change it to {requested}")]
    IriAlreadySet { current: String, requested: String },

    #[error("{predicate} already has datatype {existing}, cannot also be {requested}")]
    DatatypeConflict { predicate: String, existing: String, requested: String },

    #[error("Datatype {0} is already registered")]
    DuplicateDatatype(String),

    #[error("Accessors {first} and {second} disagree on {predicate}: {reason}")]
    AccessorConflict { predicate: String, first: String, second: String, reason: String },

    #[error("Kind {0} is already registered")]
    KindConflict(String),

    #[error("Not handled: {0}")]
    NotHandled(String),

    #[error("Duplicate value {value} for unordered {predicate}")]
    DuplicateValue { predicate: String, value: String },

    #[error("{predicate} holds several values, not one")]
    NotScalar { predicate: String },

    #[error("{predicate} has no datatype; cannot convert {value} to {target}")]
    MissingDatatype { predicate: String, value: String, target: String },

    #[error("Datatype {datatype} of {predicate} is not registered")]
    UnknownDatatype { datatype: String, predicate: String },

    #[error("Cannot convert {value} to {target} as {datatype}: {reason}")]
    Conversion { datatype: String, value: String, target: String, reason: String },

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Cannot merge {iri}: {reason}")]
    MergeConflict { iri: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
