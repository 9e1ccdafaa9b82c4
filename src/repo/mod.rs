//! # Repository
//!
//! The read contract consumers use to look Things up by IRI, and an
//! in-memory implementation of it.
//!
//! | Type | Module | Description |
//! |------|--------|-------------|
//! | `ThingProvider` | here | `get(iri)`; absence is `Ok(None)`, never an error |
//! | `ThingRepository` | here | Thread-safe in-memory store, merges on same IRI |
//! | `ThingMerger` | `merge` | Pluggable policy for two Things sharing an IRI |
//! | `ThingsBuilders` | `builders` | One builder per IRI while loading a document |

pub mod builders;
pub mod merge;

pub use builders::ThingsBuilders;
pub use merge::{LastWriteWins, RejectMerger, ThingMerger, UnionMerger};

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::model::Thing;
use crate::Result;

/// Looks Things up by IRI.
pub trait ThingProvider: Send + Sync {
    /// `Ok(None)` if no Thing has this IRI.
    fn get(&self, iri: &str) -> Result<Option<Thing>>;
}

// ============================================================================
// Configuration
// ============================================================================

/// What to do when a Thing is stored under an IRI that is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeStrategy {
    /// The incoming Thing replaces the stored one.
    LastWriteWins,
    /// Values of both are combined per predicate.
    #[default]
    Union,
    /// Differing content is an error.
    Reject,
}

impl MergeStrategy {
    pub fn merger(&self) -> Box<dyn ThingMerger> {
        match self {
            MergeStrategy::LastWriteWins => Box::new(LastWriteWins),
            MergeStrategy::Union => Box::new(UnionMerger),
            MergeStrategy::Reject => Box::new(RejectMerger),
        }
    }
}

/// Configuration for a [`ThingRepository`].
#[derive(Debug, Clone, Default)]
pub struct RepositoryConfig {
    pub merge: MergeStrategy,
    /// Capacity hint; 0 for none.
    pub expected_size: usize,
}

// ============================================================================
// ThingRepository
// ============================================================================

/// In-memory Things keyed by IRI.
///
/// Clones share the same storage. Each `store` holds the write lock for the
/// whole merge, so concurrent stores of the same IRI never lose values.
#[derive(Clone)]
pub struct ThingRepository {
    inner: Arc<RepositoryInner>,
}

struct RepositoryInner {
    things: RwLock<HashMap<String, Thing>>,
    merger: Box<dyn ThingMerger>,
}

impl ThingRepository {
    pub fn new() -> Self {
        Self::with_config(RepositoryConfig::default())
    }

    pub fn with_config(config: RepositoryConfig) -> Self {
        Self::with_merger(config.merge.merger(), config.expected_size)
    }

    /// A repository merging with a custom policy.
    pub fn with_merger(merger: Box<dyn ThingMerger>, expected_size: usize) -> Self {
        Self {
            inner: Arc::new(RepositoryInner {
                things: RwLock::new(HashMap::with_capacity(expected_size)),
                merger,
            }),
        }
    }

    /// Store a Thing, merging it into any Thing already stored under its IRI.
    pub fn store(&self, thing: Thing) -> Result<()> {
        let mut things = self.inner.things.write();
        let stored = match things.get(thing.iri()) {
            Some(existing) => {
                debug!(iri = thing.iri(), merger = ?self.inner.merger, "merging thing");
                self.inner.merger.merge(existing, &thing)?
            }
            None => thing,
        };
        things.insert(stored.iri().to_owned(), stored);
        Ok(())
    }

    /// Store several Things; stops at the first merge failure.
    pub fn store_all(&self, things: impl IntoIterator<Item = Thing>) -> Result<usize> {
        let mut count = 0;
        for thing in things {
            self.store(thing)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.inner.things.read().contains_key(iri)
    }

    pub fn len(&self) -> usize {
        self.inner.things.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.things.read().is_empty()
    }

    /// All stored IRIs, sorted.
    pub fn list_iris(&self) -> Vec<String> {
        let mut iris: Vec<String> = self.inner.things.read().keys().cloned().collect();
        iris.sort_unstable();
        iris
    }

    /// All stored Things, sorted by IRI.
    pub fn list(&self) -> Vec<Thing> {
        let mut things: Vec<Thing> = self.inner.things.read().values().cloned().collect();
        things.sort_unstable_by(|a, b| a.iri().cmp(b.iri()));
        things
    }

    pub fn remove(&self, iri: &str) -> Option<Thing> {
        self.inner.things.write().remove(iri)
    }
}

impl Default for ThingRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ThingProvider for ThingRepository {
    fn get(&self, iri: &str) -> Result<Option<Thing>> {
        Ok(self.inner.things.read().get(iri).cloned())
    }
}
