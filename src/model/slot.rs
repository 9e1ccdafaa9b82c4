//! Slot: the per-predicate value container.
//!
//! A slot starts out as a single scalar and is promoted to a multi-valued
//! collection by `add`/`add_ordered`. Values are always kept in insertion
//! order internally, so a later ordered mutation never loses the relative
//! order of values added before it.
//!
//! | Operation | Scalar | Unordered | Ordered |
//! |-----------|--------|-----------|---------|
//! | `set(v)` | replace | → Scalar(v) | → Scalar(v) |
//! | `add(v)` | → Unordered{prev, v} | insert, duplicate rejected | append |
//! | `add_ordered(v)` | → Ordered[prev, v] | → Ordered[prior order.., v] | append |
//!
//! Once a slot has seen an ordered mutation it stays ordered for its whole
//! builder lineage, including across `set` and `copy()`.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use super::Value;

/// Cardinality of a present slot. An absent predicate has no slot at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotState {
    /// Exactly one value.
    Scalar,
    /// A duplicate-free collection of values without an order contract.
    Unordered,
    /// An append-ordered sequence; duplicates allowed, position meaningful.
    Ordered,
}

/// The values of one predicate plus its cardinality state.
///
/// Deserializing checks the same invariants the builders keep: at least one
/// value, none of them absent, exactly one in a scalar slot, no duplicates in
/// an unordered one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SlotRepr")]
pub struct Slot {
    values: SmallVec<[Value; 1]>,
    multi: bool,
    /// Sticky: never reset once set.
    ordered: bool,
}

#[derive(Deserialize)]
struct SlotRepr {
    values: SmallVec<[Value; 1]>,
    multi: bool,
    ordered: bool,
}

impl TryFrom<SlotRepr> for Slot {
    type Error = String;

    fn try_from(repr: SlotRepr) -> Result<Self, String> {
        if repr.values.is_empty() {
            return Err("slot has no values".into());
        }
        if let Some(absent) = repr.values.iter().find(|v| v.is_absent()) {
            return Err(format!("slot holds an absent value {absent}"));
        }
        if !repr.multi && repr.values.len() != 1 {
            return Err(format!("scalar slot holds {} values", repr.values.len()));
        }
        if repr.multi && !repr.ordered {
            let distinct: HashSet<&Value> = repr.values.iter().collect();
            if distinct.len() != repr.values.len() {
                return Err("unordered slot holds duplicate values".into());
            }
        }
        Ok(Self { values: repr.values, multi: repr.multi, ordered: repr.ordered })
    }
}

impl Slot {
    pub fn scalar(value: Value) -> Self {
        Self { values: smallvec![value], multi: false, ordered: false }
    }

    pub fn unordered(value: Value) -> Self {
        Self { values: smallvec![value], multi: true, ordered: false }
    }

    pub fn ordered(value: Value) -> Self {
        Self { values: smallvec![value], multi: true, ordered: true }
    }

    pub fn state(&self) -> SlotState {
        match (self.multi, self.ordered) {
            (false, _) => SlotState::Scalar,
            (true, false) => SlotState::Unordered,
            (true, true) => SlotState::Ordered,
        }
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// True when the slot exposes an ordered, duplicate-tolerant sequence.
    pub fn is_ordered(&self) -> bool {
        self.multi && self.ordered
    }

    /// The value of a scalar slot; `None` for multi-valued slots.
    pub fn as_scalar(&self) -> Option<&Value> {
        if self.multi { None } else { self.values.first() }
    }

    /// The only value, whether scalar or a single-element collection.
    pub fn single(&self) -> Option<&Value> {
        match self.values.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// All values in insertion order. For unordered slots that order is an
    /// implementation detail, not a contract.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.values.contains(value)
    }

    /// The values as a set, the natural view of an unordered slot.
    pub fn to_set(&self) -> HashSet<&Value> {
        self.values.iter().collect()
    }

    // ========================================================================
    // Transitions (crate-private; builders own all mutation)
    // ========================================================================

    pub(crate) fn set(&mut self, value: Value) {
        self.values.clear();
        self.values.push(value);
        self.multi = false;
    }

    /// Unordered add. Hands the value back if it would duplicate an existing
    /// one in a slot that is not (yet) ordered.
    pub(crate) fn add(&mut self, value: Value) -> Result<(), Value> {
        if !self.ordered && self.values.contains(&value) {
            return Err(value);
        }
        self.multi = true;
        self.values.push(value);
        Ok(())
    }

    pub(crate) fn add_ordered(&mut self, value: Value) {
        self.ordered = true;
        self.multi = true;
        self.values.push(value);
    }

    /// Whether this predicate has ever been ordered, even if currently scalar.
    pub(crate) fn ordered_lineage(&self) -> bool {
        self.ordered
    }
}

// ============================================================================
// Equality & hashing
// ============================================================================

/// Unordered slots compare as sets; everything else compares as a sequence.
/// Only the visible [`SlotState`] takes part: a scalar that was once ordered
/// equals one that never was.
impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        if self.state() != other.state() {
            return false;
        }
        if self.state() == SlotState::Unordered {
            self.values.len() == other.values.len()
                && self.values.iter().all(|v| other.values.contains(v))
        } else {
            self.values == other.values
        }
    }
}

impl Eq for Slot {}

impl Hash for Slot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.state().hash(state);
        if self.state() == SlotState::Unordered {
            state.write_usize(self.values.len());
            state.write_u64(unordered_hash(self.values.iter()));
        } else {
            self.values.hash(state);
        }
    }
}

/// Order-independent hash of a collection: sum of the element hashes.
pub(crate) fn unordered_hash<T: Hash>(items: impl Iterator<Item = T>) -> u64 {
    items
        .map(|item| {
            let mut hasher = DefaultHasher::new();
            item.hash(&mut hasher);
            hasher.finish()
        })
        .fold(0u64, u64::wrapping_add)
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = match self.state() {
            SlotState::Scalar => {
                return match self.values.first() {
                    Some(v) => write!(f, "{v}"),
                    None => Ok(()),
                };
            }
            SlotState::Unordered => ("{", "}"),
            SlotState::Ordered => ("[", "]"),
        };
        write!(f, "{open}")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{v}")?;
        }
        write!(f, "{close}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::from(text)
    }

    #[test]
    fn test_scalar_promotes_to_unordered_keeping_first() {
        let mut slot = Slot::scalar(s("a"));
        slot.add(s("b")).unwrap();
        assert_eq!(slot.state(), SlotState::Unordered);
        assert_eq!(slot.values(), &[s("a"), s("b")]);
    }

    #[test]
    fn test_unordered_rejects_duplicates() {
        let mut slot = Slot::unordered(s("a"));
        assert_eq!(slot.add(s("a")), Err(s("a")));
        assert_eq!(slot.len(), 1);
    }

    #[test]
    fn test_scalar_plus_same_value_is_duplicate() {
        let mut slot = Slot::scalar(s("a"));
        assert!(slot.add(s("a")).is_err());
    }

    #[test]
    fn test_unordered_to_ordered_keeps_prior_order() {
        let mut slot = Slot::unordered(s("x"));
        slot.add(s("y")).unwrap();
        slot.add_ordered(s("z"));
        assert_eq!(slot.state(), SlotState::Ordered);
        assert_eq!(slot.values(), &[s("x"), s("y"), s("z")]);
    }

    #[test]
    fn test_ordered_is_sticky_across_add() {
        let mut slot = Slot::ordered(s("c"));
        slot.add_ordered(s("b"));
        slot.add(s("a")).unwrap();
        slot.add(s("a")).unwrap();
        assert_eq!(slot.state(), SlotState::Ordered);
        assert_eq!(slot.values(), &[s("c"), s("b"), s("a"), s("a")]);
    }

    #[test]
    fn test_set_replaces_but_keeps_ordered_lineage() {
        let mut slot = Slot::ordered(s("a"));
        slot.set(s("b"));
        assert_eq!(slot.state(), SlotState::Scalar);
        assert_eq!(slot.as_scalar(), Some(&s("b")));

        slot.add(s("b")).unwrap();
        assert_eq!(slot.state(), SlotState::Ordered);
    }

    #[test]
    fn test_unordered_equality_ignores_order() {
        let mut ab = Slot::unordered(s("a"));
        ab.add(s("b")).unwrap();
        let mut ba = Slot::unordered(s("b"));
        ba.add(s("a")).unwrap();
        assert_eq!(ab, ba);

        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();
        ab.hash(&mut h1);
        ba.hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn test_ordered_equality_respects_order() {
        let mut ab = Slot::ordered(s("a"));
        ab.add_ordered(s("b"));
        let mut ba = Slot::ordered(s("b"));
        ba.add_ordered(s("a"));
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_scalar_equality_ignores_ordered_lineage() {
        let mut once_ordered = Slot::ordered(s("x"));
        once_ordered.set(s("a"));
        assert_eq!(once_ordered, Slot::scalar(s("a")));

        let hash = |slot: &Slot| {
            let mut hasher = DefaultHasher::new();
            slot.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&once_ordered), hash(&Slot::scalar(s("a"))));
        assert_ne!(Slot::ordered(s("a")), Slot::unordered(s("a")));
    }

    #[test]
    fn test_deserialize_rejects_broken_slots() {
        let ok = r#"{"values":[{"type":"String","value":"a"}],"multi":false,"ordered":false}"#;
        assert_eq!(serde_json::from_str::<Slot>(ok).unwrap(), Slot::scalar(s("a")));

        for broken in [
            r#"{"values":[],"multi":false,"ordered":false}"#,
            r#"{"values":[{"type":"String","value":""}],"multi":false,"ordered":false}"#,
            r#"{"values":[{"type":"String","value":"a"},{"type":"String","value":"b"}],"multi":false,"ordered":false}"#,
            r#"{"values":[{"type":"String","value":"a"},{"type":"String","value":"a"}],"multi":true,"ordered":false}"#,
        ] {
            assert!(serde_json::from_str::<Slot>(broken).is_err(), "{broken}");
        }
    }
}
