//! String side-table backing hashed term encodings.
//!
//! [`crate::encoding`] packs IRIs, long literals, non-numeric blank labels
//! and triple terms into a 128-bit hash; the original value has to live
//! somewhere so it can be read back out. This is that somewhere: a
//! concurrent map from [`EncodedTerm`] to the data needed to reconstruct it,
//! following the same `parking_lot`-guarded-hashmap shape as [`crate::Dictionary`].
//!
//! The entry for a term must be written before any index key containing that
//! term's encoding becomes visible to readers — otherwise a scan could return
//! a key a concurrent decode can't resolve. The storage layer's insert path
//! is responsible for that ordering; this type only provides the map.

use crate::encoding::EncodedTerm;
use crate::node::Direction;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// The data recorded for one hashed [`EncodedTerm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideTableValue {
    /// Full IRI string.
    Iri(String),
    /// Full blank node label.
    BlankLabel(String),
    /// Full plain literal lexical form (used only when it exceeds the inline limit).
    PlainLiteral(String),
    /// Language-tagged literal data.
    LangLiteral {
        /// Lexical form.
        value: String,
        /// BCP-47 language tag.
        language: String,
        /// Base direction, if any.
        direction: Option<Direction>,
    },
    /// Datatyped literal data (non-numeric/temporal datatypes).
    TypedLiteral {
        /// Lexical form.
        value: String,
        /// Datatype IRI.
        datatype: String,
    },
    /// The three child encodings of a triple term.
    TripleTerm {
        /// Encoded subject.
        subject: EncodedTerm,
        /// Encoded predicate.
        predicate: EncodedTerm,
        /// Encoded object.
        object: EncodedTerm,
    },
}

/// Concurrent, append-mostly map from a hashed [`EncodedTerm`] to its original value.
///
/// Entries are never removed during normal operation: a term's hash encoding
/// may still be referenced by index keys even after every quad using it has
/// been deleted, and garbage-collecting the side table would require a full
/// reference count across every index, which the store does not maintain.
#[derive(Clone)]
pub struct SideTable {
    entries: Arc<RwLock<FxHashMap<EncodedTerm, SideTableValue>>>,
}

impl SideTable {
    /// Create an empty side table.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(FxHashMap::default())),
        }
    }

    /// Insert an entry, overwriting nothing if one already exists (hash
    /// collisions aside, re-inserting the same term always produces the same value).
    pub fn insert(&self, term: EncodedTerm, value: SideTableValue) {
        let mut guard = self.entries.write();
        guard.entry(term).or_insert(value);
    }

    /// Look up the value for an encoded term.
    pub fn get(&self, term: &EncodedTerm) -> Option<SideTableValue> {
        self.entries.read().get(term).cloned()
    }

    /// Number of entries currently recorded.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for SideTable {
    fn default() -> Self {
        Self::new()
    }
}
