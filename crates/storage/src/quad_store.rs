//! The quad store: ties a [`StorageBackend`] to the eleven [`IndexKind`] key
//! spaces and a [`SideTable`] for decode, exposing the insert/delete/scan API
//! the query layer consumes.

use crate::indexes::{DecodedQuad, EncodedPattern, EncodedQuad, IndexKind};
use crate::observability::{track_batch, track_operation, OperationType};
use crate::{StorageBackend, StorageError, StorageResult};
use parking_lot::RwLock;
use rdf_model::encoding::DecodedTerm;
use rdf_model::side_table::SideTable;
use rdf_model::{Node, Quad};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// A quad store over a pluggable [`StorageBackend`].
///
/// Every quad is written as one 68-byte key (empty value) per [`IndexKind`]
/// permutation. The [`SideTable`] holds the original strings for terms whose
/// encoding is a hash rather than an inline value; it must be written before
/// the matching index keys become visible, so a reader never sees a key it
/// cannot decode.
///
/// Multi-reader / single-writer: `&self` methods rely on the backend's own
/// internal locking for reads; `insert`/`delete` take `&mut self` so only one
/// writer can mutate at a time.
pub struct QuadStore<B: StorageBackend> {
    backend: B,
    side_table: Arc<SideTable>,
    count: Arc<RwLock<u64>>,
}

impl<B: StorageBackend> QuadStore<B> {
    /// Wrap a backend in a fresh, empty quad store.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            side_table: Arc::new(SideTable::new()),
            count: Arc::new(RwLock::new(0)),
        }
    }

    /// The side-table backing this store's term decoding.
    pub fn side_table(&self) -> &Arc<SideTable> {
        &self.side_table
    }

    /// Total number of distinct quads currently stored.
    pub fn count(&self) -> u64 {
        *self.count.read()
    }

    /// Insert a quad. Idempotent: returns `Ok(true)` if the quad was new,
    /// `Ok(false)` if it was already present (a no-op write).
    pub fn insert_quad(&mut self, quad: &Quad<'_>) -> StorageResult<bool> {
        track_operation(OperationType::Put, || self.insert_quad_inner(quad))
    }

    fn insert_quad_inner(&mut self, quad: &Quad<'_>) -> StorageResult<bool> {
        let encoded = EncodedQuad::encode(quad, &self.side_table)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let primary_key = IndexKind::Spog.encode_key(&encoded);
        if self.backend.contains(&primary_key)? {
            return Ok(false);
        }

        for kind in IndexKind::all() {
            let key = kind.encode_key(&encoded);
            self.backend.put(&key, &[])?;
        }

        *self.count.write() += 1;
        Ok(true)
    }

    /// Insert a batch of quads atomically with respect to readers: the
    /// entire set of index keys for every new quad in the batch is written
    /// with a single [`StorageBackend::batch_put`] call, so a reader never
    /// observes some of the batch's quads but not others.
    ///
    /// Returns the number of quads newly inserted (duplicates within the
    /// batch, or quads already present in the store, do not count).
    pub fn insert_quads_batch(&mut self, quads: &[Quad<'_>]) -> StorageResult<u64> {
        track_batch(OperationType::BatchPut, quads);
        track_operation(OperationType::BatchPut, || self.insert_quads_batch_inner(quads))
    }

    fn insert_quads_batch_inner(&mut self, quads: &[Quad<'_>]) -> StorageResult<u64> {
        let mut pairs = Vec::with_capacity(quads.len() * IndexKind::all().len());
        let mut seen_primary = FxHashSet::default();
        let mut new_count = 0u64;

        for quad in quads {
            let encoded = EncodedQuad::encode(quad, &self.side_table)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            let primary_key = IndexKind::Spog.encode_key(&encoded);
            if !seen_primary.insert(primary_key) {
                continue; // duplicate within the batch
            }
            if self.backend.contains(&primary_key)? {
                continue; // already in the store
            }
            new_count += 1;
            for kind in IndexKind::all() {
                pairs.push((kind.encode_key(&encoded).to_vec(), Vec::new()));
            }
        }

        self.backend.batch_put(pairs)?;
        *self.count.write() += new_count;
        Ok(new_count)
    }

    /// Remove a quad. Idempotent: returns `Ok(true)` if a quad was removed,
    /// `Ok(false)` if it was not present.
    pub fn delete_quad(&mut self, quad: &Quad<'_>) -> StorageResult<bool> {
        track_operation(OperationType::Delete, || self.delete_quad_inner(quad))
    }

    fn delete_quad_inner(&mut self, quad: &Quad<'_>) -> StorageResult<bool> {
        let encoded = EncodedQuad::encode(quad, &self.side_table)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let primary_key = IndexKind::Spog.encode_key(&encoded);
        if !self.backend.contains(&primary_key)? {
            return Ok(false);
        }

        for kind in IndexKind::all() {
            let key = kind.encode_key(&encoded);
            self.backend.delete(&key)?;
        }

        let mut count = self.count.write();
        *count = count.saturating_sub(1);
        Ok(true)
    }

    /// Point lookup: is this exact quad stored?
    pub fn contains(&self, quad: &Quad<'_>) -> StorageResult<bool> {
        track_operation(OperationType::Contains, || {
            let encoded = EncodedQuad::encode(quad, &self.side_table)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            let key = IndexKind::Spog.encode_key(&encoded);
            self.backend.contains(&key)
        })
    }

    /// Scan for quads matching a pattern (`None` in any position is a
    /// wildcard). Picks the index whose bound prefix is longest and opens a
    /// single ordered range scan against it.
    ///
    /// Returns a lazy iterator over that index's key order: finite, ordered,
    /// restartable (calling `scan` again opens a fresh range scan over
    /// whatever the backend holds at that later point), and cancellable by
    /// dropping it — nothing beyond the first unread key is decoded. Only
    /// setting up the scan (pattern encoding, index selection, opening the
    /// backend's range) is recorded by `track_operation`; iterating happens
    /// outside that span the same way the backend's own `prefix_scan`
    /// iterator is driven by the caller, not by this layer.
    pub fn scan<'s>(
        &'s self,
        subject: Option<&Node<'_>>,
        predicate: Option<&Node<'_>>,
        object: Option<&Node<'_>>,
        graph: Option<&Node<'_>>,
    ) -> StorageResult<Box<dyn Iterator<Item = StorageResult<DecodedQuad>> + 's>> {
        track_operation(OperationType::RangeScan, || {
            let pattern = EncodedPattern::encode(subject, predicate, object, graph, &self.side_table)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            let kind = IndexKind::select_best(&pattern);
            let prefix = kind.scan_prefix(&pattern);

            let side_table = Arc::clone(&self.side_table);
            let iter = self.backend.prefix_scan(&prefix)?.map(move |(key, _value)| {
                kind.decode_key(&key, &side_table)
                    .map_err(|e| StorageError::Serialization(e.to_string()))
            });
            Ok(Box::new(iter) as Box<dyn Iterator<Item = StorageResult<DecodedQuad>> + 's>)
        })
    }

    /// The set of distinct graph terms currently populated, excluding the
    /// default graph.
    ///
    /// `DecodedTerm` has no `Hash` impl (its hashed-term variants carry
    /// owned strings resolved through the side table, not the 128-bit hash
    /// itself), so distinctness is tracked via each term's `Debug`
    /// rendering, which is injective over the decoded representation.
    pub fn named_graphs(&self) -> StorageResult<Vec<DecodedTerm>> {
        let all = self.scan(None, None, None, None)?;
        let mut seen = FxHashSet::default();
        let mut graphs = Vec::new();
        for quad in all {
            let quad = quad?;
            if matches!(quad.graph, DecodedTerm::DefaultGraph) {
                continue;
            }
            let key = format!("{:?}", quad.graph);
            if seen.insert(key) {
                graphs.push(quad.graph);
            }
        }
        Ok(graphs)
    }

    /// Access the underlying backend's aggregate statistics.
    pub fn backend_stats(&self) -> crate::StorageStats {
        self.backend.stats()
    }
}
