//! Pluggable storage backends for an RDF-1.2 quad store
//!
//! This crate provides a trait-based abstraction over different sorted
//! key-value backends, and on top of it the quad store itself:
//! - In-memory storage (ultra-fast, no persistence)
//! - RocksDB (persistent, atomic batch writes)
//! - LMDB (alternative persistent backend)
//!
//! # Design Principles
//!
//! 1. **Storage trait**: abstract interface for all backends
//! 2. **Eleven quad indexes**: one sorted key space per (S, P, O, G)
//!    permutation, so any pattern's bound positions form a contiguous prefix
//! 3. **Fixed-width keys**: every index key is four 17-byte encoded terms
//! 4. **Atomic batches**: persistent backends commit multi-key writes
//!    atomically through [`StorageBackend::batch_put`]
//!
//! # Example
//!
//! ```rust
//! use storage::{QuadStore, InMemoryBackend};
//! use rdf_model::{Node, Quad};
//!
//! let mut store = QuadStore::new(InMemoryBackend::new());
//!
//! let quad = Quad::new(
//!     Node::iri("http://example.org/s"),
//!     Node::iri("http://example.org/p"),
//!     Node::literal_str("value"),
//!     Node::DefaultGraph,
//! ).unwrap();
//!
//! store.insert_quad(&quad).unwrap();
//! assert!(store.contains(&quad).unwrap());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod backend;
pub mod indexes;
mod inmemory;
mod observability;
mod pattern;
mod quad_store;

// Optional persistent storage backends
#[cfg(feature = "rocksdb-backend")]
mod rocksdb_backend;

#[cfg(feature = "lmdb-backend")]
mod lmdb_backend;

pub use backend::{StorageBackend, StorageError, StorageResult, StorageStats};
pub use indexes::{Component, DecodedQuad, EncodedPattern, EncodedQuad, IndexKind, KEY_SIZE};
pub use inmemory::InMemoryBackend;
pub use observability::{
    record_error, record_throughput, track_batch, track_operation, HealthStatus,
    OperationType, PerformanceMetrics,
};
pub use pattern::{NodePattern, QuadPattern};
pub use quad_store::QuadStore;

// Export persistent backends when features enabled
#[cfg(feature = "rocksdb-backend")]
pub use rocksdb_backend::RocksDbBackend;

#[cfg(feature = "lmdb-backend")]
pub use lmdb_backend::LmdbBackend;
