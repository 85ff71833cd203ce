//! Zero-copy RDF-1.2 type system with string interning and fixed-width term encoding
//!
//! This crate provides the core RDF-1.2 data model:
//! - Zero-copy node representations using lifetimes
//! - String interning for memory efficiency ([`Dictionary`])
//! - RDF-1.2 term support: triple terms, quoted triples, reification, directional
//!   language-tagged literals
//! - A fixed 17-byte encoding ([`encoding`]) used as the storage layer's term representation,
//!   backed by a string side-table ([`side_table`]) for values that don't fit inline
//!
//! # Architecture
//!
//! Follows Apache Jena's node hierarchy but optimized for Rust:
//! - No GC overhead (uses lifetimes and arenas)
//! - Zero-copy semantics throughout
//! - Type-safe at compile time
//!
//! # Example
//!
//! ```rust,ignore
//! use rdf_model::{Node, Triple, Dictionary};
//!
//! let dict = Dictionary::new();
//! let subject = Node::iri(dict.intern("http://example.org/subject"));
//! let predicate = Node::iri(dict.intern("http://example.org/predicate"));
//! let object = Node::literal_str(dict.intern("value"));
//!
//! let triple = Triple::new_outer(subject, predicate, object)?;
//! ```

#![deny(unsafe_code)] // Can be overridden with #[allow(unsafe_code)] per module
#![warn(missing_docs, rust_2018_idioms)]

mod dictionary;
pub mod encoding;
mod node;
mod quad;
pub mod side_table;
mod temporal;
mod triple;
mod vocab;

pub use dictionary::Dictionary;
pub use encoding::{EncodedTerm, TermKind};
pub use node::{BlankNode, Direction, IriRef, Literal, Node};
pub use quad::Quad;
pub use side_table::SideTable;
pub use triple::Triple;
pub use vocab::Vocabulary;

/// Errors that can occur when working with RDF data.
#[derive(Debug, thiserror::Error)]
pub enum RdfError {
    /// Invalid IRI format.
    #[error("invalid IRI: {0}")]
    InvalidIri(String),

    /// Invalid literal format.
    #[error("invalid literal: {0}")]
    InvalidLiteral(String),

    /// Invalid blank node label.
    #[error("invalid blank node label: {0}")]
    InvalidBlankNode(String),

    /// A term was used in a position it cannot legally occupy, or a quoted
    /// triple/reifier reached storage without being desugared first.
    #[error("invalid term: {0}")]
    InvalidTerm(String),

    /// A term's in-memory representation could not be packed into the
    /// fixed-width encoding (should not happen for well-formed terms).
    #[error("encoding error: {0}")]
    Encoding(#[from] encoding::EncodingError),

    /// A stored encoded term could not be decoded back to a [`Node`], most
    /// often because its side-table entry is missing.
    #[error("decode error: {0}")]
    Decode(#[from] encoding::DecodeError),
}

/// Result type for RDF operations.
pub type Result<T> = std::result::Result<T, RdfError>;
