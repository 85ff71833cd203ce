//! RDF format parsers and serializers.
//!
//! Turtle, TriG, N-Triples and N-Quads share one recursive-descent engine
//! ([`engine`]) configured per format; RDF/XML ([`rdfxml`]) and JSON-LD
//! ([`jsonld`]) are independent parsers over `quick-xml`/`serde_json`.
//! [`canonical`] serializes a quad multiset to canonical N-Triples/N-Quads.
//!
//! All parsers are zero-copy where the input allows it: returned [`rdf_model::Quad`]s
//! borrow from either the source `&str` or the [`bumpalo::Bump`] arena passed
//! alongside it.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod canonical;
pub mod engine;
pub mod iri;
pub mod jsonld;
pub mod nquads;
pub mod ntriples;
pub mod rdfxml;
pub mod trig;
pub mod turtle;

use bumpalo::Bump;
use rdf_model::Quad;

pub use canonical::{canonical_nquads, canonical_ntriples};
pub use nquads::NQuadsParser;
pub use ntriples::NTriplesParser;
pub use rdfxml::RdfXmlParser;
pub use trig::TrigParser;
pub use turtle::TurtleParser;

/// RDF format types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RDFFormat {
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
    /// N-Quads format (.nq)
    NQuads,
    /// TriG format (.trig)
    TriG,
    /// JSON-LD format (.jsonld)
    JSONLD,
    /// RDF/XML format (.rdf, .owl)
    RDFXML,
}

impl RDFFormat {
    /// Resolve a MIME content type (parameters such as `; charset=utf-8`
    /// stripped, matched case-insensitively) to the format that handles it.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let base = content_type.split(';').next().unwrap_or(content_type).trim();
        match base.to_ascii_lowercase().as_str() {
            "application/n-triples" | "text/plain" => Some(RDFFormat::NTriples),
            "application/n-quads" => Some(RDFFormat::NQuads),
            "text/turtle" | "application/x-turtle" => Some(RDFFormat::Turtle),
            "application/trig" | "application/x-trig" => Some(RDFFormat::TriG),
            "application/rdf+xml" => Some(RDFFormat::RDFXML),
            "application/ld+json" => Some(RDFFormat::JSONLD),
            _ => None,
        }
    }
}

/// Errors that can occur during parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Malformed input. Carries the format that was parsing, the byte
    /// offset into the input where the failure was detected, and a
    /// human-readable description of what was expected there.
    #[error("{format} parse error at byte {offset}: expected {expectation}")]
    Syntax {
        /// The format being parsed (`"turtle"`, `"n-quads"`, etc.).
        format: &'static str,
        /// Byte offset into the input.
        offset: usize,
        /// What the parser expected to find.
        expectation: String,
    },

    /// An IRI reference was syntactically invalid or, if relative, had no
    /// base IRI in scope to resolve against.
    #[error("invalid IRI: {0}")]
    InvalidIri(String),

    /// A literal's lexical form did not match its declared datatype.
    #[error("invalid literal: {0}")]
    InvalidLiteral(String),

    /// Underlying I/O failure reading the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A content type has no known parser.
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// A term was used somewhere it cannot legally occupy (e.g. a literal
    /// as subject).
    #[error("invalid term: {0}")]
    InvalidTerm(String),

    /// A model-level error surfaced while building terms (encoding,
    /// position validity, etc.) during parsing.
    #[error(transparent)]
    Model(#[from] rdf_model::RdfError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse an RDF document whose format is identified by MIME content type,
/// dispatching to the matching parser: a POST of an RDF document with a
/// recognised content type invokes the matching parser.
///
/// Returns [`ParseError::UnsupportedContentType`] for unrecognised types.
pub fn parse_by_content_type<'a>(
    content_type: &str,
    input: &'a str,
    base: Option<&str>,
    arena: &'a Bump,
) -> ParseResult<Vec<Quad<'a>>> {
    let format = RDFFormat::from_content_type(content_type)
        .ok_or_else(|| ParseError::UnsupportedContentType(content_type.to_string()))?;
    parse_format(format, input, base, arena)
}

/// Parse an RDF document already known to be in `format`.
pub fn parse_format<'a>(
    format: RDFFormat,
    input: &'a str,
    base: Option<&str>,
    arena: &'a Bump,
) -> ParseResult<Vec<Quad<'a>>> {
    match format {
        RDFFormat::Turtle => TurtleParser::new().parse(input, base, arena),
        RDFFormat::TriG => TrigParser::new().parse(input, base, arena),
        RDFFormat::NTriples => NTriplesParser::new().parse(input, arena),
        RDFFormat::NQuads => NQuadsParser::new().parse(input, arena),
        RDFFormat::RDFXML => RdfXmlParser::new().parse(input, base, arena),
        RDFFormat::JSONLD => jsonld::JsonLdParser::new().parse(input, base, arena),
    }
}
