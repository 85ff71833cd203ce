//! N-Triples (strict RDF 1.2) parser: a thin wrapper over [`crate::engine`].

use crate::engine::{self, EngineConfig};
use crate::ParseResult;
use bumpalo::Bump;
use rdf_model::Quad;

/// Parses N-Triples documents. N-Triples has no prefixes, no base, and no
/// abbreviations — every term is written out in full.
#[derive(Debug, Default)]
pub struct NTriplesParser;

impl NTriplesParser {
    /// Construct a parser.
    pub fn new() -> Self {
        NTriplesParser
    }

    /// Parse a complete N-Triples document. There is no base IRI concept in
    /// strict N-Triples: every IRI reference must already be absolute.
    pub fn parse<'a>(&self, input: &'a str, arena: &'a Bump) -> ParseResult<Vec<Quad<'a>>> {
        engine::parse(input, None, EngineConfig::ntriples(), arena)
    }
}
