//! N-Quads (strict RDF 1.2) parser: a thin wrapper over [`crate::engine`].

use crate::engine::{self, EngineConfig};
use crate::ParseResult;
use bumpalo::Bump;
use rdf_model::Quad;

/// Parses N-Quads documents: strict N-Triples plus an optional trailing
/// graph term per statement.
#[derive(Debug, Default)]
pub struct NQuadsParser;

impl NQuadsParser {
    /// Construct a parser.
    pub fn new() -> Self {
        NQuadsParser
    }

    /// Parse a complete N-Quads document. No base IRI concept; every IRI
    /// reference must already be absolute.
    pub fn parse<'a>(&self, input: &'a str, arena: &'a Bump) -> ParseResult<Vec<Quad<'a>>> {
        engine::parse(input, None, EngineConfig::nquads(), arena)
    }
}
