//! TriG (RDF 1.2) parser: Turtle plus named-graph blocks, over [`crate::engine`].

use crate::engine::{self, EngineConfig};
use crate::ParseResult;
use bumpalo::Bump;
use rdf_model::Quad;

/// Parses TriG documents: Turtle syntax plus `GRAPH <iri> { ... }` blocks
/// (and the anonymous-graph/bare-subject-block forms).
#[derive(Debug, Default)]
pub struct TrigParser;

impl TrigParser {
    /// Construct a parser.
    pub fn new() -> Self {
        TrigParser
    }

    /// Parse a complete TriG document. Blank-node labels are shared across
    /// graph blocks within one document, matching Turtle's document-wide
    /// blank-node scope.
    pub fn parse<'a>(&self, input: &'a str, base: Option<&str>, arena: &'a Bump) -> ParseResult<Vec<Quad<'a>>> {
        engine::parse(input, base, EngineConfig::trig(), arena)
    }
}
