//! Turtle (RDF 1.2) parser: a thin, stateless wrapper over [`crate::engine`].

use crate::engine::{self, EngineConfig};
use crate::ParseResult;
use bumpalo::Bump;
use rdf_model::Quad;

/// Parses Turtle documents.
///
/// Holds no per-document state itself — `@prefix`/`@base` scope is local to
/// a single [`TurtleParser::parse`] call — so one parser can be reused
/// across documents.
#[derive(Debug, Default)]
pub struct TurtleParser;

impl TurtleParser {
    /// Construct a parser.
    pub fn new() -> Self {
        TurtleParser
    }

    /// Parse a complete Turtle document, resolving relative IRIs against
    /// `base` (if given), allocating synthesized terms out of `arena`.
    pub fn parse<'a>(&self, input: &'a str, base: Option<&str>, arena: &'a Bump) -> ParseResult<Vec<Quad<'a>>> {
        engine::parse(input, base, EngineConfig::turtle(), arena)
    }
}
