//! Shared recursive-descent engine for Turtle, TriG, N-Triples and N-Quads.
//!
//! All four formats are one grammar with a few knobs turned on or off: a
//! [`GraphMode`] (none, TriG-style `GRAPH { }` blocks, or N-Quads' trailing
//! graph term) and a `strict` flag that disables every abbreviation (prefixed
//! names, `@prefix`/`@base`, `a`, bare numeric/boolean literals, multi-line
//! strings, `,`/`;`, property lists, collections, and RDF-1.2 quoted-triple
//! and annotation syntax). [`crate::turtle`], [`crate::trig`],
//! [`crate::ntriples`] and [`crate::nquads`] are thin [`EngineConfig`]
//! presets over this one parser.
//!
//! The parser walks `input` as a byte cursor (all syntactically meaningful
//! characters are ASCII; multi-byte UTF-8 only ever appears *inside* a token
//! whose extent is already known, where it is passed through untouched).
//! Terms that can be returned as a verbatim slice of `input` (identifiers,
//! unescaped strings, absolute IRIs) borrow `'a` directly; terms that have to
//! be synthesized — resolved relative IRIs, unescaped strings, fresh
//! blank-node labels, desugared reifiers — are allocated out of the
//! `'a`-lived [`bumpalo::Bump`] arena threaded through the parse.

use crate::ParseError;
use bumpalo::Bump;
use rdf_model::{Node, Quad, Triple, Vocabulary};
use std::cell::Cell;
use std::collections::HashMap;

/// How (or whether) this configuration recognises a graph component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphMode {
    /// No graph syntax at all (Turtle, N-Triples): every statement lands in
    /// the default graph.
    None,
    /// TriG `GRAPH <iri> { ... }` / bare-subject `{ ... }` blocks.
    TrigBlocks,
    /// N-Quads: an optional fourth IRI/blank term before the terminating `.`.
    TrailingTerm,
}

/// Knobs distinguishing the four surface syntaxes sharing this engine.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Disables directives, prefixed names, `a`, bare numeric/boolean
    /// literals, multi-line/single-quoted strings, `,`/`;` abbreviation,
    /// property lists, collections, and quoted-triple/annotation syntax.
    pub strict: bool,
    /// Graph syntax this format supports.
    pub graph_mode: GraphMode,
    /// Format name used in [`ParseError`] messages.
    pub format_name: &'static str,
    /// Whether `<<( ... )>>` triple terms are accepted at all, and in which
    /// positions. `None` in non-strict mode means "anywhere a term is
    /// grammatically valid"; in strict mode only the object position (and,
    /// for N-Quads, never subject/predicate) is allowed.
    pub triple_terms_object_only: bool,
}

impl EngineConfig {
    /// Turtle: abbreviations on, no graph syntax.
    pub fn turtle() -> Self {
        EngineConfig {
            strict: false,
            graph_mode: GraphMode::None,
            format_name: "turtle",
            triple_terms_object_only: false,
        }
    }

    /// TriG: Turtle plus `GRAPH { }` blocks.
    pub fn trig() -> Self {
        EngineConfig {
            strict: false,
            graph_mode: GraphMode::TrigBlocks,
            format_name: "trig",
            triple_terms_object_only: false,
        }
    }

    /// N-Triples: strict, no graph syntax.
    pub fn ntriples() -> Self {
        EngineConfig {
            strict: true,
            graph_mode: GraphMode::None,
            format_name: "n-triples",
            triple_terms_object_only: true,
        }
    }

    /// N-Quads: strict, optional trailing graph term.
    pub fn nquads() -> Self {
        EngineConfig {
            strict: true,
            graph_mode: GraphMode::TrailingTerm,
            format_name: "n-quads",
            triple_terms_object_only: true,
        }
    }
}

/// Parse `input` under `config`, resolving relative IRIs against
/// `document_base` (if any), allocating synthesized terms out of `arena`.
pub fn parse<'a>(
    input: &'a str,
    document_base: Option<&str>,
    config: EngineConfig,
    arena: &'a Bump,
) -> Result<Vec<Quad<'a>>, ParseError> {
    let mut engine = Engine {
        input,
        bytes: input.as_bytes(),
        pos: 0,
        arena,
        config,
        prefixes: HashMap::new(),
        base: document_base.map(|s| s.to_string()),
        blank_counter: Cell::new(0),
        quads: Vec::new(),
        current_graph: Node::DefaultGraph,
    };
    engine.parse_document()?;
    Ok(engine.quads)
}

struct Engine<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    arena: &'a Bump,
    config: EngineConfig,
    prefixes: HashMap<String, String>,
    base: Option<String>,
    blank_counter: Cell<u64>,
    quads: Vec<Quad<'a>>,
    /// The graph the statement currently being parsed belongs to. Read by
    /// [`Engine::parse_angle_angle`] so a quoted triple nested anywhere in a
    /// TriG graph block's statement desugars its `rdf:reifies` triple into
    /// that same graph rather than always the default graph.
    current_graph: Node<'a>,
}

/// A graph identifier while recursing through a document: either the
/// default graph, or some IRI/blank-node term (borrowed from input or
/// arena-allocated).
type GraphId<'a> = Node<'a>;

impl<'a> Engine<'a> {
    // ---- low-level cursor -------------------------------------------------

    fn err(&self, expectation: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            format: self.config.format_name,
            offset: self.pos,
            expectation: expectation.into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn skip_ws_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => self.advance(1),
                Some(b'#') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.advance(1);
                    }
                }
                _ => break,
            }
        }
    }

    /// Non-strict formats skip whitespace/comments between tokens; strict
    /// formats still allow runs of space/tab (and comments, harmlessly) but
    /// the grammar is line-oriented. We don't distinguish: both tolerate
    /// trailing comments, which is a harmless superset of strict N-Triples.
    fn skip_ws(&mut self) {
        self.skip_ws_and_comments();
    }

    fn try_consume_byte(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.advance(1);
            true
        } else {
            false
        }
    }

    fn expect_byte(&mut self, b: u8, what: &str) -> Result<(), ParseError> {
        if self.try_consume_byte(b) {
            Ok(())
        } else {
            Err(self.err(what))
        }
    }

    /// Case-sensitive keyword match at the cursor, not consuming on failure.
    fn try_consume_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.advance(s.len());
            true
        } else {
            false
        }
    }

    /// Case-insensitive keyword match (used for SPARQL-style `PREFIX`/`BASE`
    /// and the `GRAPH` keyword), requiring the keyword not be immediately
    /// followed by an identifier character.
    fn try_consume_keyword_ci(&mut self, kw: &str) -> bool {
        let rest = self.rest();
        if rest.len() < kw.len() || !rest[..kw.len()].eq_ignore_ascii_case(kw) {
            return false;
        }
        let next = rest.as_bytes().get(kw.len()).copied();
        if matches!(next, Some(c) if is_pn_chars(c) || c == b':') {
            return false;
        }
        self.advance(kw.len());
        true
    }

    fn fresh_blank_label(&self) -> &'a str {
        let n = self.blank_counter.get();
        self.blank_counter.set(n + 1);
        self.arena.alloc_str(&format!("genid{}", n))
    }

    // ---- document / statement level ---------------------------------------

    fn parse_document(&mut self) -> Result<(), ParseError> {
        loop {
            self.skip_ws();
            if self.at_eof() {
                return Ok(());
            }
            if !self.config.strict {
                if self.parse_directive_if_present()? {
                    continue;
                }
                if self.config.graph_mode == GraphMode::TrigBlocks {
                    if self.parse_graph_block_if_present()? {
                        continue;
                    }
                }
            }
            self.parse_statement(Node::DefaultGraph)?;
        }
    }

    fn parse_directive_if_present(&mut self) -> Result<bool, ParseError> {
        if self.peek() == Some(b'@') {
            let save = self.pos;
            self.advance(1);
            if self.try_consume_str("prefix") {
                self.parse_prefix_body(true)?;
                return Ok(true);
            }
            if self.try_consume_str("base") {
                self.parse_base_body(true)?;
                return Ok(true);
            }
            if self.try_consume_str("version") {
                self.skip_ws();
                let _ = self.parse_string_literal_body()?;
                self.skip_ws();
                self.expect_byte(b'.', "'.' terminating @version")?;
                return Ok(true);
            }
            self.pos = save;
            return Ok(false);
        }
        if self.try_consume_keyword_ci("PREFIX") {
            self.parse_prefix_body(false)?;
            return Ok(true);
        }
        if self.try_consume_keyword_ci("BASE") {
            self.parse_base_body(false)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn parse_prefix_body(&mut self, requires_dot: bool) -> Result<(), ParseError> {
        self.skip_ws();
        let prefix = self.parse_pn_prefix_opt();
        self.skip_ws();
        self.expect_byte(b':', "':' in prefix declaration")?;
        self.skip_ws();
        let iri = self.parse_iriref_raw()?;
        let resolved = self.resolve_iri(iri)?;
        self.prefixes.insert(prefix, resolved.to_string());
        self.skip_ws();
        if requires_dot {
            self.expect_byte(b'.', "'.' terminating @prefix")?;
        }
        Ok(())
    }

    fn parse_base_body(&mut self, requires_dot: bool) -> Result<(), ParseError> {
        self.skip_ws();
        let iri = self.parse_iriref_raw()?;
        let resolved = self.resolve_iri(iri)?;
        self.base = Some(resolved.to_string());
        self.skip_ws();
        if requires_dot {
            self.expect_byte(b'.', "'.' terminating @base")?;
        }
        Ok(())
    }

    /// `PN_PREFIX?` immediately before `:` — may be empty (the default prefix).
    fn parse_pn_prefix_opt(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b':' || b == b' ' || b == b'\t' || b == b'\r' || b == b'\n' {
                break;
            }
            self.advance(1);
        }
        self.input[start..self.pos].to_string()
    }

    fn parse_graph_block_if_present(&mut self) -> Result<bool, ParseError> {
        if self.try_consume_keyword_ci("GRAPH") {
            self.skip_ws();
            let graph = self.parse_iri_or_blank_term()?;
            self.skip_ws();
            self.parse_graph_block_body(graph)?;
            return Ok(true);
        }

        if self.peek() == Some(b'{') {
            let graph = Node::BlankNode(rdf_model::BlankNode(self.fresh_blank_label()));
            self.parse_graph_block_body(graph)?;
            return Ok(true);
        }

        // Bare `term {`: speculative parse, backtrack if not followed by `{`.
        if matches!(self.peek(), Some(b'<') | Some(b'_')) || is_pn_chars_base_or_prefixed(self) {
            let save = self.pos;
            if let Ok(term) = self.parse_iri_or_blank_term() {
                let after = self.pos;
                self.skip_ws();
                if self.peek() == Some(b'{') {
                    self.parse_graph_block_body(term)?;
                    return Ok(true);
                }
                self.pos = after;
            }
            self.pos = save;
        }
        Ok(false)
    }

    fn parse_graph_block_body(&mut self, graph: GraphId<'a>) -> Result<(), ParseError> {
        self.expect_byte(b'{', "'{' opening graph block")?;
        loop {
            self.skip_ws();
            if self.try_consume_byte(b'}') {
                return Ok(());
            }
            if self.at_eof() {
                return Err(self.err("'}' closing graph block"));
            }
            self.parse_statement(graph.clone())?;
        }
    }

    /// A single `subject predicateObjectList '.'` statement, or (N-Quads
    /// only) `subject predicate object graph? '.'`.
    fn parse_statement(&mut self, graph: GraphId<'a>) -> Result<(), ParseError> {
        if self.config.graph_mode == GraphMode::TrailingTerm {
            return self.parse_nquads_statement();
        }

        self.current_graph = graph.clone();
        let subject = self.parse_subject()?;
        self.skip_ws();
        self.parse_predicate_object_list(subject, graph.clone())?;
        self.skip_ws();
        self.expect_byte(b'.', "'.' terminating triple")?;
        Ok(())
    }

    fn parse_nquads_statement(&mut self) -> Result<(), ParseError> {
        let subject = self.parse_term(TermPosition::Subject)?;
        self.skip_ws();
        let predicate = self.parse_term(TermPosition::Predicate)?;
        self.skip_ws();
        let object = self.parse_term(TermPosition::Object)?;
        self.skip_ws();
        let graph = if self.peek() == Some(b'.') {
            Node::DefaultGraph
        } else {
            self.parse_term(TermPosition::Graph)?
        };
        self.skip_ws();
        self.expect_byte(b'.', "'.' terminating quad")?;

        let triple = Triple::new_outer(subject, predicate, object)
            .map_err(|e| self.err(e.to_string()))?;
        self.quads.push(Quad::from_triple_with_graph(triple, graph));
        Ok(())
    }

    fn parse_predicate_object_list(
        &mut self,
        subject: Node<'a>,
        graph: GraphId<'a>,
    ) -> Result<(), ParseError> {
        loop {
            let predicate = self.parse_verb()?;
            self.skip_ws();
            self.parse_object_list(subject.clone(), predicate, graph.clone())?;
            self.skip_ws();
            if !self.config.strict && self.try_consume_byte(b';') {
                self.skip_ws();
                // Trailing ';' with nothing after it (just another ';' or the
                // closing '.') is allowed by the grammar.
                if self.peek() == Some(b'.') || self.peek() == Some(b'}') {
                    return Ok(());
                }
                if self.try_consume_byte(b';') {
                    continue;
                }
                continue;
            }
            return Ok(());
        }
    }

    fn parse_object_list(
        &mut self,
        subject: Node<'a>,
        predicate: &'a str,
        graph: GraphId<'a>,
    ) -> Result<(), ParseError> {
        loop {
            let object = self.parse_term(TermPosition::Object)?;
            self.emit_triple_and_annotations(subject.clone(), predicate, object, graph.clone())?;
            self.skip_ws();
            if !self.config.strict && self.try_consume_byte(b',') {
                self.skip_ws();
                continue;
            }
            return Ok(());
        }
    }

    fn emit_triple_and_annotations(
        &mut self,
        subject: Node<'a>,
        predicate: &'a str,
        object: Node<'a>,
        graph: GraphId<'a>,
    ) -> Result<(), ParseError> {
        let triple = Triple::new_outer(subject, Node::iri(predicate), object)
            .map_err(|e| self.err(e.to_string()))?;
        self.quads.push(Quad::from_triple_with_graph(triple.clone(), graph.clone()));

        if !self.config.strict {
            self.skip_ws();
            let mut reifier: Option<Node<'a>> = None;
            if self.peek() == Some(b'~') {
                self.advance(1);
                self.skip_ws();
                reifier = Some(self.parse_reifier_id()?);
                self.skip_ws();
            }
            while self.rest().starts_with("{|") {
                self.advance(2);
                let r = match reifier.clone() {
                    Some(r) => r,
                    None => {
                        let r = Node::BlankNode(rdf_model::BlankNode(self.fresh_blank_label()));
                        reifier = Some(r.clone());
                        r
                    }
                };
                self.emit_reifies(r.clone(), &triple, graph.clone());
                self.parse_annotation_body(r, graph.clone())?;
                self.skip_ws();
            }
        }
        Ok(())
    }

    fn parse_reifier_id(&mut self) -> Result<Node<'a>, ParseError> {
        self.parse_iri_or_blank_term()
    }

    fn emit_reifies(&mut self, reifier: Node<'a>, triple: &Triple<'a>, graph: GraphId<'a>) {
        let tt = Node::triple_term(triple.clone());
        let reifies =
            Triple::new_outer(reifier, Node::iri(Vocabulary::RDF_REIFIES), tt).expect("well-formed reifies triple");
        self.quads.push(Quad::from_triple_with_graph(reifies, graph));
    }

    fn parse_annotation_body(&mut self, reifier: Node<'a>, graph: GraphId<'a>) -> Result<(), ParseError> {
        loop {
            self.skip_ws();
            if self.try_consume_str("|}") {
                return Ok(());
            }
            self.parse_predicate_object_list_single(reifier.clone(), graph.clone())?;
            self.skip_ws();
            if self.try_consume_byte(b';') {
                continue;
            }
        }
    }

    /// Like [`Engine::parse_predicate_object_list`], but terminated by `|}`
    /// (and reuses `;` the same way) rather than `.`.
    fn parse_predicate_object_list_single(
        &mut self,
        subject: Node<'a>,
        graph: GraphId<'a>,
    ) -> Result<(), ParseError> {
        let predicate = self.parse_verb()?;
        self.skip_ws();
        self.parse_object_list(subject, predicate, graph)?;
        Ok(())
    }

    fn parse_subject(&mut self) -> Result<Node<'a>, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some(b'[') => self.parse_blank_node_property_list(),
            Some(b'(') => self.parse_collection(),
            _ => self.parse_term(TermPosition::Subject),
        }
    }

    fn parse_verb(&mut self) -> Result<&'a str, ParseError> {
        if !self.config.strict && self.peek() == Some(b'a') {
            let next = self.peek_at(1);
            if !matches!(next, Some(c) if is_pn_chars(c) || c == b':') {
                self.advance(1);
                return Ok(Vocabulary::RDF_TYPE);
            }
        }
        match self.parse_term(TermPosition::Predicate)? {
            Node::NamedNode(iri) => Ok(iri.0),
            _ => Err(self.err("IRI or 'a' as predicate")),
        }
    }

    // ---- terms --------------------------------------------------------------

    fn parse_iri_or_blank_term(&mut self) -> Result<Node<'a>, ParseError> {
        self.parse_term(TermPosition::Graph)
    }

    fn parse_term(&mut self, position: TermPosition) -> Result<Node<'a>, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some(b'<') => {
                if self.peek_at(1) == Some(b'<') {
                    return self.parse_angle_angle(position);
                }
                let iri = self.parse_iriref_raw()?;
                let resolved = self.resolve_iri(iri)?;
                Ok(Node::iri(resolved))
            }
            Some(b'_') if self.peek_at(1) == Some(b':') => self.parse_blank_node_label_term(),
            Some(b'"') | Some(b'\'') => self.parse_literal(),
            Some(b'[') if !self.config.strict && position == TermPosition::Object => {
                self.parse_blank_node_property_list()
            }
            Some(b'(') if !self.config.strict && position == TermPosition::Object => self.parse_collection(),
            Some(c) if !self.config.strict && (c.is_ascii_digit() || c == b'+' || c == b'-') => {
                self.parse_numeric_literal()
            }
            Some(b't') if !self.config.strict && self.rest().starts_with("true") => {
                self.advance(4);
                Ok(Node::literal_typed("true", Vocabulary::XSD_BOOLEAN))
            }
            Some(b'f') if !self.config.strict && self.rest().starts_with("false") => {
                self.advance(5);
                Ok(Node::literal_typed("false", Vocabulary::XSD_BOOLEAN))
            }
            _ if !self.config.strict => self.parse_prefixed_name(),
            _ => Err(self.err("a term")),
        }
    }

    fn parse_blank_node_label_term(&mut self) -> Result<Node<'a>, ParseError> {
        self.advance(2); // "_:"
        let start = self.pos;
        if !self.peek().map(is_pn_chars_u_or_digit).unwrap_or(false) {
            return Err(self.err("blank node label"));
        }
        self.advance(1);
        while let Some(b) = self.peek() {
            if is_pn_chars(b) || b == b'.' {
                self.advance(1);
            } else {
                break;
            }
        }
        // Trailing '.' is not part of the label.
        let mut end = self.pos;
        while end > start && self.bytes[end - 1] == b'.' {
            end -= 1;
        }
        self.pos = end;
        Ok(Node::blank(&self.input[start..end]))
    }

    /// `<<` introduces either a triple term `<<( s p o )>>` (RDF-1.2) or a
    /// quoted triple `<< s p o [~ id] >>` which desugars into a blank-node
    /// reifier plus an `rdf:reifies` triple.
    fn parse_angle_angle(&mut self, position: TermPosition) -> Result<Node<'a>, ParseError> {
        self.advance(2);
        self.skip_ws();
        if self.try_consume_byte(b'(') {
            if self.config.triple_terms_object_only && position != TermPosition::Object {
                return Err(self.err("triple term only allowed as object in strict mode"));
            }
            self.skip_ws();
            let s = self.parse_term(TermPosition::TripleTermSubject)?;
            self.skip_ws();
            let p = self.parse_term(TermPosition::Predicate)?;
            self.skip_ws();
            let o = self.parse_term(TermPosition::Object)?;
            self.skip_ws();
            self.expect_byte(b')', "')' closing triple term")?;
            self.skip_ws();
            if !self.try_consume_str(">>") {
                return Err(self.err("'>>' closing triple term"));
            }
            let triple = Triple::new_inner(s, p, o).map_err(|e| self.err(e.to_string()))?;
            return Ok(Node::triple_term(triple));
        }

        let s = self.parse_term(TermPosition::Subject)?;
        self.skip_ws();
        let p = self.parse_term(TermPosition::Predicate)?;
        self.skip_ws();
        let o = self.parse_term(TermPosition::Object)?;
        self.skip_ws();
        let explicit_id = if self.try_consume_byte(b'~') {
            self.skip_ws();
            Some(self.parse_reifier_id()?)
        } else {
            None
        };
        self.skip_ws();
        if !self.try_consume_str(">>") {
            return Err(self.err("'>>' closing quoted triple"));
        }

        let triple = Triple::new_inner(s, p, o).map_err(|e| self.err(e.to_string()))?;
        let reifier = explicit_id.unwrap_or_else(|| Node::BlankNode(rdf_model::BlankNode(self.fresh_blank_label())));
        // A quoted triple only ever occurs nested within the current
        // top-level statement's term tree, so `current_graph` (set at
        // `parse_statement` entry) is always the right graph to home its
        // `rdf:reifies` triple in, including inside a TriG graph block.
        self.emit_reifies(reifier.clone(), &triple, self.current_graph.clone());
        Ok(reifier)
    }

    fn parse_blank_node_property_list(&mut self) -> Result<Node<'a>, ParseError> {
        self.expect_byte(b'[', "'['")?;
        self.skip_ws();
        let label = self.fresh_blank_label();
        let subject = Node::blank(label);
        if !self.try_consume_byte(b']') {
            self.parse_predicate_object_list(subject.clone(), self.current_graph.clone())?;
            self.skip_ws();
            self.expect_byte(b']', "']' closing blank node property list")?;
        }
        Ok(subject)
    }

    fn parse_collection(&mut self) -> Result<Node<'a>, ParseError> {
        self.expect_byte(b'(', "'('")?;
        self.skip_ws();
        let mut items = Vec::new();
        while !self.try_consume_byte(b')') {
            let item = self.parse_term(TermPosition::Object)?;
            items.push(item);
            self.skip_ws();
        }
        if items.is_empty() {
            return Ok(Node::iri(Vocabulary::RDF_NIL));
        }
        let mut nodes = Vec::with_capacity(items.len());
        for _ in 0..items.len() {
            nodes.push(Node::blank(self.fresh_blank_label()));
        }
        for (i, item) in items.into_iter().enumerate() {
            let cell = nodes[i].clone();
            let rest = nodes.get(i + 1).cloned().unwrap_or(Node::iri(Vocabulary::RDF_NIL));
            let first = Triple::new_outer(cell.clone(), Node::iri(Vocabulary::RDF_FIRST), item)
                .expect("well-formed rdf:first triple");
            self.quads.push(Quad::from_triple_with_graph(first, self.current_graph.clone()));
            let rest_triple = Triple::new_outer(cell, Node::iri(Vocabulary::RDF_REST), rest)
                .expect("well-formed rdf:rest triple");
            self.quads.push(Quad::from_triple_with_graph(rest_triple, self.current_graph.clone()));
        }
        Ok(nodes[0].clone())
    }

    // ---- prefixed names / IRIs ----------------------------------------------

    fn resolve_iri(&self, reference: &str) -> Result<&'a str, ParseError> {
        if crate::iri::has_scheme(reference) {
            return crate::iri::resolve(None, reference, self.arena).map_err(|_| self.err("absolute IRI"));
        }
        crate::iri::resolve(self.base.as_deref(), reference, self.arena)
            .map_err(|_| self.err("relative IRI with no base IRI in scope"))
    }

    /// `IRIREF` (`<...>`), with `\uXXXX`/`\UXXXXXXXX` escapes decoded. Returns
    /// the raw (unresolved) reference.
    fn parse_iriref_raw(&mut self) -> Result<&'a str, ParseError> {
        self.expect_byte(b'<', "'<' starting an IRI")?;
        let start = self.pos;
        let mut needs_unescape = false;
        loop {
            match self.peek() {
                None => return Err(self.err("'>' closing an IRI")),
                Some(b'>') => break,
                Some(b'\\') => {
                    needs_unescape = true;
                    self.advance(1);
                    self.advance(1);
                }
                Some(c) if c <= 0x20 || matches!(c, b'<' | b'"' | b'{' | b'}' | b'|' | b'^' | b'`') => {
                    return Err(self.err("invalid character in IRI"));
                }
                Some(_) => self.advance(1),
            }
        }
        let raw = &self.input[start..self.pos];
        self.expect_byte(b'>', "'>' closing an IRI")?;
        if needs_unescape {
            let decoded = decode_unicode_escapes_only(raw).map_err(|m| self.err(m))?;
            Ok(self.arena.alloc_str(&decoded))
        } else {
            Ok(raw)
        }
    }

    fn parse_prefixed_name(&mut self) -> Result<Node<'a>, ParseError> {
        let prefix = self.parse_pn_prefix_component();
        self.expect_byte(b':', "':' in prefixed name")?;
        let local = self.parse_pn_local()?;
        let ns = self
            .prefixes
            .get(&prefix)
            .ok_or_else(|| self.err(format!("unknown prefix '{}:'", prefix)))?;
        let full = format!("{}{}", ns, local);
        Ok(Node::iri(self.arena.alloc_str(&full)))
    }

    fn parse_pn_prefix_component(&mut self) -> String {
        let start = self.pos;
        if matches!(self.peek(), Some(b) if is_pn_chars_base(b)) {
            self.advance(1);
            while let Some(b) = self.peek() {
                if is_pn_chars(b) || b == b'.' {
                    self.advance(1);
                } else {
                    break;
                }
            }
        }
        let mut end = self.pos;
        while end > start && self.bytes[end - 1] == b'.' {
            end -= 1;
        }
        self.pos = end;
        self.input[start..end].to_string()
    }

    fn parse_pn_local(&mut self) -> Result<String, ParseError> {
        let mut out = String::new();
        let mut first = true;
        loop {
            match self.peek() {
                Some(b'\\') => {
                    let c = self.peek_at(1).ok_or_else(|| self.err("character after '\\'"))?;
                    if is_pn_local_esc(c) {
                        out.push(c as char);
                        self.advance(2);
                    } else {
                        break;
                    }
                }
                Some(b'%') => {
                    let h1 = self.peek_at(1);
                    let h2 = self.peek_at(2);
                    if matches!(h1, Some(c) if c.is_ascii_hexdigit()) && matches!(h2, Some(c) if c.is_ascii_hexdigit())
                    {
                        out.push('%');
                        out.push(h1.unwrap() as char);
                        out.push(h2.unwrap() as char);
                        self.advance(3);
                    } else {
                        break;
                    }
                }
                Some(b':') => {
                    out.push(':');
                    self.advance(1);
                }
                Some(b) if (first && is_pn_chars_u_or_digit(b)) || (!first && (is_pn_chars(b) || b == b'.')) => {
                    out.push(b as char);
                    self.advance(1);
                }
                Some(b) if b >= 0x80 => {
                    // Multi-byte UTF-8 char, allowed in PN_CHARS_BASE ranges;
                    // accept permissively and copy the whole code point.
                    let ch_len = utf8_len(b);
                    let s = &self.input[self.pos..self.pos + ch_len];
                    out.push_str(s);
                    self.advance(ch_len);
                }
                _ => break,
            }
            first = false;
        }
        while out.ends_with('.') {
            // trailing '.' is not part of PN_LOCAL; give the byte back.
            out.pop();
            self.pos -= 1;
        }
        if out.is_empty() && !first {
            return Err(self.err("non-empty local name"));
        }
        Ok(out)
    }

    // ---- literals -----------------------------------------------------------

    fn parse_literal(&mut self) -> Result<Node<'a>, ParseError> {
        let value = self.parse_string_literal_body()?;
        if self.peek() == Some(b'@') {
            self.advance(1);
            let start = self.pos;
            while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'-') {
                self.advance(1);
            }
            let tag = &self.input[start..self.pos];
            if tag.is_empty() {
                return Err(self.err("language tag"));
            }
            if self.rest().starts_with("--") {
                self.advance(2);
                let dstart = self.pos;
                while matches!(self.peek(), Some(b) if b.is_ascii_alphabetic()) {
                    self.advance(1);
                }
                let dir = &self.input[dstart..self.pos];
                let direction = rdf_model::Direction::parse(dir)
                    .ok_or_else(|| self.err("'ltr' or 'rtl' direction"))?;
                return Ok(Node::literal_lang_dir(value, tag, direction));
            }
            return Ok(Node::literal_lang(value, tag));
        }
        if !self.config.strict && self.rest().starts_with("^^") {
            self.advance(2);
            let dt = match self.parse_term(TermPosition::Predicate)? {
                Node::NamedNode(iri) => iri.0,
                _ => return Err(self.err("datatype IRI")),
            };
            return Ok(Node::literal_typed(value, dt));
        }
        if self.config.strict && self.rest().starts_with("^^") {
            self.advance(2);
            let dt = self.parse_iriref_raw()?;
            let resolved = self.resolve_iri(dt)?;
            return Ok(Node::literal_typed(value, resolved));
        }
        Ok(Node::literal_str(value))
    }

    /// The string part of a literal: `"..."`, `'...'`, `"""..."""`, `'''...'''`
    /// (the last two only outside strict mode).
    fn parse_string_literal_body(&mut self) -> Result<&'a str, ParseError> {
        let quote = self.peek().ok_or_else(|| self.err("opening quote"))?;
        if !matches!(quote, b'"' | b'\'') {
            return Err(self.err("opening quote"));
        }
        if !self.config.strict && self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
            self.advance(3);
            let closing = [quote, quote, quote];
            let start = self.pos;
            let mut needs_unescape = false;
            loop {
                if self.bytes[self.pos..].starts_with(&closing) {
                    break;
                }
                if self.at_eof() {
                    return Err(self.err("closing triple quote"));
                }
                if self.peek() == Some(b'\\') {
                    needs_unescape = true;
                    self.advance(2);
                } else {
                    self.advance(1);
                }
            }
            let raw = &self.input[start..self.pos];
            self.advance(3);
            return self.finish_string(raw, needs_unescape);
        }

        self.advance(1);
        let start = self.pos;
        let mut needs_unescape = false;
        loop {
            match self.peek() {
                None => return Err(self.err("closing quote")),
                Some(b) if b == quote => break,
                Some(b'\n') | Some(b'\r') => return Err(self.err("unescaped newline in string")),
                Some(b'\\') => {
                    needs_unescape = true;
                    self.advance(2);
                }
                _ => self.advance(1),
            }
        }
        let raw = &self.input[start..self.pos];
        self.advance(1);
        self.finish_string(raw, needs_unescape)
    }

    fn finish_string(&self, raw: &'a str, needs_unescape: bool) -> Result<&'a str, ParseError> {
        if !needs_unescape {
            return Ok(raw);
        }
        let decoded = decode_string_escapes(raw).map_err(|m| self.err(m))?;
        Ok(self.arena.alloc_str(&decoded))
    }

    fn parse_numeric_literal(&mut self) -> Result<Node<'a>, ParseError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.advance(1);
        }
        let mut saw_digit = false;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.advance(1);
            saw_digit = true;
        }
        let mut is_decimal = false;
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b) if b.is_ascii_digit()) {
            is_decimal = true;
            self.advance(1);
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.advance(1);
            }
        }
        let mut is_double = false;
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            let save = self.pos;
            self.advance(1);
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.advance(1);
            }
            if matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                is_double = true;
                while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                    self.advance(1);
                }
            } else {
                self.pos = save;
            }
        }
        if !saw_digit {
            return Err(self.err("numeric literal"));
        }
        let lexical = &self.input[start..self.pos];
        let datatype = if is_double {
            Vocabulary::XSD_DOUBLE
        } else if is_decimal {
            Vocabulary::XSD_DECIMAL
        } else {
            Vocabulary::XSD_INTEGER
        };
        Ok(Node::literal_typed(lexical, datatype))
    }
}

/// The grammatical position a term is being parsed in, used to decide
/// whether collections/property lists/triple terms are legal here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TermPosition {
    Subject,
    Predicate,
    Object,
    Graph,
    TripleTermSubject,
}

fn is_pn_chars_base(b: u8) -> bool {
    b.is_ascii_alphabetic() || b >= 0x80
}

fn is_pn_chars_u_or_digit(b: u8) -> bool {
    is_pn_chars_base(b) || b == b'_' || b.is_ascii_digit()
}

fn is_pn_chars(b: u8) -> bool {
    is_pn_chars_u_or_digit(b) || b == b'-' || b == 0xB7
}

fn is_pn_local_esc(c: u8) -> bool {
    matches!(
        c,
        b'_' | b'~' | b'.' | b'-' | b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'=' | b'/' | b'?' | b'#' | b'@' | b'%'
    )
}

fn utf8_len(first_byte: u8) -> usize {
    if first_byte & 0b1110_0000 == 0b1100_0000 {
        2
    } else if first_byte & 0b1111_0000 == 0b1110_0000 {
        3
    } else if first_byte & 0b1111_1000 == 0b1111_0000 {
        4
    } else {
        1
    }
}

/// Only used by [`Engine::parse_graph_block_if_present`]'s speculative-parse
/// guard so it doesn't even attempt a term parse on input that obviously
/// can't start one (avoiding needless backtracking on e.g. `.` or `}`).
fn is_pn_chars_base_or_prefixed(engine: &Engine<'_>) -> bool {
    matches!(engine.peek(), Some(b) if is_pn_chars_base(b))
}

/// Decode `\n \t \r \b \f \" \' \\ \uXXXX \UXXXXXXXX`, rejecting surrogate
/// code points and anything above U+10FFFF.
fn decode_string_escapes(s: &str) -> Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{C}'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('u') => out.push(decode_hex_escape(&mut chars, 4)?),
            Some('U') => out.push(decode_hex_escape(&mut chars, 8)?),
            Some(other) => return Err(format!("invalid escape '\\{}'", other)),
            None => return Err("truncated escape sequence".to_string()),
        }
    }
    Ok(out)
}

/// IRIREFs only accept `\uXXXX`/`\UXXXXXXXX`, no backslash letter-escapes.
fn decode_unicode_escapes_only(s: &str) -> Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('u') => out.push(decode_hex_escape(&mut chars, 4)?),
            Some('U') => out.push(decode_hex_escape(&mut chars, 8)?),
            Some(other) => return Err(format!("invalid IRI escape '\\{}'", other)),
            None => return Err("truncated IRI escape".to_string()),
        }
    }
    Ok(out)
}

fn decode_hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Result<char, String> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        let c = chars.next().ok_or_else(|| "truncated unicode escape".to_string())?;
        let d = c.to_digit(16).ok_or_else(|| "invalid hex digit in unicode escape".to_string())?;
        value = value * 16 + d;
    }
    if (0xD800..=0xDFFF).contains(&value) {
        return Err(format!("surrogate code point U+{:04X} not allowed", value));
    }
    if value > 0x10FFFF {
        return Err(format!("code point U+{:X} above U+10FFFF", value));
    }
    char::from_u32(value).ok_or_else(|| format!("invalid code point U+{:X}", value))
}
