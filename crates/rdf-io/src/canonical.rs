//! Canonical N-Triples/N-Quads serialization.
//!
//! Deterministic escaping, no sorting: statements are written in the order
//! given. This is the form the round-trip invariant is stated against, and
//! the only serialization [`crate::ntriples`]/[`crate::nquads`] guarantee to
//! re-parse byte for byte.

use rdf_model::{Literal, Node, Quad, Triple};
use std::fmt::Write as _;

/// Serialize `quads` as canonical N-Triples: the graph component of every
/// quad is ignored (spec's canonical N-Triples form has no graph slot).
pub fn canonical_ntriples<'a>(triples: impl IntoIterator<Item = &'a Triple<'a>>) -> String {
    let mut out = String::new();
    for triple in triples {
        write_term(&mut out, &triple.subject);
        out.push(' ');
        write_term(&mut out, &triple.predicate);
        out.push(' ');
        write_term(&mut out, &triple.object);
        out.push_str(" .\n");
    }
    out
}

/// Serialize `quads` as canonical N-Quads: `S P O .` for default-graph
/// quads, `S P O G .` otherwise.
pub fn canonical_nquads<'a>(quads: impl IntoIterator<Item = &'a Quad<'a>>) -> String {
    let mut out = String::new();
    for quad in quads {
        write_term(&mut out, &quad.subject);
        out.push(' ');
        write_term(&mut out, &quad.predicate);
        out.push(' ');
        write_term(&mut out, &quad.object);
        if !quad.is_default_graph() {
            out.push(' ');
            write_term(&mut out, &quad.graph);
        }
        out.push_str(" .\n");
    }
    out
}

fn write_term(out: &mut String, node: &Node<'_>) {
    match node {
        Node::NamedNode(iri) => {
            out.push('<');
            write_escaped_iri(out, iri.as_str());
            out.push('>');
        }
        Node::BlankNode(b) => {
            out.push_str("_:");
            out.push_str(b.label());
        }
        Node::Literal(lit) => write_literal(out, lit),
        Node::TripleTerm(t) => {
            out.push_str("<<( ");
            write_term(out, &t.subject);
            out.push(' ');
            write_term(out, &t.predicate);
            out.push(' ');
            write_term(out, &t.object);
            out.push_str(" )>>");
        }
        Node::QuotedTriple(_) | Node::ReifiedTriple { .. } => {
            debug_assert!(false, "quoted/reified triples must be desugared before serialization");
        }
        Node::DefaultGraph => {
            debug_assert!(false, "default graph has no term form");
        }
    }
}

fn write_literal(out: &mut String, lit: &Literal<'_>) {
    out.push('"');
    write_escaped_string(out, lit.lexical_form);
    out.push('"');
    if let Some(lang) = lit.language {
        out.push('@');
        out.push_str(&lang.to_ascii_lowercase());
        if let Some(dir) = lit.direction {
            out.push_str("--");
            out.push_str(dir.as_str());
        }
    } else if let Some(dt) = lit.datatype {
        if dt != rdf_model::Vocabulary::XSD_STRING {
            out.push_str("^^<");
            write_escaped_iri(out, dt);
            out.push('>');
        }
    }
}

/// Escapes `\t \b \n \r \f \" \\`, control characters below 0x20, DEL
/// (0x7F), and the non-characters U+FFFE/U+FFFF as `\uXXXX`; every other
/// code point is passed through verbatim.
fn write_escaped_string(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{C}' => out.push_str("\\f"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 0x20 || c as u32 == 0x7F || matches!(c as u32, 0xFFFE | 0xFFFF) => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
}

/// IRIs use the same escaping as strings but additionally escape `>` and
/// `\\`, since an unescaped `>` would prematurely close the `<...>` term.
fn write_escaped_iri(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '>' => out.push_str("\\u003E"),
            c if (c as u32) < 0x20 || c as u32 == 0x7F || matches!(c as u32, 0xFFFE | 0xFFFF) => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
}
