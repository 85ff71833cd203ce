//! JSON-LD parser (subset): single object or array of objects, object-form
//! `@context` only, no remote contexts, framing, or
//! `@list`/`@set`/`@reverse`/`@graph`.

use crate::ParseError;
use bumpalo::Bump;
use rdf_model::{Node, Quad, Triple};
use serde_json::Value;
use std::cell::Cell;
use std::collections::HashMap;

/// A `@context`'s prefix and term mappings, as a flat map from short name to
/// expansion (a plain prefix `ex` or a full term `name`).
#[derive(Debug, Clone, Default)]
struct Context {
    mappings: HashMap<String, String>,
}

impl Context {
    fn merge_from(&self, value: &Value) -> Context {
        let mut merged = self.clone();
        if let Value::Object(map) = value {
            for (k, v) in map {
                if k.starts_with('@') {
                    continue;
                }
                match v {
                    Value::String(s) => {
                        merged.mappings.insert(k.clone(), s.clone());
                    }
                    Value::Object(term_def) => {
                        if let Some(Value::String(id)) = term_def.get("@id") {
                            merged.mappings.insert(k.clone(), id.clone());
                        }
                    }
                    _ => {}
                }
            }
        }
        merged
    }

    /// Expand a key to a full predicate/type IRI: already-absolute IRIs pass
    /// through, `prefix:local` expands the prefix, a bare term expands via
    /// its mapping, else the key itself (best-effort "full IRI, term, or
    /// prefix:local" resolution).
    fn expand(&self, key: &str) -> String {
        if crate::iri::has_scheme(key) {
            return key.to_string();
        }
        if let Some((prefix, local)) = key.split_once(':') {
            if let Some(ns) = self.mappings.get(prefix) {
                return format!("{}{}", ns, local);
            }
        }
        if let Some(expanded) = self.mappings.get(key) {
            return expanded.clone();
        }
        key.to_string()
    }
}

/// Parses JSON-LD documents.
#[derive(Debug, Default)]
pub struct JsonLdParser;

impl JsonLdParser {
    /// Construct a parser.
    pub fn new() -> Self {
        JsonLdParser
    }

    /// Parse a complete JSON-LD document. `base` is accepted for interface
    /// symmetry with the other parsers but unused: this subset does not
    /// resolve relative `@id`s against a document base, since that requires
    /// the remote-context machinery this subset excludes.
    pub fn parse<'a>(&self, input: &'a str, _base: Option<&str>, arena: &'a Bump) -> Result<Vec<Quad<'a>>, ParseError> {
        let value: Value = serde_json::from_str(input).map_err(|e| ParseError::Syntax {
            format: "json-ld",
            offset: e.column(),
            expectation: format!("valid JSON: {}", e),
        })?;

        let mut state = State {
            arena,
            blank_counter: Cell::new(0),
            quads: Vec::new(),
        };

        match &value {
            Value::Array(items) => {
                for item in items {
                    state.parse_node(item, &Context::default())?;
                }
            }
            Value::Object(_) => {
                state.parse_node(&value, &Context::default())?;
            }
            _ => {
                return Err(ParseError::Syntax {
                    format: "json-ld",
                    offset: 0,
                    expectation: "a JSON object or array of objects".into(),
                })
            }
        }

        Ok(state.quads)
    }
}

struct State<'a> {
    arena: &'a Bump,
    blank_counter: Cell<u64>,
    quads: Vec<Quad<'a>>,
}

impl<'a> State<'a> {
    fn alloc(&self, s: &str) -> &'a str {
        self.arena.alloc_str(s)
    }

    fn fresh_blank(&self) -> &'a str {
        let n = self.blank_counter.get();
        self.blank_counter.set(n + 1);
        self.alloc(&format!("jsonld{}", n))
    }

    fn parse_node(&mut self, value: &Value, outer_context: &Context) -> Result<Node<'a>, ParseError> {
        let obj = match value {
            Value::Object(o) => o,
            _ => {
                return Err(ParseError::Syntax {
                    format: "json-ld",
                    offset: 0,
                    expectation: "a JSON object".into(),
                })
            }
        };

        let context = match obj.get("@context") {
            Some(ctx) => outer_context.merge_from(ctx),
            None => outer_context.clone(),
        };

        let subject = match obj.get("@id") {
            Some(Value::String(id)) => {
                let expanded = context.expand(id);
                Node::iri(self.alloc(&expanded))
            }
            _ => Node::blank(self.fresh_blank()),
        };

        for (key, val) in obj {
            if key.starts_with('@') {
                continue;
            }
            let predicate = self.alloc(&context.expand(key));
            self.parse_values(&subject, predicate, val, &context)?;
        }

        Ok(subject)
    }

    fn parse_values(
        &mut self,
        subject: &Node<'a>,
        predicate: &'a str,
        value: &Value,
        context: &Context,
    ) -> Result<(), ParseError> {
        match value {
            Value::Array(items) => {
                for item in items {
                    self.parse_value(subject, predicate, item, context)?;
                }
                Ok(())
            }
            other => self.parse_value(subject, predicate, other, context),
        }
    }

    fn parse_value(
        &mut self,
        subject: &Node<'a>,
        predicate: &'a str,
        value: &Value,
        context: &Context,
    ) -> Result<(), ParseError> {
        let object = match value {
            Value::String(s) => Node::literal_str(self.alloc(s)),
            Value::Bool(b) => Node::literal_typed(
                self.alloc(if *b { "true" } else { "false" }),
                rdf_model::Vocabulary::XSD_BOOLEAN,
            ),
            Value::Number(n) => {
                let lexical = n.to_string();
                let datatype = if n.is_i64() || n.is_u64() {
                    rdf_model::Vocabulary::XSD_INTEGER
                } else {
                    rdf_model::Vocabulary::XSD_DOUBLE
                };
                Node::literal_typed(self.alloc(&lexical), datatype)
            }
            Value::Object(map) => {
                if let Some(Value::String(id)) = map.get("@id") {
                    let expanded = context.expand(id);
                    Node::iri(self.alloc(&expanded))
                } else if let Some(value_field) = map.get("@value") {
                    let lexical = match value_field {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    match (map.get("@language"), map.get("@type")) {
                        (Some(Value::String(lang)), _) => Node::literal_lang(self.alloc(&lexical), self.alloc(lang)),
                        (None, Some(Value::String(dt))) => {
                            let expanded = context.expand(dt);
                            Node::literal_typed(self.alloc(&lexical), self.alloc(&expanded))
                        }
                        _ => Node::literal_str(self.alloc(&lexical)),
                    }
                } else {
                    self.parse_node(value, context)?
                }
            }
            Value::Null => return Ok(()),
            Value::Array(_) => unreachable!("arrays are flattened by parse_values"),
        };

        let triple = Triple::new_outer(subject.clone(), Node::iri(predicate), object)
            .map_err(|e| ParseError::InvalidTerm(e.to_string()))?;
        self.quads.push(Quad::from_triple(triple));
        Ok(())
    }
}
