//! RDF/XML parser: streaming SAX-style consumption via `quick_xml`.
//!
//! RDF/XML's node/property element grammar is inherently recursive (a
//! property element's value can itself be a node element), so rather than
//! walk `quick_xml`'s flat event stream with an explicit state machine we
//! first materialize it into a small generic [`XmlElement`] tree (still
//! borrowing text from the input where possible) and then recurse over that
//! tree applying the RDF/XML production rules.

use crate::ParseError;
use bumpalo::Bump;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use rdf_model::{Node, Quad, Triple, Vocabulary};
use std::cell::Cell;
use std::collections::HashMap;

const RDF_NS: &str = Vocabulary::RDF_NS;
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug, Clone)]
struct XmlAttr {
    ns: Option<String>,
    local: String,
    value: String,
}

#[derive(Debug, Clone)]
struct XmlElement {
    ns: Option<String>,
    local: String,
    attrs: Vec<XmlAttr>,
    children: Vec<XmlNode>,
}

#[derive(Debug, Clone)]
enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    fn attr(&self, ns: &str, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.ns.as_deref() == Some(ns) && a.local == local)
            .map(|a| a.value.as_str())
    }

    /// Non-namespaced, non-`xml:`/`xmlns`-prefixed attributes: the ones that
    /// become an intermediate blank node's property-attribute triples.
    fn plain_property_attrs(&self) -> Vec<&XmlAttr> {
        self.attrs
            .iter()
            .filter(|a| a.ns.as_deref() != Some(RDF_NS) && a.ns.as_deref() != Some(XML_NS))
            .collect()
    }

    /// Collects direct element children, skipping text (other than as a
    /// signal that this element has simple literal content).
    fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    fn has_only_text(&self) -> bool {
        self.children.iter().all(|c| matches!(c, XmlNode::Text(_)))
    }
}

/// Parses RDF/XML documents.
#[derive(Debug, Default)]
pub struct RdfXmlParser;

const FORBIDDEN_NODE_ELEMENT_NAMES: &[&str] = &[
    "RDF", "ID", "about", "bagID", "parseType", "resource", "nodeID", "datatype", "aboutEach", "aboutEachPrefix",
    "li",
];
const FORBIDDEN_PROPERTY_ELEMENT_NAMES: &[&str] = &[
    "RDF", "ID", "about", "bagID", "parseType", "resource", "nodeID", "datatype", "aboutEach", "aboutEachPrefix",
    "Description",
];

impl RdfXmlParser {
    /// Construct a parser.
    pub fn new() -> Self {
        RdfXmlParser
    }

    /// Parse a complete RDF/XML document.
    pub fn parse<'a>(
        &self,
        input: &'a str,
        document_base: Option<&str>,
        arena: &'a Bump,
    ) -> Result<Vec<Quad<'a>>, ParseError> {
        let root = parse_xml_tree(input)?;

        let mut ctx = Context {
            arena,
            base_stack: vec![document_base.map(|s| s.to_string())],
            lang_stack: vec![None],
            used_ids: std::collections::HashSet::new(),
            node_id_blanks: HashMap::new(),
            blank_counter: Cell::new(0),
            quads: Vec::new(),
        };

        if root.ns.as_deref() != Some(RDF_NS) || root.local != "RDF" {
            // A single top-level node element without the `rdf:RDF` wrapper
            // is also valid RDF/XML.
            ctx.parse_node_element(&root)?;
            return Ok(ctx.quads);
        }

        ctx.push_base_lang(&root);
        for child in root.child_elements() {
            ctx.parse_node_element(child)?;
        }
        ctx.pop_base_lang();
        Ok(ctx.quads)
    }
}

struct Context<'a> {
    arena: &'a Bump,
    base_stack: Vec<Option<String>>,
    lang_stack: Vec<Option<String>>,
    used_ids: std::collections::HashSet<String>,
    node_id_blanks: HashMap<String, &'a str>,
    blank_counter: Cell<u64>,
    quads: Vec<Quad<'a>>,
}

impl<'a> Context<'a> {
    fn base(&self) -> Option<&str> {
        self.base_stack.last().and_then(|b| b.as_deref())
    }

    fn lang(&self) -> Option<&str> {
        self.lang_stack.last().and_then(|l| l.as_deref())
    }

    fn push_base_lang(&mut self, el: &XmlElement) {
        let new_base = match el.attr(XML_NS, "base") {
            Some(b) => {
                let resolved = self.resolve(b).unwrap_or_else(|_| b.to_string());
                let without_fragment = resolved.split('#').next().unwrap_or(&resolved).to_string();
                Some(without_fragment)
            }
            None => self.base().map(|s| s.to_string()),
        };
        self.base_stack.push(new_base);
        let new_lang = el
            .attr(XML_NS, "lang")
            .map(|s| s.to_string())
            .or_else(|| self.lang().map(|s| s.to_string()));
        self.lang_stack.push(new_lang);
    }

    fn pop_base_lang(&mut self) {
        self.base_stack.pop();
        self.lang_stack.pop();
    }

    fn resolve(&self, reference: &str) -> Result<String, ParseError> {
        if crate::iri::has_scheme(reference) {
            return Ok(reference.to_string());
        }
        let scratch = Bump::new();
        crate::iri::resolve(self.base(), reference, &scratch)
            .map(|s| s.to_string())
            .map_err(|_| ParseError::InvalidIri(format!("relative IRI '{}' with no base in scope", reference)))
    }

    fn alloc(&self, s: &str) -> &'a str {
        self.arena.alloc_str(s)
    }

    fn fresh_blank(&self) -> &'a str {
        let n = self.blank_counter.get();
        self.blank_counter.set(n + 1);
        self.alloc(&format!("rdfxml{}", n))
    }

    fn push_quad(&mut self, s: Node<'a>, p: &'a str, o: Node<'a>) {
        let triple = Triple::new_outer(s, Node::iri(p), o).expect("well-formed rdf/xml triple");
        self.quads.push(Quad::from_triple(triple));
    }

    /// Interpret `el` as a node element, returning the subject node.
    fn parse_node_element(&mut self, el: &XmlElement) -> Result<Node<'a>, ParseError> {
        if el.ns.as_deref() == Some(RDF_NS) && FORBIDDEN_NODE_ELEMENT_NAMES.contains(&el.local.as_str()) {
            return Err(ParseError::Syntax {
                format: "rdf/xml",
                offset: 0,
                expectation: format!("node element name other than rdf:{}", el.local),
            });
        }

        self.push_base_lang(el);
        let subject = self.resolve_subject(el)?;

        if !(el.ns.as_deref() == Some(RDF_NS) && el.local == "Description") {
            let type_iri = self.alloc(&format!(
                "{}{}",
                el.ns.clone().unwrap_or_default(),
                el.local
            ));
            self.push_quad(subject.clone(), Vocabulary::RDF_TYPE, Node::iri(type_iri));
        }

        let mut li_counter = 0u64;
        for prop_el in el.child_elements() {
            self.parse_property_element(&subject, prop_el, &mut li_counter)?;
        }

        // Property attributes directly on the node element (shorthand form,
        // e.g. `<ex:Person ex:name="Alice"/>`) become triples directly.
        for attr in el.plain_property_attrs() {
            let pred = self.alloc(&format!("{}{}", attr.ns.clone().unwrap_or_default(), attr.local));
            self.push_quad(subject.clone(), pred, Node::literal_str(self.alloc(&attr.value)));
        }

        self.pop_base_lang();
        Ok(subject)
    }

    fn resolve_subject(&mut self, el: &XmlElement) -> Result<Node<'a>, ParseError> {
        let about = el.attr(RDF_NS, "about");
        let id = el.attr(RDF_NS, "ID");
        let node_id = el.attr(RDF_NS, "nodeID");

        let exclusive = [about.is_some(), id.is_some(), node_id.is_some()]
            .iter()
            .filter(|b| **b)
            .count();
        if exclusive > 1 {
            return Err(ParseError::Syntax {
                format: "rdf/xml",
                offset: 0,
                expectation: "at most one of rdf:about/rdf:ID/rdf:nodeID".into(),
            });
        }

        if let Some(about) = about {
            let resolved = self.resolve(about)?;
            return Ok(Node::iri(self.alloc(&resolved)));
        }
        if let Some(id) = id {
            validate_ncname(id)?;
            let base = self.base().unwrap_or("").to_string();
            let resolved = format!("{}#{}", base, id);
            if !self.used_ids.insert(resolved.clone()) {
                return Err(ParseError::Syntax {
                    format: "rdf/xml",
                    offset: 0,
                    expectation: format!("rdf:ID '{}' to be unique", id),
                });
            }
            return Ok(Node::iri(self.alloc(&resolved)));
        }
        if let Some(node_id) = node_id {
            validate_ncname(node_id)?;
            if let Some(existing) = self.node_id_blanks.get(node_id) {
                return Ok(Node::blank(existing));
            }
            let label = self.fresh_blank();
            self.node_id_blanks.insert(node_id.to_string(), label);
            return Ok(Node::blank(label));
        }
        Ok(Node::blank(self.fresh_blank()))
    }

    fn parse_property_element(
        &mut self,
        subject: &Node<'a>,
        el: &XmlElement,
        li_counter: &mut u64,
    ) -> Result<(), ParseError> {
        if el.ns.as_deref() == Some(RDF_NS) && FORBIDDEN_PROPERTY_ELEMENT_NAMES.contains(&el.local.as_str()) {
            return Err(ParseError::Syntax {
                format: "rdf/xml",
                offset: 0,
                expectation: format!("property element name other than rdf:{}", el.local),
            });
        }

        self.push_base_lang(el);

        let predicate: &'a str = if el.ns.as_deref() == Some(RDF_NS) && el.local == "li" {
            *li_counter += 1;
            self.alloc(&format!("{}_{}", RDF_NS, li_counter))
        } else {
            self.alloc(&format!("{}{}", el.ns.clone().unwrap_or_default(), el.local))
        };

        let parse_type = el.attr(RDF_NS, "parseType");
        let resource = el.attr(RDF_NS, "resource");
        let node_id = el.attr(RDF_NS, "nodeID");

        if parse_type.is_some() && resource.is_some() {
            return Err(ParseError::Syntax {
                format: "rdf/xml",
                offset: 0,
                expectation: "rdf:parseType and rdf:resource are mutually exclusive".into(),
            });
        }

        let object = match parse_type {
            Some("Resource") => {
                let blank_label = self.fresh_blank();
                let blank = Node::blank(blank_label);
                let mut nested_li = 0u64;
                for nested in el.child_elements() {
                    self.parse_property_element(&blank, nested, &mut nested_li)?;
                }
                blank
            }
            Some("Collection") => {
                let items: Vec<Node<'a>> = el
                    .child_elements()
                    .map(|child| self.parse_node_element(child))
                    .collect::<Result<_, _>>()?;
                self.build_collection(items)
            }
            Some("Literal") => {
                let xml_literal = serialize_xml_literal(el);
                Node::literal_typed(
                    self.alloc(&xml_literal),
                    "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral",
                )
            }
            _ => {
                if let Some(resource) = resource {
                    let resolved = self.resolve(resource)?;
                    Node::iri(self.alloc(&resolved))
                } else if let Some(node_id) = node_id {
                    validate_ncname(node_id)?;
                    if let Some(existing) = self.node_id_blanks.get(node_id) {
                        Node::blank(existing)
                    } else {
                        let label = self.fresh_blank();
                        self.node_id_blanks.insert(node_id.to_string(), label);
                        Node::blank(label)
                    }
                } else if el.child_elements().next().is_some() {
                    // Nested node element as the whole value.
                    let only_child = el.child_elements().next().unwrap();
                    self.parse_node_element(only_child)?
                } else {
                    let attrs = el.plain_property_attrs();
                    if !attrs.is_empty() {
                        let blank_label = self.fresh_blank();
                        let blank = Node::blank(blank_label);
                        for attr in attrs {
                            let pred = self.alloc(&format!("{}{}", attr.ns.clone().unwrap_or_default(), attr.local));
                            self.push_quad(blank.clone(), pred, Node::literal_str(self.alloc(&attr.value)));
                        }
                        blank
                    } else {
                        let text = el.text_content();
                        let datatype = el.attr(RDF_NS, "datatype");
                        let lang = self.lang().map(|s| s.to_string());
                        match datatype {
                            Some(dt) => {
                                let resolved = self.resolve(dt)?;
                                Node::literal_typed(self.alloc(&text), self.alloc(&resolved))
                            }
                            None => match lang {
                                Some(lang) => Node::literal_lang(self.alloc(&text), self.alloc(&lang)),
                                None => Node::literal_str(self.alloc(&text)),
                            },
                        }
                    }
                }
            }
        };

        self.push_quad(subject.clone(), predicate, object.clone());

        if let Some(id) = el.attr(RDF_NS, "ID") {
            validate_ncname(id)?;
            let base = self.base().unwrap_or("").to_string();
            let stmt_iri: &'a str = self.alloc(&format!("{}#{}", base, id));
            let stmt = Node::iri(stmt_iri);
            self.push_quad(stmt.clone(), Vocabulary::RDF_TYPE, Node::iri(Vocabulary::RDF_STATEMENT));
            self.push_quad(stmt.clone(), Vocabulary::RDF_SUBJECT, subject.clone());
            self.push_quad(stmt.clone(), Vocabulary::RDF_PREDICATE, Node::iri(predicate));
            self.push_quad(stmt, Vocabulary::RDF_OBJECT, object);
        }

        self.pop_base_lang();
        Ok(())
    }

    fn build_collection(&mut self, items: Vec<Node<'a>>) -> Node<'a> {
        if items.is_empty() {
            return Node::iri(Vocabulary::RDF_NIL);
        }
        let cells: Vec<Node<'a>> = (0..items.len()).map(|_| Node::blank(self.fresh_blank())).collect();
        for (i, item) in items.into_iter().enumerate() {
            let rest = cells.get(i + 1).cloned().unwrap_or(Node::iri(Vocabulary::RDF_NIL));
            self.push_quad(cells[i].clone(), Vocabulary::RDF_FIRST, item);
            self.push_quad(cells[i].clone(), Vocabulary::RDF_REST, rest);
        }
        cells[0].clone()
    }
}

fn validate_ncname(s: &str) -> Result<(), ParseError> {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => {
            return Err(ParseError::Syntax {
                format: "rdf/xml",
                offset: 0,
                expectation: format!("'{}' to be a valid NCName", s),
            })
        }
    }
    if chars.any(|c| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))) {
        return Err(ParseError::Syntax {
            format: "rdf/xml",
            offset: 0,
            expectation: format!("'{}' to be a valid NCName", s),
        });
    }
    Ok(())
}

/// Minimal C14N-style serialization of an `rdf:parseType="Literal"` element:
/// re-renders the element and its descendants as XML text, carrying forward
/// in-scope namespace declarations on the outermost element.
fn serialize_xml_literal(el: &XmlElement) -> String {
    fn render(el: &XmlElement, out: &mut String) {
        let qname = el.local.clone();
        out.push('<');
        out.push_str(&qname);
        for attr in &el.attrs {
            out.push(' ');
            out.push_str(&attr.local);
            out.push_str("=\"");
            out.push_str(&attr.value);
            out.push('"');
        }
        if el.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &el.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => render(e, out),
            }
        }
        out.push_str("</");
        out.push_str(&qname);
        out.push('>');
    }
    let mut out = String::new();
    render(el, &mut out);
    out
}

fn parse_xml_tree(input: &str) -> Result<XmlElement, ParseError> {
    let mut reader = NsReader::from_str(input);
    reader.config_mut().trim_text = true;

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let (resolved, event) = reader
            .read_resolved_event()
            .map_err(|e| ParseError::Syntax {
                format: "rdf/xml",
                offset: reader.buffer_position() as usize,
                expectation: format!("well-formed XML: {}", e),
            })?;

        match event {
            Event::Start(ref e) => {
                let el = build_element(&reader, resolved, e)?;
                stack.push(el);
            }
            Event::Empty(ref e) => {
                let el = build_element(&reader, resolved, e)?;
                close_element(&mut stack, &mut root, el);
            }
            Event::End(_) => {
                let el = stack.pop().ok_or_else(|| ParseError::Syntax {
                    format: "rdf/xml",
                    offset: reader.buffer_position() as usize,
                    expectation: "matching start tag".into(),
                })?;
                close_element(&mut stack, &mut root, el);
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| ParseError::Syntax {
                        format: "rdf/xml",
                        offset: reader.buffer_position() as usize,
                        expectation: format!("valid character data: {}", e),
                    })?
                    .into_owned();
                if let Some(parent) = stack.last_mut() {
                    if !text.trim().is_empty() || !parent.children.is_empty() {
                        parent.children.push(XmlNode::Text(text));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    root.ok_or_else(|| ParseError::Syntax {
        format: "rdf/xml",
        offset: 0,
        expectation: "a root element".into(),
    })
}

fn close_element(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, el: XmlElement) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(el));
    } else {
        *root = Some(el);
    }
}

fn build_element(
    reader: &NsReader<&[u8]>,
    resolved: ResolveResult,
    start: &BytesStart<'_>,
) -> Result<XmlElement, ParseError> {
    let ns = match resolved {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    };
    let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ParseError::Syntax {
            format: "rdf/xml",
            offset: 0,
            expectation: format!("well-formed attribute: {}", e),
        })?;
        let key = attr.key;
        let key_bytes = key.as_ref();
        if key_bytes.starts_with(b"xmlns") {
            continue;
        }
        let (attr_ns, attr_local) = match reader.resolve_attribute(key) {
            (ResolveResult::Bound(ns), local) => {
                (Some(String::from_utf8_lossy(ns.as_ref()).into_owned()), String::from_utf8_lossy(local.as_ref()).into_owned())
            }
            (_, local) => (None, String::from_utf8_lossy(local.as_ref()).into_owned()),
        };
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|e| ParseError::Syntax {
                format: "rdf/xml",
                offset: 0,
                expectation: format!("valid attribute value: {}", e),
            })?
            .into_owned();
        attrs.push(XmlAttr {
            ns: attr_ns,
            local: attr_local,
            value,
        });
    }

    Ok(XmlElement {
        ns,
        local,
        attrs,
        children: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_description_with_literal_property() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://e/">
            <rdf:Description rdf:about="http://e/s">
                <ex:name>Alice</ex:name>
            </rdf:Description>
        </rdf:RDF>"#;
        let arena = Bump::new();
        let quads = RdfXmlParser::new().parse(xml, None, &arena).unwrap();
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].subject, Node::iri("http://e/s"));
        assert_eq!(quads[0].predicate, Node::iri("http://e/name"));
    }

    #[test]
    fn typed_node_element_emits_rdf_type() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://e/">
            <ex:Person rdf:about="http://e/s"/>
        </rdf:RDF>"#;
        let arena = Bump::new();
        let quads = RdfXmlParser::new().parse(xml, None, &arena).unwrap();
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].predicate, Node::iri(Vocabulary::RDF_TYPE));
        assert_eq!(quads[0].object, Node::iri("http://e/Person"));
    }

    #[test]
    fn s6_rdf_id_reification() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://e/" xml:base="http://e/">
            <rdf:Description rdf:about="http://e/s">
                <ex:prop rdf:ID="stmt1">val</ex:prop>
            </rdf:Description>
        </rdf:RDF>"#;
        let arena = Bump::new();
        let quads = RdfXmlParser::new().parse(xml, None, &arena).unwrap();
        assert_eq!(quads.len(), 5);
        assert!(quads.iter().any(|q| q.subject == Node::iri("http://e/#stmt1")
            && q.predicate == Node::iri(Vocabulary::RDF_TYPE)
            && q.object == Node::iri(Vocabulary::RDF_STATEMENT)));
    }

    #[test]
    fn rdf_resource_property_object() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://e/">
            <rdf:Description rdf:about="http://e/s">
                <ex:knows rdf:resource="http://e/o"/>
            </rdf:Description>
        </rdf:RDF>"#;
        let arena = Bump::new();
        let quads = RdfXmlParser::new().parse(xml, None, &arena).unwrap();
        assert_eq!(quads[0].object, Node::iri("http://e/o"));
    }

    #[test]
    fn node_id_coreference_preserved() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://e/">
            <rdf:Description rdf:nodeID="b1"><ex:p rdf:resource="http://e/o1"/></rdf:Description>
            <rdf:Description rdf:nodeID="b1"><ex:p rdf:resource="http://e/o2"/></rdf:Description>
        </rdf:RDF>"#;
        let arena = Bump::new();
        let quads = RdfXmlParser::new().parse(xml, None, &arena).unwrap();
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0].subject, quads[1].subject);
    }

    #[test]
    fn rejects_duplicate_rdf_id() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://e/" xml:base="http://e/">
            <rdf:Description rdf:ID="x"/>
            <rdf:Description rdf:ID="x"/>
        </rdf:RDF>"#;
        let arena = Bump::new();
        let result = RdfXmlParser::new().parse(xml, None, &arena);
        assert!(result.is_err());
    }
}
