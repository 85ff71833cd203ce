//! RDF-1.2 term types
//!
//! Follows the RDF abstract syntax: a term is one of IRI, blank node, literal,
//! triple term, or (graph position only) the default graph. Quoted triples and
//! reified triples are parser-level sugar: they appear transiently while a
//! Turtle/TriG document is being read and are desugared into a blank-node
//! reifier plus an `rdf:reifies` triple before a [`crate::Quad`] is ever built.
//! They remain distinct variants here so the desugaring step has something to
//! match on, but [`Quad::new`](crate::Quad::new) rejects them.

use crate::Triple;
use std::fmt;

/// A single RDF term.
///
/// Zero-copy: all strings are borrowed, normally from a [`crate::Dictionary`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Node<'a> {
    /// IRI/URI reference, e.g. `<http://example.org/resource>`
    NamedNode(IriRef<'a>),

    /// Blank node. The label is document-scoped: the same text parsed in two
    /// different documents denotes two different nodes.
    BlankNode(BlankNode<'a>),

    /// Literal value (plain, language-tagged, or datatyped).
    Literal(Literal<'a>),

    /// A triple used as a term, `<<( s p o )>>`. Valid only as an object.
    TripleTerm(Box<Triple<'a>>),

    /// RDF-1.2 quoted triple shorthand `<< s p o >>`. Desugars at parse time
    /// into a blank reifier plus an `rdf:reifies` triple; never stored.
    QuotedTriple(Box<Triple<'a>>),

    /// RDF-1.2 explicit reifier `<< s p o ~ id >>`. Desugars identically to
    /// [`Node::QuotedTriple`] but with a caller-supplied identifier; never stored.
    ReifiedTriple {
        /// The reifier identifier (IRI or blank node).
        id: Box<Node<'a>>,
        /// The reified triple.
        triple: Box<Triple<'a>>,
    },

    /// The default (unnamed) graph. Valid only in the graph position.
    DefaultGraph,
}

impl<'a> Node<'a> {
    /// Construct an IRI node.
    pub fn iri(iri: &'a str) -> Self {
        Node::NamedNode(IriRef(iri))
    }

    /// Construct a blank node from a document-scoped label.
    pub fn blank(label: &'a str) -> Self {
        Node::BlankNode(BlankNode(label))
    }

    /// Construct a plain (untyped, unlanguaged) literal.
    pub fn literal_str(value: &'a str) -> Self {
        Node::Literal(Literal::plain(value))
    }

    /// Construct a language-tagged literal with no base direction.
    pub fn literal_lang(value: &'a str, language: &'a str) -> Self {
        Node::Literal(Literal::lang(value, language, None))
    }

    /// Construct a language-tagged literal with an explicit base direction.
    pub fn literal_lang_dir(value: &'a str, language: &'a str, direction: Direction) -> Self {
        Node::Literal(Literal::lang(value, language, Some(direction)))
    }

    /// Construct a datatyped literal.
    pub fn literal_typed(value: &'a str, datatype: &'a str) -> Self {
        Node::Literal(Literal::typed(value, datatype))
    }

    /// Construct a triple term (RDF-star value position).
    pub fn triple_term(triple: Triple<'a>) -> Self {
        Node::TripleTerm(Box::new(triple))
    }

    /// Whether this term is desugared (no [`Node::QuotedTriple`]/[`Node::ReifiedTriple`]
    /// anywhere in its structure). Stored quads must only ever contain desugared terms.
    pub fn is_desugared(&self) -> bool {
        match self {
            Node::QuotedTriple(_) | Node::ReifiedTriple { .. } => false,
            Node::TripleTerm(t) => {
                t.subject.is_desugared() && t.predicate.is_desugared() && t.object.is_desugared()
            }
            _ => true,
        }
    }

    /// True if this is an IRI.
    pub fn is_iri(&self) -> bool {
        matches!(self, Node::NamedNode(_))
    }

    /// True if this is a blank node.
    pub fn is_blank_node(&self) -> bool {
        matches!(self, Node::BlankNode(_))
    }

    /// True if this is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    /// True if this is a triple term.
    pub fn is_triple_term(&self) -> bool {
        matches!(self, Node::TripleTerm(_))
    }

    /// True if this is the default graph.
    pub fn is_default_graph(&self) -> bool {
        matches!(self, Node::DefaultGraph)
    }

    /// Valid as a subject: IRI, blank node, or triple term.
    pub fn is_valid_subject(&self) -> bool {
        self.is_iri() || self.is_blank_node() || self.is_triple_term()
    }

    /// Valid as a predicate: IRI only.
    pub fn is_valid_predicate(&self) -> bool {
        self.is_iri()
    }

    /// Valid as a graph name: IRI, blank node, or the default graph.
    pub fn is_valid_graph(&self) -> bool {
        self.is_iri() || self.is_blank_node() || self.is_default_graph()
    }

    /// Get as an IRI reference.
    pub fn as_iri(&self) -> Option<&IriRef<'a>> {
        match self {
            Node::NamedNode(iri) => Some(iri),
            _ => None,
        }
    }

    /// Get as a literal.
    pub fn as_literal(&self) -> Option<&Literal<'a>> {
        match self {
            Node::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Get as a blank node.
    pub fn as_blank_node(&self) -> Option<&BlankNode<'a>> {
        match self {
            Node::BlankNode(b) => Some(b),
            _ => None,
        }
    }

    /// Get as a triple term.
    pub fn as_triple_term(&self) -> Option<&Triple<'a>> {
        match self {
            Node::TripleTerm(t) => Some(t),
            _ => None,
        }
    }
}

impl<'a> fmt::Debug for Node<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::NamedNode(iri) => write!(f, "NamedNode({})", iri.0),
            Node::BlankNode(b) => write!(f, "BlankNode({})", b.0),
            Node::Literal(lit) => write!(f, "Literal({:?})", lit),
            Node::TripleTerm(t) => write!(f, "TripleTerm({:?})", t),
            Node::QuotedTriple(t) => write!(f, "QuotedTriple({:?})", t),
            Node::ReifiedTriple { id, triple } => {
                write!(f, "ReifiedTriple({:?} ~ {:?})", triple, id)
            }
            Node::DefaultGraph => write!(f, "DefaultGraph"),
        }
    }
}

impl<'a> fmt::Display for Node<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::NamedNode(iri) => write!(f, "<{}>", iri.0),
            Node::BlankNode(b) => write!(f, "_:{}", b.0),
            Node::Literal(lit) => write!(f, "{}", lit),
            Node::TripleTerm(t) => write!(f, "<<( {} )>>", t),
            Node::QuotedTriple(t) => write!(f, "<< {} >>", t),
            Node::ReifiedTriple { id, triple } => write!(f, "<< {} ~ {} >>", triple, id),
            Node::DefaultGraph => write!(f, "(default graph)"),
        }
    }
}

/// Borrowed IRI reference.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct IriRef<'a>(pub &'a str);

impl<'a> IriRef<'a> {
    /// The full IRI string.
    pub fn as_str(&self) -> &'a str {
        self.0
    }

    /// Namespace (everything up to and including the last `#` or `/`).
    pub fn namespace(&self) -> &'a str {
        let s = self.0;
        if let Some(pos) = s.rfind('#') {
            &s[..=pos]
        } else if let Some(pos) = s.rfind('/') {
            &s[..=pos]
        } else {
            ""
        }
    }

    /// Local name (everything after the last `#` or `/`).
    pub fn local_name(&self) -> &'a str {
        let s = self.0;
        if let Some(pos) = s.rfind('#') {
            &s[pos + 1..]
        } else if let Some(pos) = s.rfind('/') {
            &s[pos + 1..]
        } else {
            s
        }
    }
}

impl<'a> fmt::Debug for IriRef<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IriRef({})", self.0)
    }
}

impl<'a> fmt::Display for IriRef<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Document-scoped blank node label.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlankNode<'a>(pub &'a str);

impl<'a> BlankNode<'a> {
    /// The label text, without the `_:` prefix.
    pub fn label(&self) -> &'a str {
        self.0
    }
}

impl<'a> fmt::Debug for BlankNode<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlankNode({})", self.0)
    }
}

impl<'a> fmt::Display for BlankNode<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// Base direction of a directional language-tagged string (RDF-1.2).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Left-to-right.
    Ltr,
    /// Right-to-left.
    Rtl,
}

impl Direction {
    /// Parse a direction from its wire form (`ltr`/`rtl`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ltr" => Some(Direction::Ltr),
            "rtl" => Some(Direction::Rtl),
            _ => None,
        }
    }

    /// Wire form (`ltr`/`rtl`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// RDF literal: a lexical form plus either nothing (plain), a language tag
/// (optionally with base direction), or a datatype IRI.
///
/// Exactly one of `language` and `datatype` is meaningful at a time; a plain
/// literal has neither. `direction` is only ever `Some` when `language` is.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal<'a> {
    /// Lexical form, preserved verbatim.
    pub lexical_form: &'a str,
    /// BCP-47 language tag, present iff the datatype is `rdf:langString`.
    pub language: Option<&'a str>,
    /// Base direction; only meaningful when `language` is `Some`.
    pub direction: Option<Direction>,
    /// Datatype IRI. `None` for plain literals and language literals (whose
    /// implicit datatype is `rdf:langString`/`rdf:dirLangString`).
    pub datatype: Option<&'a str>,
}

impl<'a> Literal<'a> {
    /// A plain (`xsd:string`) literal.
    pub fn plain(value: &'a str) -> Self {
        Literal {
            lexical_form: value,
            language: None,
            direction: None,
            datatype: None,
        }
    }

    /// A language-tagged literal, optionally with base direction.
    pub fn lang(value: &'a str, language: &'a str, direction: Option<Direction>) -> Self {
        Literal {
            lexical_form: value,
            language: Some(language),
            direction,
            datatype: None,
        }
    }

    /// A datatyped literal.
    pub fn typed(value: &'a str, datatype: &'a str) -> Self {
        Literal {
            lexical_form: value,
            language: None,
            direction: None,
            datatype: Some(datatype),
        }
    }

    /// True for a literal with neither language nor datatype.
    pub fn is_plain(&self) -> bool {
        self.language.is_none() && self.datatype.is_none()
    }

    /// True for a language-tagged literal.
    pub fn has_language(&self) -> bool {
        self.language.is_some()
    }

    /// True for a datatyped (non-language) literal.
    pub fn has_datatype(&self) -> bool {
        self.datatype.is_some()
    }

    /// The effective datatype IRI: `rdf:langString`/`rdf:dirLangString` for
    /// language literals, `xsd:string` for plain literals, else the explicit datatype.
    pub fn effective_datatype(&self) -> &str {
        if self.language.is_some() {
            if self.direction.is_some() {
                crate::Vocabulary::RDF_DIR_LANG_STRING
            } else {
                crate::Vocabulary::RDF_LANG_STRING
            }
        } else {
            self.datatype.unwrap_or(crate::Vocabulary::XSD_STRING)
        }
    }
}

impl<'a> fmt::Debug for Literal<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Literal")
            .field("lexical_form", &self.lexical_form)
            .field("language", &self.language)
            .field("direction", &self.direction)
            .field("datatype", &self.datatype)
            .finish()
    }
}

impl<'a> fmt::Display for Literal<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.lexical_form)?;
        if let Some(lang) = self.language {
            write!(f, "@{}", lang)?;
            if let Some(dir) = self.direction {
                write!(f, "--{}", dir)?;
            }
        } else if let Some(dt) = self.datatype {
            write!(f, "^^<{}>", dt)?;
        }
        Ok(())
    }
}
