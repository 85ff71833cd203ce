//! RDF Quad (Subject-Predicate-Object-Graph)

use crate::{Node, RdfError, Result, Triple};
use std::fmt;

/// RDF Quad: Subject-Predicate-Object-Graph.
///
/// `graph` is [`Node::DefaultGraph`] rather than an `Option`, so every quad
/// carries a graph slot uniformly — this is what lets the storage layer treat
/// the default graph as just another value in the G position of an index key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Quad<'a> {
    /// Subject (must be IRI or blank node).
    pub subject: Node<'a>,

    /// Predicate (must be IRI).
    pub predicate: Node<'a>,

    /// Object (any term type, never the default graph marker).
    pub object: Node<'a>,

    /// Graph name. `Node::DefaultGraph` for the unnamed default graph,
    /// otherwise an IRI or blank node.
    pub graph: Node<'a>,
}

impl<'a> Quad<'a> {
    /// Create a new quad, validating term positions.
    pub fn new(
        subject: Node<'a>,
        predicate: Node<'a>,
        object: Node<'a>,
        graph: Node<'a>,
    ) -> Result<Self> {
        if !(subject.is_iri() || subject.is_blank_node()) {
            return Err(RdfError::InvalidTerm(
                "subject must be an IRI or blank node".into(),
            ));
        }
        if !predicate.is_iri() {
            return Err(RdfError::InvalidTerm("predicate must be an IRI".into()));
        }
        if object.is_default_graph() {
            return Err(RdfError::InvalidTerm(
                "object cannot be the default graph".into(),
            ));
        }
        if !graph.is_valid_graph() {
            return Err(RdfError::InvalidTerm(
                "graph must be an IRI, blank node, or the default graph".into(),
            ));
        }
        if !(subject.is_desugared() && object.is_desugared()) {
            return Err(RdfError::InvalidTerm(
                "quoted triples and reifiers must be desugared before storage".into(),
            ));
        }

        Ok(Quad {
            subject,
            predicate,
            object,
            graph,
        })
    }

    /// Create a quad in the default graph from a triple.
    pub fn from_triple(triple: Triple<'a>) -> Self {
        Quad {
            subject: triple.subject,
            predicate: triple.predicate,
            object: triple.object,
            graph: Node::DefaultGraph,
        }
    }

    /// Create a quad in a named graph from a triple.
    pub fn from_triple_with_graph(triple: Triple<'a>, graph: Node<'a>) -> Self {
        Quad {
            subject: triple.subject,
            predicate: triple.predicate,
            object: triple.object,
            graph,
        }
    }

    /// Drop the graph, producing the underlying triple.
    pub fn to_triple(&self) -> Triple<'a> {
        Triple::new_unchecked(self.subject.clone(), self.predicate.clone(), self.object.clone())
    }

    /// True if this quad is in the default graph.
    pub fn is_default_graph(&self) -> bool {
        self.graph.is_default_graph()
    }

    /// Check if this quad matches a pattern.
    ///
    /// `None` in any position is a wildcard that matches anything, including
    /// the graph position (so `graph: None` matches quads in every graph, not
    /// just the default graph — use `Some(&Node::DefaultGraph)` for that).
    pub fn matches(
        &self,
        subject: Option<&Node<'a>>,
        predicate: Option<&Node<'a>>,
        object: Option<&Node<'a>>,
        graph: Option<&Node<'a>>,
    ) -> bool {
        let subject_matches = subject.map_or(true, |s| s == &self.subject);
        let predicate_matches = predicate.map_or(true, |p| p == &self.predicate);
        let object_matches = object.map_or(true, |o| o == &self.object);
        let graph_matches = graph.map_or(true, |g| g == &self.graph);

        subject_matches && predicate_matches && object_matches && graph_matches
    }

    /// Serialize to N-Quads format. Use `rdf-io`'s canonical serializer for
    /// RDF-1.2-aware escaping; this is a quick, non-canonical form.
    pub fn to_nquads(&self) -> String {
        if self.is_default_graph() {
            format!("{} {} {} .", self.subject, self.predicate, self.object)
        } else {
            format!(
                "{} {} {} {} .",
                self.subject, self.predicate, self.object, self.graph
            )
        }
    }
}

impl<'a> fmt::Debug for Quad<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quad")
            .field("subject", &self.subject)
            .field("predicate", &self.predicate)
            .field("object", &self.object)
            .field("graph", &self.graph)
            .finish()
    }
}

impl<'a> fmt::Display for Quad<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default_graph() {
            write!(f, "{} {} {}", self.subject, self.predicate, self.object)
        } else {
            write!(
                f,
                "{} {} {} {}",
                self.subject, self.predicate, self.object, self.graph
            )
        }
    }
}
