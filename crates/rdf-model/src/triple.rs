//! RDF Triple (Subject-Predicate-Object)

use crate::{Node, RdfError, Result};
use std::fmt;

/// RDF Triple: Subject-Predicate-Object.
///
/// Zero-copy representation using borrowed nodes. A `Triple` on its own does
/// not know whether it sits at the top level of a document (where the subject
/// may not be a [`Node::TripleTerm`]) or inside a `<<( ... )>>` triple term
/// (where it may) — callers pick [`Triple::new_outer`] or [`Triple::new_inner`]
/// accordingly.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple<'a> {
    /// Subject.
    pub subject: Node<'a>,

    /// Predicate (must be IRI).
    pub predicate: Node<'a>,

    /// Object (can be any node type except the default graph).
    pub object: Node<'a>,
}

impl<'a> Triple<'a> {
    /// Create a triple valid at the top level of a document: subject must be
    /// an IRI or blank node (never a triple term), predicate must be an IRI.
    pub fn new_outer(subject: Node<'a>, predicate: Node<'a>, object: Node<'a>) -> Result<Self> {
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
        Ok(Triple {
            subject,
            predicate,
            object,
        })
    }

    /// Create a triple valid as the content of a triple term: subject may
    /// additionally be another triple term.
    pub fn new_inner(subject: Node<'a>, predicate: Node<'a>, object: Node<'a>) -> Result<Self> {
        if !subject.is_valid_subject() {
            return Err(RdfError::InvalidTerm(
                "subject must be an IRI, blank node, or triple term".into(),
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
        Ok(Triple {
            subject,
            predicate,
            object,
        })
    }

    /// Create a triple without validation. Used by parsers that have already
    /// checked term positions while producing `subject`/`predicate`.
    pub fn new_unchecked(subject: Node<'a>, predicate: Node<'a>, object: Node<'a>) -> Self {
        Triple {
            subject,
            predicate,
            object,
        }
    }

    /// Check if this triple matches a pattern.
    ///
    /// `None` represents a wildcard that matches anything.
    pub fn matches(
        &self,
        subject: Option<&Node<'a>>,
        predicate: Option<&Node<'a>>,
        object: Option<&Node<'a>>,
    ) -> bool {
        let subject_matches = subject.map_or(true, |s| s == &self.subject);
        let predicate_matches = predicate.map_or(true, |p| p == &self.predicate);
        let object_matches = object.map_or(true, |o| o == &self.object);

        subject_matches && predicate_matches && object_matches
    }

    /// Get subject as IRI string (if it's an IRI).
    pub fn subject_iri(&self) -> Option<&str> {
        self.subject.as_iri().map(|iri| iri.as_str())
    }

    /// Get predicate as IRI string.
    pub fn predicate_iri(&self) -> Option<&str> {
        self.predicate.as_iri().map(|iri| iri.as_str())
    }

    /// Get object as IRI string (if it's an IRI).
    pub fn object_iri(&self) -> Option<&str> {
        self.object.as_iri().map(|iri| iri.as_str())
    }

    /// Serialize to N-Triples format. Use [`crate::canonical`] helpers from
    /// `rdf-io` for RDF-1.2-aware escaping; this is a quick, non-canonical form.
    pub fn to_ntriples(&self) -> String {
        format!("{} {} {} .", self.subject, self.predicate, self.object)
    }
}

impl<'a> fmt::Debug for Triple<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Triple")
            .field("subject", &self.subject)
            .field("predicate", &self.predicate)
            .field("object", &self.object)
            .finish()
    }
}

impl<'a> fmt::Display for Triple<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}
