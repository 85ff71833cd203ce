//! Quad index key layout.
//!
//! A quad is stored as eleven 68-byte keys, one per [`IndexKind`] permutation
//! of (subject, predicate, object, graph) — each key is simply the
//! concatenation of the four terms' [`rdf_model::encoding::EncodedTerm`]
//! bytes in that permutation's order, with an empty value. Having eleven
//! orderings means any pattern (any subset of positions bound) has an index
//! whose key space puts all of its bound positions in a contiguous leading
//! prefix, so the backend only ever needs a single ordered range scan to
//! answer it — never a full scan plus a filter.

use rdf_model::encoding::{decode_term, encode_graph_term, encode_node, DecodedTerm, EncodedTerm, ENCODED_TERM_SIZE};
use rdf_model::side_table::SideTable;
use rdf_model::{Node, Quad};

/// Size of a full index key: four encoded terms.
pub const KEY_SIZE: usize = ENCODED_TERM_SIZE * 4;

/// A quad with every term pre-encoded to its fixed-width form. Building this
/// once and sharing it across all eleven index insertions avoids re-hashing
/// each term eleven times.
#[derive(Debug, Clone, Copy)]
pub struct EncodedQuad {
    /// Encoded subject.
    pub s: EncodedTerm,
    /// Encoded predicate.
    pub p: EncodedTerm,
    /// Encoded object.
    pub o: EncodedTerm,
    /// Encoded graph (may be the default-graph tag).
    pub g: EncodedTerm,
}

impl EncodedQuad {
    /// Encode every term of a quad, recording hashed terms in `side_table`.
    pub fn encode(quad: &Quad<'_>, side_table: &SideTable) -> Result<Self, rdf_model::encoding::EncodingError> {
        Ok(EncodedQuad {
            s: encode_node(&quad.subject, side_table)?,
            p: encode_node(&quad.predicate, side_table)?,
            o: encode_node(&quad.object, side_table)?,
            g: encode_graph_term(&quad.graph, side_table)?,
        })
    }
}

/// A quad decoded back from its encoded terms, owned since the values may
/// have come from the side table.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedQuad {
    /// Decoded subject.
    pub subject: DecodedTerm,
    /// Decoded predicate.
    pub predicate: DecodedTerm,
    /// Decoded object.
    pub object: DecodedTerm,
    /// Decoded graph.
    pub graph: DecodedTerm,
}

/// One of the four quad positions, used to describe an [`IndexKind`]'s key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// Subject.
    S,
    /// Predicate.
    P,
    /// Object.
    O,
    /// Graph.
    G,
}

/// The eleven required index permutations.
///
/// Names spell out their key order: `Spog` stores subject, then predicate,
/// then object, then graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// Subject, predicate, object, graph.
    Spog,
    /// Predicate, object, subject, graph.
    Posg,
    /// Object, subject, predicate, graph.
    Ospg,
    /// Graph, subject, predicate, object.
    Gspo,
    /// Graph, predicate, object, subject.
    Gpos,
    /// Graph, object, subject, predicate.
    Gosp,
    /// Predicate, subject, object, graph.
    Psog,
    /// Subject, object, predicate, graph.
    Sopg,
    /// Object, predicate, subject, graph.
    Opsg,
    /// Predicate, graph, subject, object.
    Pgso,
    /// Object, graph, subject, predicate.
    Ogsp,
}

impl IndexKind {
    /// All eleven required permutations, in a fixed, deterministic order.
    pub fn all() -> &'static [IndexKind] {
        &[
            IndexKind::Spog,
            IndexKind::Posg,
            IndexKind::Ospg,
            IndexKind::Gspo,
            IndexKind::Gpos,
            IndexKind::Gosp,
            IndexKind::Psog,
            IndexKind::Sopg,
            IndexKind::Opsg,
            IndexKind::Pgso,
            IndexKind::Ogsp,
        ]
    }

    /// The component order this index lays keys out in, left to right.
    pub fn order(&self) -> [Component; 4] {
        use Component::*;
        match self {
            IndexKind::Spog => [S, P, O, G],
            IndexKind::Posg => [P, O, S, G],
            IndexKind::Ospg => [O, S, P, G],
            IndexKind::Gspo => [G, S, P, O],
            IndexKind::Gpos => [G, P, O, S],
            IndexKind::Gosp => [G, O, S, P],
            IndexKind::Psog => [P, S, O, G],
            IndexKind::Sopg => [S, O, P, G],
            IndexKind::Opsg => [O, P, S, G],
            IndexKind::Pgso => [P, G, S, O],
            IndexKind::Ogsp => [O, G, S, P],
        }
    }

    fn component_of(quad: &EncodedQuad, c: Component) -> EncodedTerm {
        match c {
            Component::S => quad.s,
            Component::P => quad.p,
            Component::O => quad.o,
            Component::G => quad.g,
        }
    }

    /// Build this index's full 68-byte key for an encoded quad.
    pub fn encode_key(&self, quad: &EncodedQuad) -> [u8; KEY_SIZE] {
        let mut key = [0u8; KEY_SIZE];
        for (i, c) in self.order().iter().enumerate() {
            let term = Self::component_of(quad, *c);
            key[i * ENCODED_TERM_SIZE..(i + 1) * ENCODED_TERM_SIZE].copy_from_slice(&term.0);
        }
        key
    }

    /// Decode a full 68-byte key back into its four terms.
    pub fn decode_key(&self, key: &[u8], side_table: &SideTable) -> Result<DecodedQuad, rdf_model::encoding::DecodeError> {
        let mut slots: [Option<DecodedTerm>; 4] = [None, None, None, None];
        let mut terms: [Option<EncodedTerm>; 4] = [None, None, None, None];
        for (i, c) in self.order().iter().enumerate() {
            let mut bytes = [0u8; ENCODED_TERM_SIZE];
            bytes.copy_from_slice(&key[i * ENCODED_TERM_SIZE..(i + 1) * ENCODED_TERM_SIZE]);
            let term = EncodedTerm(bytes);
            let decoded = decode_term(&term, side_table)?;
            let slot = match c {
                Component::S => 0,
                Component::P => 1,
                Component::O => 2,
                Component::G => 3,
            };
            slots[slot] = Some(decoded);
            terms[slot] = Some(term);
        }
        Ok(DecodedQuad {
            subject: slots[0].take().unwrap(),
            predicate: slots[1].take().unwrap(),
            object: slots[2].take().unwrap(),
            graph: slots[3].take().unwrap(),
        })
    }

    /// Build the leading prefix of this index's key made up of the bound
    /// positions in `pattern`, stopping at the first unbound one. An empty
    /// vec means this index cannot narrow the scan at all for this pattern
    /// (none of its leading positions are bound).
    pub fn scan_prefix(&self, pattern: &EncodedPattern) -> Vec<u8> {
        let mut prefix = Vec::with_capacity(KEY_SIZE);
        for c in self.order().iter() {
            let bound = match c {
                Component::S => pattern.s,
                Component::P => pattern.p,
                Component::O => pattern.o,
                Component::G => pattern.g,
            };
            match bound {
                Some(term) => prefix.extend_from_slice(&term.0),
                None => break,
            }
        }
        prefix
    }

    /// Number of leading positions of this index's order that are bound in `pattern`.
    pub fn bound_prefix_len(&self, pattern: &EncodedPattern) -> usize {
        let mut n = 0;
        for c in self.order().iter() {
            let bound = match c {
                Component::S => pattern.s,
                Component::P => pattern.p,
                Component::O => pattern.o,
                Component::G => pattern.g,
            };
            if bound.is_some() {
                n += 1;
            } else {
                break;
            }
        }
        n
    }

    /// Pick the index whose leading bound-prefix is longest for `pattern`,
    /// breaking ties by [`IndexKind::all`] order. Always returns a usable
    /// index, even for the fully-unbound pattern (full scan over `Spog`).
    pub fn select_best(pattern: &EncodedPattern) -> IndexKind {
        *IndexKind::all()
            .iter()
            .max_by_key(|k| k.bound_prefix_len(pattern))
            .expect("IndexKind::all() is non-empty")
    }
}

/// A quad pattern with each bound position pre-encoded, used to pick an
/// index and build its scan prefix. `None` is a wildcard.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodedPattern {
    /// Bound subject, if any.
    pub s: Option<EncodedTerm>,
    /// Bound predicate, if any.
    pub p: Option<EncodedTerm>,
    /// Bound object, if any.
    pub o: Option<EncodedTerm>,
    /// Bound graph, if any.
    pub g: Option<EncodedTerm>,
}

impl EncodedPattern {
    /// Encode a pattern given as optional [`Node`]s.
    pub fn encode(
        subject: Option<&Node<'_>>,
        predicate: Option<&Node<'_>>,
        object: Option<&Node<'_>>,
        graph: Option<&Node<'_>>,
        side_table: &SideTable,
    ) -> Result<Self, rdf_model::encoding::EncodingError> {
        Ok(EncodedPattern {
            s: subject.map(|n| encode_node(n, side_table)).transpose()?,
            p: predicate.map(|n| encode_node(n, side_table)).transpose()?,
            o: object.map(|n| encode_node(n, side_table)).transpose()?,
            g: graph.map(|n| encode_graph_term(n, side_table)).transpose()?,
        })
    }
}
