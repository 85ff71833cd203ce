//! Blank-node-relabelling graph isomorphism for RDF quad multisets.
//!
//! Two quad multisets are isomorphic if one can be turned into the other by
//! a bijective relabelling of blank nodes alone — every IRI, literal, and
//! the multiset's size and shape must match exactly. Deciding this in
//! general is graph-isomorphism-complete; the algorithm here is a
//! degree-ordered backtracking search: bound-and-prune recursion rather
//! than a SAT/ILP encoding.
//!
//! Cancellation: the scan layer in `storage` stops a long-running query by
//! dropping its iterator. A recursive search has no iterator to drop, so the
//! analogous mechanism here is a caller-supplied predicate polled between
//! backtracking branches; see [`is_isomorphic_cancellable`].

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

use rdf_model::{Node, Quad, Triple};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::HashMap;

/// The isomorphism search was cancelled via the caller-supplied signal
/// before it could reach a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("graph isomorphism check cancelled")]
pub struct Cancelled;

/// Decide whether `a` and `b` are isomorphic up to blank-node relabelling.
/// Never cancels.
pub fn is_isomorphic<'a, 'b>(a: &[Quad<'a>], b: &[Quad<'b>]) -> bool {
    is_isomorphic_cancellable(a, b, &|| false).expect("a cancellation signal that always returns false never cancels")
}

/// As [`is_isomorphic`], but polls `cancel` between backtracking branches
/// and returns [`Cancelled`] if it ever returns `true`. Use this for
/// adversarial or caller-untrusted inputs where the search could otherwise
/// run for an unbounded (worst-case factorial) amount of time.
pub fn is_isomorphic_cancellable<'a, 'b>(
    a: &[Quad<'a>],
    b: &[Quad<'b>],
    cancel: &dyn Fn() -> bool,
) -> Result<bool, Cancelled> {
    // Step 1: size mismatch.
    if a.len() != b.len() {
        return Ok(false);
    }

    let cmp_a: Vec<CmpQuad> = a.iter().map(CmpQuad::from_quad).collect();
    let cmp_b: Vec<CmpQuad> = b.iter().map(CmpQuad::from_quad).collect();

    // Step 2: enumerate blank labels on each side.
    let blanks_a = collect_blank_labels(&cmp_a);
    let blanks_b = collect_blank_labels(&cmp_b);
    if blanks_a.len() != blanks_b.len() {
        return Ok(false);
    }

    // Step 3: no blanks at all, compare directly as multisets.
    if blanks_a.is_empty() {
        return Ok(multiset_eq(&cmp_a, &cmp_b));
    }

    // Step 4: degree-ordered backtracking search.
    let degree_a = degree_map(&cmp_a);
    let degree_b = degree_map(&cmp_b);

    let mut order_a: Vec<String> = blanks_a.into_iter().collect();
    order_a.sort_by(|x, y| degree_a[y].cmp(&degree_a[x]).then_with(|| x.cmp(y)));

    let candidates_b: Vec<String> = {
        let mut v: Vec<String> = blanks_b.into_iter().collect();
        v.sort_by(|x, y| degree_b[y].cmp(&degree_b[x]).then_with(|| x.cmp(y)));
        v
    };

    let mut search = Search {
        cmp_a: &cmp_a,
        cmp_b: &cmp_b,
        order_a: &order_a,
        candidates_b: &candidates_b,
        cancel,
    };

    let mut mapping = FxHashMap::default();
    let mut used = FxHashSet::default();
    search.backtrack(0, &mut mapping, &mut used)
}

struct Search<'q> {
    cmp_a: &'q [CmpQuad],
    cmp_b: &'q [CmpQuad],
    order_a: &'q [String],
    candidates_b: &'q [String],
    cancel: &'q dyn Fn() -> bool,
}

impl<'q> Search<'q> {
    fn backtrack(
        &mut self,
        index: usize,
        mapping: &mut FxHashMap<String, String>,
        used: &mut FxHashSet<String>,
    ) -> Result<bool, Cancelled> {
        if index == self.order_a.len() {
            // Step 5: terminal success verifies the complete mapping yields
            // equal multisets.
            let rendered: Vec<CmpQuad> = self.cmp_a.iter().map(|q| q.substitute(mapping)).collect();
            return Ok(multiset_eq(&rendered, self.cmp_b));
        }

        let expected = &self.order_a[index];
        for candidate in self.candidates_b {
            if self.cancel.is_cancelled_impl() {
                return Err(Cancelled);
            }
            if used.contains(candidate) {
                continue;
            }
            mapping.insert(expected.clone(), candidate.clone());
            used.insert(candidate.clone());

            if self.partially_consistent(mapping) {
                if self.backtrack(index + 1, mapping, used)? {
                    return Ok(true);
                }
            }

            mapping.remove(expected);
            used.remove(candidate);
        }

        Ok(false)
    }

    /// Every quad on the expected side whose blank occurrences are *all*
    /// already mapped must have a matching quad on the actual side.
    fn partially_consistent(&self, mapping: &FxHashMap<String, String>) -> bool {
        let b_set: FxHashSet<&CmpQuad> = self.cmp_b.iter().collect();
        for quad in self.cmp_a {
            let blanks = quad.blank_labels();
            if blanks.iter().all(|b| mapping.contains_key(*b)) {
                let rendered = quad.substitute(mapping);
                if !b_set.contains(&rendered) {
                    return false;
                }
            }
        }
        true
    }
}

trait CancelPoll {
    fn is_cancelled_impl(&self) -> bool;
}

impl CancelPoll for &dyn Fn() -> bool {
    fn is_cancelled_impl(&self) -> bool {
        (self)()
    }
}

fn collect_blank_labels(quads: &[CmpQuad]) -> FxHashSet<String> {
    let mut out = FxHashSet::default();
    for quad in quads {
        for label in quad.blank_labels() {
            out.insert(label.clone());
        }
    }
    out
}

fn degree_map(quads: &[CmpQuad]) -> HashMap<String, usize> {
    let mut out: HashMap<String, usize> = HashMap::new();
    for quad in quads {
        for label in quad.blank_labels() {
            *out.entry(label.clone()).or_insert(0) += 1;
        }
    }
    out
}

fn multiset_eq(a: &[CmpQuad], b: &[CmpQuad]) -> bool {
    let mut count_a: FxHashMap<&CmpQuad, usize> = FxHashMap::default();
    for q in a {
        *count_a.entry(q).or_insert(0) += 1;
    }
    let mut count_b: FxHashMap<&CmpQuad, usize> = FxHashMap::default();
    for q in b {
        *count_b.entry(q).or_insert(0) += 1;
    }
    count_a == count_b
}

/// A lifetime-erased, owned-string comparison form of a node: isomorphism
/// compares quads from two independently-borrowed documents (`Quad<'a>` and
/// `Quad<'b>`), so candidate blank-label substitution has to produce values
/// that don't depend on either input's borrow.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum CmpNode {
    Iri(String),
    Blank(String),
    Literal {
        value: String,
        language: Option<String>,
        direction: Option<String>,
        datatype: Option<String>,
    },
    TripleTerm(Box<CmpTriple>),
    DefaultGraph,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
struct CmpTriple {
    subject: CmpNode,
    predicate: CmpNode,
    object: CmpNode,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
struct CmpQuad {
    subject: CmpNode,
    predicate: CmpNode,
    object: CmpNode,
    graph: CmpNode,
}

impl CmpNode {
    fn from_node(node: &Node<'_>) -> Self {
        match node {
            Node::NamedNode(iri) => CmpNode::Iri(iri.as_str().to_string()),
            Node::BlankNode(b) => CmpNode::Blank(b.label().to_string()),
            Node::Literal(lit) => CmpNode::Literal {
                value: lit.lexical_form.to_string(),
                language: lit.language.map(|s| s.to_string()),
                direction: lit.direction.map(|d| d.as_str().to_string()),
                datatype: lit.datatype.map(|s| s.to_string()),
            },
            Node::TripleTerm(t) => CmpNode::TripleTerm(Box::new(CmpTriple::from_triple(t))),
            Node::QuotedTriple(_) | Node::ReifiedTriple { .. } => {
                unreachable!("quoted/reified triples must be desugared before storage")
            }
            Node::DefaultGraph => CmpNode::DefaultGraph,
        }
    }

    fn blank_labels<'o>(&'o self, out: &mut Vec<&'o str>) {
        match self {
            CmpNode::Blank(label) => out.push(label),
            CmpNode::TripleTerm(t) => {
                t.subject.blank_labels(out);
                t.predicate.blank_labels(out);
                t.object.blank_labels(out);
            }
            _ => {}
        }
    }

    fn substitute(&self, mapping: &FxHashMap<String, String>) -> CmpNode {
        match self {
            CmpNode::Blank(label) => CmpNode::Blank(mapping.get(label).cloned().unwrap_or_else(|| label.clone())),
            CmpNode::TripleTerm(t) => CmpNode::TripleTerm(Box::new(t.substitute(mapping))),
            other => other.clone(),
        }
    }
}

impl CmpTriple {
    fn from_triple(triple: &Triple<'_>) -> Self {
        CmpTriple {
            subject: CmpNode::from_node(&triple.subject),
            predicate: CmpNode::from_node(&triple.predicate),
            object: CmpNode::from_node(&triple.object),
        }
    }

    fn substitute(&self, mapping: &FxHashMap<String, String>) -> CmpTriple {
        CmpTriple {
            subject: self.subject.substitute(mapping),
            predicate: self.predicate.substitute(mapping),
            object: self.object.substitute(mapping),
        }
    }
}

impl CmpQuad {
    fn from_quad(quad: &Quad<'_>) -> Self {
        CmpQuad {
            subject: CmpNode::from_node(&quad.subject),
            predicate: CmpNode::from_node(&quad.predicate),
            object: CmpNode::from_node(&quad.object),
            graph: CmpNode::from_node(&quad.graph),
        }
    }

    fn blank_labels(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.subject.blank_labels(&mut out);
        self.predicate.blank_labels(&mut out);
        self.object.blank_labels(&mut out);
        self.graph.blank_labels(&mut out);
        out
    }

    fn substitute(&self, mapping: &FxHashMap<String, String>) -> CmpQuad {
        CmpQuad {
            subject: self.subject.substitute(mapping),
            predicate: self.predicate.substitute(mapping),
            object: self.object.substitute(mapping),
            graph: self.graph.substitute(mapping),
        }
    }
}
