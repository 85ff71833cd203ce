// Port of Jena BlankNode tests
// Tests blank node creation, uniqueness, and identity

use rdf_model::Node;

#[test]
fn test_create_blank_node() {
    let blank = Node::blank("1");
    assert!(matches!(blank, Node::BlankNode(_)));
}

#[test]
fn test_blank_node_unique_ids() {
    let blank1 = Node::blank("1");
    let blank2 = Node::blank("2");
    let blank3 = Node::blank("3");

    if let (Node::BlankNode(id1), Node::BlankNode(id2), Node::BlankNode(id3)) =
        (&blank1, &blank2, &blank3)
    {
        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }
}

#[test]
fn test_blank_node_same_id() {
    let blank1 = Node::blank("42");
    let blank2 = Node::blank("42");

    if let (Node::BlankNode(id1), Node::BlankNode(id2)) = (&blank1, &blank2) {
        assert_eq!(id1, id2);
    }
}

#[test]
fn test_blank_node_sequential_creation() {
    let labels: Vec<String> = (1..=100).map(|i| i.to_string()).collect();
    let blanks: Vec<Node> = labels.iter().map(|l| Node::blank(l)).collect();

    assert_eq!(blanks.len(), 100);

    for (i, blank) in blanks.iter().enumerate() {
        if let Node::BlankNode(b) = blank {
            assert_eq!(b.label(), (i + 1).to_string());
        }
    }
}

#[test]
fn test_blank_node_not_iri() {
    let blank = Node::blank("1");
    assert!(!matches!(blank, Node::NamedNode(_)));
}

#[test]
fn test_blank_node_not_literal() {
    let blank = Node::blank("1");
    assert!(!matches!(blank, Node::Literal(_)));
}

#[test]
fn test_blank_node_in_triple_subject() {
    use rdf_model::{Dictionary, Triple};
    use std::sync::Arc;

    let dict = Arc::new(Dictionary::new());

    let triple = Triple {
        subject: Node::blank("1"),
        predicate: Node::iri(dict.intern("http://example.org/name")),
        object: Node::literal_typed("Anonymous", dict.intern("http://www.w3.org/2001/XMLSchema#string")),
    };

    // Blank nodes are valid subjects
    assert!(matches!(triple.subject, Node::BlankNode(_)));
}

#[test]
fn test_blank_node_in_triple_object() {
    use rdf_model::{Dictionary, Triple};
    use std::sync::Arc;

    let dict = Arc::new(Dictionary::new());

    let triple = Triple {
        subject: Node::iri(dict.intern("http://example.org/person")),
        predicate: Node::iri(dict.intern("http://example.org/knows")),
        object: Node::blank("1"),
    };

    // Blank nodes are valid objects
    assert!(matches!(triple.object, Node::BlankNode(_)));
}

#[test]
fn test_blank_node_long_labels() {
    let label1 = "n".repeat(64);
    let label2 = "m".repeat(64);
    let blank1 = Node::blank(label1.as_str());
    let blank2 = Node::blank(label2.as_str());

    if let (Node::BlankNode(id1), Node::BlankNode(id2)) = (&blank1, &blank2) {
        assert_eq!(id1.label(), label1);
        assert_eq!(id2.label(), label2);
        assert_ne!(id1, id2);
    }
}

#[test]
fn test_blank_node_empty_label_distinct_from_other() {
    let blank = Node::blank("b0");

    if let Node::BlankNode(id) = blank {
        assert_eq!(id.label(), "b0");
    }
}
