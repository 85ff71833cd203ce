//! Fixed-width term encoding used by the storage layer.
//!
//! Every term is packed into exactly 17 bytes: a 1-byte type tag followed by
//! a 16-byte payload. Terms that fit the payload are encoded inline; terms
//! that don't (IRIs, most literals, non-numeric blank labels, triple terms)
//! are encoded as a 128-bit xxHash3 digest of their content, with the full
//! value recorded in a [`crate::SideTable`] so it can be recovered on decode.
//!
//! This is the representation every index key in `storage` is built from —
//! see the index layer for how four of these are concatenated into a scan key.
//!
//! `encode_node`/`decode_term` trace the tag of every term they handle and
//! warn on the `EncodingError`/`DecodeError` paths, following the same
//! `tracing`/`metrics` pattern `storage::observability` uses for backend
//! operations. Each call increments `encoder.encode.count` or
//! `encoder.decode.count`; falling through to the hash-table side-table path
//! additionally increments `encoder.side_table.write.count`.

use crate::node::{BlankNode, Direction, IriRef, Literal};
use crate::side_table::{SideTable, SideTableValue};
use crate::{Node, Triple};
use std::fmt;

/// Size in bytes of an encoded term: 1 tag byte + 16 payload bytes.
pub const ENCODED_TERM_SIZE: usize = 17;

/// Maximum number of UTF-8 bytes a plain literal can have and still be
/// encoded inline (payload minus one length byte).
pub const INLINE_LITERAL_MAX_LEN: usize = 15;

/// Discriminant for the kind of term an [`EncodedTerm`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TermKind {
    /// The default graph (graph position only); payload unused.
    DefaultGraph = 0,
    /// An IRI, hashed into the side table.
    NamedNodeHash = 1,
    /// A blank node whose label parses as a bare `u64`, inlined.
    BlankNodeInline = 2,
    /// A blank node with a non-numeric label, hashed into the side table.
    BlankNodeHash = 3,
    /// A plain literal of at most [`INLINE_LITERAL_MAX_LEN`] UTF-8 bytes, inlined.
    PlainLiteralInline = 4,
    /// A plain literal too long to inline, hashed into the side table.
    PlainLiteralHash = 5,
    /// A language-tagged literal (with or without base direction), hashed.
    LangLiteralHash = 6,
    /// A datatyped literal with a datatype other than the numeric/temporal
    /// ones below, hashed.
    TypedLiteralHash = 7,
    /// An `xsd:integer` literal, inlined as a big-endian `i64`.
    IntegerInline = 8,
    /// An `xsd:decimal` literal, inlined as big-endian `f64` bits.
    DecimalInline = 9,
    /// An `xsd:double` literal, inlined as big-endian `f64` bits.
    DoubleInline = 10,
    /// An `xsd:boolean` literal, inlined as a single byte.
    BooleanInline = 11,
    /// An `xsd:dateTime` literal, inlined as big-endian nanoseconds since the epoch.
    DateTimeInline = 12,
    /// An `xsd:date` literal, inlined as big-endian days since the epoch.
    DateInline = 13,
    /// A triple term, hashed over its three child encodings.
    TripleTermHash = 14,
}

impl TermKind {
    fn from_tag(tag: u8) -> Result<Self, DecodeError> {
        Ok(match tag {
            0 => TermKind::DefaultGraph,
            1 => TermKind::NamedNodeHash,
            2 => TermKind::BlankNodeInline,
            3 => TermKind::BlankNodeHash,
            4 => TermKind::PlainLiteralInline,
            5 => TermKind::PlainLiteralHash,
            6 => TermKind::LangLiteralHash,
            7 => TermKind::TypedLiteralHash,
            8 => TermKind::IntegerInline,
            9 => TermKind::DecimalInline,
            10 => TermKind::DoubleInline,
            11 => TermKind::BooleanInline,
            12 => TermKind::DateTimeInline,
            13 => TermKind::DateInline,
            14 => TermKind::TripleTermHash,
            other => return Err(DecodeError::UnknownTag(other)),
        })
    }
}

/// A term packed into its fixed 17-byte wire representation.
///
/// Comparing two `EncodedTerm`s byte-for-byte is equivalent to comparing the
/// terms they represent for equality (not for a meaningful ordering — the tag
/// byte groups terms by kind, not by any RDF-defined order).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EncodedTerm(pub [u8; ENCODED_TERM_SIZE]);

impl EncodedTerm {
    /// The type tag byte.
    pub fn kind(&self) -> Result<TermKind, DecodeError> {
        TermKind::from_tag(self.0[0])
    }

    /// The 16-byte payload following the tag.
    pub fn payload(&self) -> &[u8; 16] {
        // SAFETY-free: plain slice arithmetic, `self.0` is always 17 bytes.
        self.0[1..17].try_into().unwrap()
    }

    fn new(kind: TermKind, payload: [u8; 16]) -> Self {
        let mut bytes = [0u8; ENCODED_TERM_SIZE];
        bytes[0] = kind as u8;
        bytes[1..].copy_from_slice(&payload);
        EncodedTerm(bytes)
    }

    fn hash_payload(bytes: &[u8]) -> [u8; 16] {
        xxhash_rust::xxh3::xxh3_128(bytes).to_be_bytes()
    }
}

impl fmt::Debug for EncodedTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedTerm(")?;
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

/// Errors raised while packing a [`Node`] into its fixed-width encoding.
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    /// The graph position held something other than an IRI, blank node, or
    /// the default graph.
    #[error("invalid graph term")]
    InvalidGraphTerm,
    /// A desugared [`Node::QuotedTriple`]/[`Node::ReifiedTriple`] reached the encoder.
    #[error("quoted triples and reifiers cannot be encoded directly; desugar first")]
    NotDesugared,
    /// A numeric/temporal lexical form could not be parsed into its inline representation.
    #[error("malformed lexical form for inline datatype: {0}")]
    MalformedLexicalForm(String),
}

/// Errors raised while unpacking an [`EncodedTerm`] back into a [`Node`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The tag byte did not match any known [`TermKind`].
    #[error("unknown term tag: {0}")]
    UnknownTag(u8),
    /// A hashed term had no corresponding entry in the side table.
    #[error("missing side-table entry for hashed term")]
    MissingSideTableEntry,
    /// The payload bytes were not valid UTF-8 where text was expected.
    #[error("invalid UTF-8 in inline payload")]
    InvalidUtf8,
}

/// Encode a graph-position term (IRI, blank node, or the default graph).
pub fn encode_graph_term(node: &Node<'_>, side_table: &SideTable) -> Result<EncodedTerm, EncodingError> {
    match node {
        Node::DefaultGraph => Ok(EncodedTerm::new(TermKind::DefaultGraph, [0; 16])),
        Node::NamedNode(_) | Node::BlankNode(_) => encode_node(node, side_table),
        _ => Err(EncodingError::InvalidGraphTerm),
    }
}

/// Encode any non-graph-position term (subject, predicate, or object).
pub fn encode_node(node: &Node<'_>, side_table: &SideTable) -> Result<EncodedTerm, EncodingError> {
    metrics::counter!("encoder.encode.count").increment(1);

    let result = encode_node_inner(node, side_table);

    match &result {
        Ok(term) => {
            tracing::trace!(tag = ?term.kind(), "encoded term");
        }
        Err(e) => {
            tracing::warn!(node = ?node, error = %e, "failed to encode term");
        }
    }

    result
}

fn encode_node_inner(node: &Node<'_>, side_table: &SideTable) -> Result<EncodedTerm, EncodingError> {
    match node {
        Node::DefaultGraph => Ok(EncodedTerm::new(TermKind::DefaultGraph, [0; 16])),

        Node::NamedNode(IriRef(iri)) => {
            let payload = EncodedTerm::hash_payload(iri.as_bytes());
            let term = EncodedTerm::new(TermKind::NamedNodeHash, payload);
            metrics::counter!("encoder.side_table.write.count").increment(1);
            side_table.insert(term, SideTableValue::Iri(iri.to_string()));
            Ok(term)
        }

        Node::BlankNode(BlankNode(label)) => {
            if let Some(n) = parse_inline_u64(label) {
                let mut payload = [0u8; 16];
                payload[8..].copy_from_slice(&n.to_be_bytes());
                Ok(EncodedTerm::new(TermKind::BlankNodeInline, payload))
            } else {
                let payload = EncodedTerm::hash_payload(label.as_bytes());
                let term = EncodedTerm::new(TermKind::BlankNodeHash, payload);
                metrics::counter!("encoder.side_table.write.count").increment(1);
                side_table.insert(term, SideTableValue::BlankLabel(label.to_string()));
                Ok(term)
            }
        }

        Node::Literal(lit) => encode_literal(lit, side_table),

        Node::TripleTerm(triple) => encode_triple_term(triple, side_table),

        Node::QuotedTriple(_) | Node::ReifiedTriple { .. } => Err(EncodingError::NotDesugared),
    }
}

fn parse_inline_u64(label: &str) -> Option<u64> {
    if label.is_empty() || (label.len() > 1 && label.starts_with('0')) {
        return None;
    }
    label.parse::<u64>().ok()
}

fn encode_literal(lit: &Literal<'_>, side_table: &SideTable) -> Result<EncodedTerm, EncodingError> {
    if lit.is_plain() {
        let bytes = lit.lexical_form.as_bytes();
        if bytes.len() <= INLINE_LITERAL_MAX_LEN {
            let mut payload = [0u8; 16];
            payload[0] = bytes.len() as u8;
            payload[1..1 + bytes.len()].copy_from_slice(bytes);
            return Ok(EncodedTerm::new(TermKind::PlainLiteralInline, payload));
        }
        let payload = EncodedTerm::hash_payload(bytes);
        let term = EncodedTerm::new(TermKind::PlainLiteralHash, payload);
        metrics::counter!("encoder.side_table.write.count").increment(1);
        side_table.insert(term, SideTableValue::PlainLiteral(lit.lexical_form.to_string()));
        return Ok(term);
    }

    if let Some(language) = lit.language {
        let mut hash_input = Vec::with_capacity(lit.lexical_form.len() + language.len() + 2);
        hash_input.extend_from_slice(lit.lexical_form.as_bytes());
        hash_input.push(0);
        hash_input.extend_from_slice(language.as_bytes());
        hash_input.push(lit.direction.map(|d| d as u8 + 1).unwrap_or(0));
        let payload = EncodedTerm::hash_payload(&hash_input);
        let term = EncodedTerm::new(TermKind::LangLiteralHash, payload);
        metrics::counter!("encoder.side_table.write.count").increment(1);
        side_table.insert(
            term,
            SideTableValue::LangLiteral {
                value: lit.lexical_form.to_string(),
                language: language.to_string(),
                direction: lit.direction,
            },
        );
        return Ok(term);
    }

    let datatype = lit.datatype.unwrap_or(crate::Vocabulary::XSD_STRING);
    match datatype {
        crate::Vocabulary::XSD_INTEGER => encode_integer(lit.lexical_form),
        crate::Vocabulary::XSD_DECIMAL => encode_decimal(lit.lexical_form),
        crate::Vocabulary::XSD_DOUBLE => encode_double(lit.lexical_form),
        crate::Vocabulary::XSD_BOOLEAN => encode_boolean(lit.lexical_form),
        crate::Vocabulary::XSD_DATETIME => encode_datetime(lit.lexical_form),
        crate::Vocabulary::XSD_DATE => encode_date(lit.lexical_form),
        _ => {
            let mut hash_input =
                Vec::with_capacity(lit.lexical_form.len() + datatype.len() + 1);
            hash_input.extend_from_slice(lit.lexical_form.as_bytes());
            hash_input.push(0);
            hash_input.extend_from_slice(datatype.as_bytes());
            let payload = EncodedTerm::hash_payload(&hash_input);
            let term = EncodedTerm::new(TermKind::TypedLiteralHash, payload);
            metrics::counter!("encoder.side_table.write.count").increment(1);
            side_table.insert(
                term,
                SideTableValue::TypedLiteral {
                    value: lit.lexical_form.to_string(),
                    datatype: datatype.to_string(),
                },
            );
            Ok(term)
        }
    }
}

fn encode_integer(lexical_form: &str) -> Result<EncodedTerm, EncodingError> {
    let n: i64 = lexical_form
        .trim()
        .parse()
        .map_err(|_| EncodingError::MalformedLexicalForm(lexical_form.to_string()))?;
    let mut payload = [0u8; 16];
    payload[8..].copy_from_slice(&n.to_be_bytes());
    Ok(EncodedTerm::new(TermKind::IntegerInline, payload))
}

fn encode_decimal(lexical_form: &str) -> Result<EncodedTerm, EncodingError> {
    let f: f64 = lexical_form
        .trim()
        .parse()
        .map_err(|_| EncodingError::MalformedLexicalForm(lexical_form.to_string()))?;
    let mut payload = [0u8; 16];
    payload[8..].copy_from_slice(&f.to_bits().to_be_bytes());
    Ok(EncodedTerm::new(TermKind::DecimalInline, payload))
}

fn encode_double(lexical_form: &str) -> Result<EncodedTerm, EncodingError> {
    let f: f64 = lexical_form
        .trim()
        .parse()
        .map_err(|_| EncodingError::MalformedLexicalForm(lexical_form.to_string()))?;
    let mut payload = [0u8; 16];
    payload[8..].copy_from_slice(&f.to_bits().to_be_bytes());
    Ok(EncodedTerm::new(TermKind::DoubleInline, payload))
}

fn encode_boolean(lexical_form: &str) -> Result<EncodedTerm, EncodingError> {
    let b = match lexical_form.trim() {
        "true" | "1" => true,
        "false" | "0" => false,
        _ => return Err(EncodingError::MalformedLexicalForm(lexical_form.to_string())),
    };
    let mut payload = [0u8; 16];
    payload[0] = b as u8;
    Ok(EncodedTerm::new(TermKind::BooleanInline, payload))
}

fn encode_datetime(lexical_form: &str) -> Result<EncodedTerm, EncodingError> {
    let ns = crate::temporal::parse_datetime_to_epoch_nanos(lexical_form)
        .ok_or_else(|| EncodingError::MalformedLexicalForm(lexical_form.to_string()))?;
    let mut payload = [0u8; 16];
    payload[8..].copy_from_slice(&ns.to_be_bytes());
    Ok(EncodedTerm::new(TermKind::DateTimeInline, payload))
}

fn encode_date(lexical_form: &str) -> Result<EncodedTerm, EncodingError> {
    let days = crate::temporal::parse_date_to_epoch_days(lexical_form)
        .ok_or_else(|| EncodingError::MalformedLexicalForm(lexical_form.to_string()))?;
    let mut payload = [0u8; 16];
    payload[8..].copy_from_slice(&days.to_be_bytes());
    Ok(EncodedTerm::new(TermKind::DateInline, payload))
}

fn encode_triple_term(triple: &Triple<'_>, side_table: &SideTable) -> Result<EncodedTerm, EncodingError> {
    let s = encode_node(&triple.subject, side_table)?;
    let p = encode_node(&triple.predicate, side_table)?;
    let o = encode_node(&triple.object, side_table)?;

    let mut hash_input = [0u8; ENCODED_TERM_SIZE * 3];
    hash_input[0..17].copy_from_slice(&s.0);
    hash_input[17..34].copy_from_slice(&p.0);
    hash_input[34..51].copy_from_slice(&o.0);

    let payload = EncodedTerm::hash_payload(&hash_input);
    let term = EncodedTerm::new(TermKind::TripleTermHash, payload);
    metrics::counter!("encoder.side_table.write.count").increment(1);
    side_table.insert(
        term,
        SideTableValue::TripleTerm {
            subject: s,
            predicate: p,
            object: o,
        },
    );
    Ok(term)
}

/// A decoded term, owned because its data may have come from the side table
/// rather than from borrowed source text.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedTerm {
    /// The default graph.
    DefaultGraph,
    /// An IRI.
    NamedNode(String),
    /// A blank node label.
    BlankNode(String),
    /// A plain literal.
    PlainLiteral(String),
    /// A language-tagged literal.
    LangLiteral {
        /// Lexical form.
        value: String,
        /// BCP-47 language tag.
        language: String,
        /// Base direction, if any.
        direction: Option<Direction>,
    },
    /// A datatyped literal (including the numeric/temporal inline kinds,
    /// reconstructed back to their canonical lexical form).
    TypedLiteral {
        /// Lexical form.
        value: String,
        /// Datatype IRI.
        datatype: String,
    },
    /// A triple term.
    TripleTerm(Box<DecodedTerm>, Box<DecodedTerm>, Box<DecodedTerm>),
}

/// Decode an [`EncodedTerm`] back to its term data.
pub fn decode_term(term: &EncodedTerm, side_table: &SideTable) -> Result<DecodedTerm, DecodeError> {
    metrics::counter!("encoder.decode.count").increment(1);

    let result = decode_term_inner(term, side_table);

    match &result {
        Ok(_) => {
            tracing::trace!(tag = ?term.kind(), "decoded term");
        }
        Err(e) => {
            tracing::warn!(term = ?term, error = %e, "failed to decode term");
        }
    }

    result
}

fn decode_term_inner(term: &EncodedTerm, side_table: &SideTable) -> Result<DecodedTerm, DecodeError> {
    match term.kind()? {
        TermKind::DefaultGraph => Ok(DecodedTerm::DefaultGraph),

        TermKind::NamedNodeHash => match side_table.get(term) {
            Some(SideTableValue::Iri(iri)) => Ok(DecodedTerm::NamedNode(iri)),
            _ => Err(DecodeError::MissingSideTableEntry),
        },

        TermKind::BlankNodeInline => {
            let n = u64::from_be_bytes(term.payload()[8..16].try_into().unwrap());
            Ok(DecodedTerm::BlankNode(n.to_string()))
        }

        TermKind::BlankNodeHash => match side_table.get(term) {
            Some(SideTableValue::BlankLabel(label)) => Ok(DecodedTerm::BlankNode(label)),
            _ => Err(DecodeError::MissingSideTableEntry),
        },

        TermKind::PlainLiteralInline => {
            let payload = term.payload();
            let len = payload[0] as usize;
            let text = std::str::from_utf8(&payload[1..1 + len]).map_err(|_| DecodeError::InvalidUtf8)?;
            Ok(DecodedTerm::PlainLiteral(text.to_string()))
        }

        TermKind::PlainLiteralHash => match side_table.get(term) {
            Some(SideTableValue::PlainLiteral(s)) => Ok(DecodedTerm::PlainLiteral(s)),
            _ => Err(DecodeError::MissingSideTableEntry),
        },

        TermKind::LangLiteralHash => match side_table.get(term) {
            Some(SideTableValue::LangLiteral {
                value,
                language,
                direction,
            }) => Ok(DecodedTerm::LangLiteral {
                value,
                language,
                direction,
            }),
            _ => Err(DecodeError::MissingSideTableEntry),
        },

        TermKind::TypedLiteralHash => match side_table.get(term) {
            Some(SideTableValue::TypedLiteral { value, datatype }) => {
                Ok(DecodedTerm::TypedLiteral { value, datatype })
            }
            _ => Err(DecodeError::MissingSideTableEntry),
        },

        TermKind::IntegerInline => {
            let n = i64::from_be_bytes(term.payload()[8..16].try_into().unwrap());
            Ok(DecodedTerm::TypedLiteral {
                value: n.to_string(),
                datatype: crate::Vocabulary::XSD_INTEGER.to_string(),
            })
        }

        TermKind::DecimalInline => {
            let bits = u64::from_be_bytes(term.payload()[8..16].try_into().unwrap());
            let f = f64::from_bits(bits);
            Ok(DecodedTerm::TypedLiteral {
                value: crate::temporal::format_decimal(f),
                datatype: crate::Vocabulary::XSD_DECIMAL.to_string(),
            })
        }

        TermKind::DoubleInline => {
            let bits = u64::from_be_bytes(term.payload()[8..16].try_into().unwrap());
            let f = f64::from_bits(bits);
            Ok(DecodedTerm::TypedLiteral {
                value: format!("{:E}", f),
                datatype: crate::Vocabulary::XSD_DOUBLE.to_string(),
            })
        }

        TermKind::BooleanInline => {
            let b = term.payload()[0] != 0;
            Ok(DecodedTerm::TypedLiteral {
                value: b.to_string(),
                datatype: crate::Vocabulary::XSD_BOOLEAN.to_string(),
            })
        }

        TermKind::DateTimeInline => {
            let ns = i64::from_be_bytes(term.payload()[8..16].try_into().unwrap());
            Ok(DecodedTerm::TypedLiteral {
                value: crate::temporal::format_epoch_nanos(ns),
                datatype: crate::Vocabulary::XSD_DATETIME.to_string(),
            })
        }

        TermKind::DateInline => {
            let days = i64::from_be_bytes(term.payload()[8..16].try_into().unwrap());
            Ok(DecodedTerm::TypedLiteral {
                value: crate::temporal::format_epoch_days(days),
                datatype: crate::Vocabulary::XSD_DATE.to_string(),
            })
        }

        TermKind::TripleTermHash => match side_table.get(term) {
            Some(SideTableValue::TripleTerm {
                subject,
                predicate,
                object,
            }) => Ok(DecodedTerm::TripleTerm(
                Box::new(decode_term(&subject, side_table)?),
                Box::new(decode_term(&predicate, side_table)?),
                Box::new(decode_term(&object, side_table)?),
            )),
            _ => Err(DecodeError::MissingSideTableEntry),
        },
    }
}
