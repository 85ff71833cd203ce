//! RFC 3986 IRI reference resolution.
//!
//! Turtle/TriG/N-Triples/N-Quads all resolve relative IRI references against
//! a current base using the same algorithm (RFC 3986 §5.3), including
//! dot-segment normalisation (RFC 3986 §5.2.4). This is the one piece of the
//! parser family that has nothing to do with RDF syntax, so it lives on its
//! own rather than inside [`crate::engine`].

use bumpalo::Bump;

/// An IRI reference resolution failed because it was relative and no base
/// was available to resolve it against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoBaseError;

struct Components<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

fn is_scheme_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

/// True if `iri` begins with a valid URI scheme (`scheme:`), i.e. it is
/// already an absolute IRI reference and needs no base to resolve.
pub fn has_scheme(iri: &str) -> bool {
    let mut chars = iri.char_indices();
    match chars.next() {
        Some((_, c)) if is_scheme_start(c) => {}
        _ => return false,
    }
    for (i, c) in chars {
        if c == ':' {
            return i > 0;
        }
        if !is_scheme_char(c) {
            return false;
        }
    }
    false
}

fn parse_components(iri: &str) -> Components<'_> {
    let (fragment, rest) = match iri.find('#') {
        Some(i) => (Some(&iri[i + 1..]), &iri[..i]),
        None => (None, iri),
    };
    let (query, rest) = match rest.find('?') {
        Some(i) => (Some(&rest[i + 1..]), &rest[..i]),
        None => (None, rest),
    };
    let (scheme, rest) = if has_scheme(rest) {
        let i = rest.find(':').unwrap();
        (Some(&rest[..i]), &rest[i + 1..])
    } else {
        (None, rest)
    };
    let (authority, path) = if let Some(after) = rest.strip_prefix("//") {
        match after.find('/') {
            Some(i) => (Some(&after[..i]), &after[i..]),
            None => (Some(after), ""),
        }
    } else {
        (None, rest)
    };
    Components {
        scheme,
        authority,
        path,
        query,
        fragment,
    }
}

/// RFC 3986 §5.2.4 `remove_dot_segments`.
fn remove_dot_segments_impl(path: &str) -> String {
    let mut input = path.to_string();
    let mut output = String::new();

    while !input.is_empty() {
        if input.starts_with("../") {
            input.replace_range(0..3, "");
        } else if input.starts_with("./") {
            input.replace_range(0..2, "");
        } else if input.starts_with("/./") {
            input.replace_range(0..2, "");
        } else if input == "/." {
            input.replace_range(0..2, "/");
        } else if input.starts_with("/../") {
            input.replace_range(0..3, "");
            remove_last_segment(&mut output);
        } else if input == "/.." {
            input.replace_range(0..3, "/");
            remove_last_segment(&mut output);
        } else if input == "." || input == ".." {
            input.clear();
        } else {
            // Move the first path segment (including a leading "/" if present)
            // from input to output.
            let start = if input.starts_with('/') { 1 } else { 0 };
            let end = input[start..]
                .find('/')
                .map(|i| i + start)
                .unwrap_or(input.len());
            output.push_str(&input[..end]);
            input.replace_range(0..end, "");
        }
    }
    output
}

fn remove_last_segment(output: &mut String) {
    if let Some(pos) = output.rfind('/') {
        output.truncate(pos);
    } else {
        output.clear();
    }
}

fn merge(base: &Components<'_>, reference_path: &str) -> String {
    if base.authority.is_some() && base.path.is_empty() {
        format!("/{}", reference_path)
    } else {
        match base.path.rfind('/') {
            Some(pos) => format!("{}{}", &base.path[..=pos], reference_path),
            None => reference_path.to_string(),
        }
    }
}

fn render(
    scheme: Option<&str>,
    authority: Option<&str>,
    path: &str,
    query: Option<&str>,
    fragment: Option<&str>,
) -> String {
    let mut out = String::new();
    if let Some(s) = scheme {
        out.push_str(s);
        out.push(':');
    }
    if let Some(a) = authority {
        out.push_str("//");
        out.push_str(a);
    }
    out.push_str(path);
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    if let Some(f) = fragment {
        out.push('#');
        out.push_str(f);
    }
    out
}

/// Resolve `reference` against `base` per RFC 3986 §5.3, allocating the
/// result into `arena`. If `reference` is already absolute (has a scheme),
/// `base` is not consulted and may be `None`.
pub fn resolve<'a>(
    base: Option<&str>,
    reference: &str,
    arena: &'a Bump,
) -> Result<&'a str, NoBaseError> {
    if has_scheme(reference) {
        // Still worth normalising dot segments in the path for determinism.
        let r = parse_components(reference);
        let path = remove_dot_segments_impl(r.path);
        return Ok(arena.alloc_str(&render(r.scheme, r.authority, &path, r.query, r.fragment)));
    }

    let base = base.ok_or(NoBaseError)?;
    let b = parse_components(base);
    let r = parse_components(reference);

    let (scheme, authority, path, query);
    if r.authority.is_some() {
        authority = r.authority;
        path = remove_dot_segments_impl(r.path);
        query = r.query;
    } else if r.path.is_empty() {
        authority = b.authority;
        path = b.path.to_string();
        query = r.query.or(b.query);
    } else if r.path.starts_with('/') {
        authority = b.authority;
        path = remove_dot_segments_impl(r.path);
        query = r.query;
    } else {
        authority = b.authority;
        path = remove_dot_segments_impl(&merge(&b, r.path));
        query = r.query;
    }
    scheme = b.scheme;

    Ok(arena.alloc_str(&render(scheme, authority, &path, query, r.fragment)))
}
