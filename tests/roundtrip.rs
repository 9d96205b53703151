use leanxml::{parse, parse_read_only, to_xml, write_xml, Document, NodeId, ParseOptions, Style};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const CATALOG: &[u8] = include_bytes!("resources/catalog.xml");

/// Owned view of a subtree: tag, attribute set, children
#[derive(Debug, PartialEq, Eq)]
enum Shape {
    Element(String, Vec<(String, String)>, Vec<Shape>),
    Text(String),
}

fn shape(doc: &Document<'_>, id: NodeId) -> Shape {
    let lossy = |b: &[u8]| String::from_utf8_lossy(b).into_owned();
    if let Some(text) = doc.text(id) {
        return Shape::Text(lossy(text));
    }
    let mut attrs: Vec<_> = doc
        .attributes(id)
        .map(|a| (lossy(doc.attr_name(a)), lossy(doc.attr_value(a))))
        .collect();
    attrs.sort();
    let children = doc.children(id).map(|c| shape(doc, c)).collect();
    Shape::Element(lossy(doc.qualified_name(id)), attrs, children)
}

#[test]
fn test_compact_reparse_preserves_catalog() {
    let doc = parse_read_only(CATALOG, ParseOptions::default()).unwrap();
    let root = doc.root().unwrap();
    let printed = to_xml(&doc, root, Style::Compact);

    let again = parse_read_only(&printed, ParseOptions::default()).unwrap();
    assert_eq!(shape(&doc, root), shape(&again, again.root().unwrap()));

    // Printing is a fixed point after one pass
    assert_eq!(to_xml(&again, again.root().unwrap(), Style::Compact), printed);
}

#[test]
fn test_compact_after_mutating_parse_matches_read_only() {
    let read_only = parse_read_only(CATALOG, ParseOptions::default()).unwrap();
    let expected = to_xml(&read_only, read_only.root().unwrap(), Style::Compact);

    let mut buf = CATALOG.to_vec();
    let doc = parse(&mut buf, ParseOptions::default()).unwrap();
    assert_eq!(to_xml(&doc, doc.root().unwrap(), Style::Compact), expected);
}

#[test]
fn test_indented_reparse_keeps_elements() {
    let doc = parse_read_only(CATALOG, ParseOptions::default()).unwrap();
    let root = doc.root().unwrap();
    let mut printed = Vec::new();
    write_xml(&doc, root, Style::Annotated, &mut printed).unwrap();

    let again = parse_read_only(&printed, ParseOptions::default()).unwrap();
    assert_eq!(shape(&doc, root), shape(&again, again.root().unwrap()));
}

#[test]
fn test_reverse_document_prints_reversed_children() {
    let doc = parse_read_only(b"<r><a/><b/><c/></r>", ParseOptions::default().reverse(true)).unwrap();
    assert_eq!(to_xml(&doc, doc.root().unwrap(), Style::Compact), b"<r><c/><b/><a/></r>");
}

// ============================================================================
// Generated documents
// ============================================================================

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}(:[a-z][a-z0-9]{0,4})?"
}

fn attribute() -> impl Strategy<Value = String> {
    (
        "[a-z][a-z0-9_-]{0,6}",
        prop::sample::select(vec!['"', '\'', '`']),
        "[a-zA-Z0-9 .,;:#/=-]{0,10}",
    )
        .prop_map(|(name, q, value)| format!("{name}={q}{value}{q}"))
        .prop_filter("no trailing space before the quote", |a| !a[..a.len() - 1].ends_with(' '))
}

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9.,;!?'\"=/ -]{1,12}".prop_filter("not whitespace only", |t| !t.trim().is_empty())
}

/// Element whose children are other elements or text, never two adjacent
/// text runs (those would merge on re-parse)
fn element() -> impl Strategy<Value = String> {
    let leaf = (name(), prop::collection::vec(attribute(), 0..3))
        .prop_map(|(tag, attrs)| open_tag(&tag, &attrs, true));

    leaf.prop_recursive(4, 48, 6, |inner| {
        (
            name(),
            prop::collection::vec(attribute(), 0..3),
            prop::collection::vec((inner, prop::option::of(text())), 1..5),
        )
            .prop_map(|(tag, attrs, children)| {
                let mut out = open_tag(&tag, &attrs, false);
                for (child, trailing) in children {
                    out.push_str(&child);
                    if let Some(t) = trailing {
                        out.push_str(&t);
                    }
                }
                out.push_str(&format!("</{tag}>"));
                out
            })
    })
}

fn open_tag(tag: &str, attrs: &[String], empty: bool) -> String {
    let mut out = format!("<{tag}");
    for a in attrs {
        out.push(' ');
        out.push_str(a);
    }
    out.push_str(if empty { "/>" } else { ">" });
    out
}

proptest! {
    #[test]
    fn test_compact_print_is_identity(src in element()) {
        let doc = parse_read_only(src.as_bytes(), ParseOptions::default()).unwrap();
        let printed = to_xml(&doc, doc.root().unwrap(), Style::Compact);
        prop_assert_eq!(String::from_utf8(printed).unwrap(), src);
    }

    #[test]
    fn test_mutating_and_read_only_agree(src in element()) {
        let read_only = parse_read_only(src.as_bytes(), ParseOptions::default()).unwrap();
        let expected = shape(&read_only, read_only.root().unwrap());

        let mut buf = src.clone().into_bytes();
        let doc = parse(&mut buf, ParseOptions::default()).unwrap();
        prop_assert_eq!(shape(&doc, doc.root().unwrap()), expected);
    }

    #[test]
    fn test_reverse_is_mirror(src in element()) {
        let fwd = parse_read_only(src.as_bytes(), ParseOptions::default()).unwrap();
        let rev = parse_read_only(src.as_bytes(), ParseOptions::default().reverse(true)).unwrap();
        prop_assert_eq!(fwd.node_count(), rev.node_count());

        let top: Vec<_> = fwd.children(fwd.root().unwrap()).map(|id| shape(&fwd, id)).collect();
        let mirrored: Vec<_> = rev.children(rev.root().unwrap()).map(|id| shape(&rev, id)).collect();
        prop_assert_eq!(mirrored.len(), top.len());
        for (r, f) in mirrored.iter().zip(top.iter().rev()) {
            prop_assert_eq!(count_nodes(r), count_nodes(f));
        }
    }
}

fn count_nodes(shape: &Shape) -> usize {
    match shape {
        Shape::Text(_) => 1,
        Shape::Element(_, _, children) => 1 + children.iter().map(count_nodes).sum::<usize>(),
    }
}
