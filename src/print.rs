//! XML printer
//!
//! Writes a subtree back out as markup. Spans are emitted raw, exactly as
//! they appear in the source, with the original attribute quotes.

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::dom::{Document, NodeId, NodeKind};

/// Output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Everything on one line, no added whitespace
    #[default]
    Compact,
    /// Element-only content on tab-indented lines
    Indented,
    /// Indented, preceded by a comment naming the node and parse options
    Annotated,
}

/// Serialize `node` and its subtree into `out`
pub fn write_xml<W: Write>(doc: &Document<'_>, node: NodeId, style: Style, mut out: W) -> io::Result<()> {
    let pretty = style != Style::Compact;
    if style == Style::Annotated {
        writeln!(out, "<!-- node {} options {} -->", node, describe_options(doc))?;
    }

    // Stack entries: Either entering a node or need to write closing tag
    enum StackEntry {
        /// Node, depth, on its own line
        Enter(NodeId, usize, bool),
        /// Element, depth, on its own line, content was inline
        Close(NodeId, usize, bool, bool),
    }

    let mut stack: Vec<StackEntry> = Vec::with_capacity(64);
    let mut children: Vec<NodeId> = Vec::new();
    stack.push(StackEntry::Enter(node, 0, pretty));

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Close(id, depth, block, inline) => {
                if !inline {
                    indent(&mut out, depth)?;
                }
                out.write_all(b"</")?;
                out.write_all(doc.qualified_name(id))?;
                out.write_all(b">")?;
                if block {
                    out.write_all(b"\n")?;
                }
            }
            StackEntry::Enter(id, depth, block) => {
                let Some(node) = doc.node(id) else {
                    continue;
                };
                let elem = match &node.kind {
                    NodeKind::Text(span) => {
                        out.write_all(doc.bytes(*span))?;
                        continue;
                    }
                    NodeKind::Element(elem) => elem,
                };

                if block {
                    indent(&mut out, depth)?;
                }
                out.write_all(b"<")?;
                out.write_all(doc.qualified_name(id))?;
                write_attributes(doc, id, &mut out)?;

                if elem.first_child.is_none() {
                    out.write_all(b"/>")?;
                    if block {
                        out.write_all(b"\n")?;
                    }
                    continue;
                }

                children.clear();
                children.extend(doc.children(id));
                let inline = !pretty || children.iter().any(|&c| doc.node(c).is_some_and(|n| n.is_text()));

                out.write_all(b">")?;
                if !inline {
                    out.write_all(b"\n")?;
                }

                // Push closing tag first (processed after children)
                stack.push(StackEntry::Close(id, depth, block, inline));
                for &child in children.iter().rev() {
                    stack.push(StackEntry::Enter(child, depth + 1, !inline));
                }
            }
        }
    }
    Ok(())
}

/// Serialize `node` into a new buffer
pub fn to_xml(doc: &Document<'_>, node: NodeId, style: Style) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1024);
    // Vec<u8> writes are infallible
    let _ = write_xml(doc, node, style, &mut buf);
    buf
}

fn write_attributes<W: Write>(doc: &Document<'_>, id: NodeId, out: &mut W) -> io::Result<()> {
    // Stored newest first
    let attrs: Vec<_> = doc.attributes(id).collect();
    for &attr_id in attrs.iter().rev() {
        let Some(attr) = doc.attr(attr_id) else {
            continue;
        };
        out.write_all(b" ")?;
        write_quoted(out, doc.bytes(attr.name), attr.name_quote)?;
        match attr.value_quote {
            Some(q) => {
                out.write_all(b"=")?;
                write_quoted(out, doc.bytes(attr.value), Some(q))?;
            }
            None if !attr.value.is_empty() => {
                out.write_all(b"=")?;
                out.write_all(doc.bytes(attr.value))?;
            }
            None => {}
        }
    }
    Ok(())
}

fn write_quoted<W: Write>(out: &mut W, bytes: &[u8], quote: Option<u8>) -> io::Result<()> {
    match quote {
        Some(q) => {
            out.write_all(&[q])?;
            out.write_all(bytes)?;
            out.write_all(&[q])
        }
        None => out.write_all(bytes),
    }
}

fn indent<W: Write>(out: &mut W, depth: usize) -> io::Result<()> {
    for _ in 0..depth {
        out.write_all(b"\t")?;
    }
    Ok(())
}

fn describe_options(doc: &Document<'_>) -> String {
    let options = doc.options();
    let mut s = String::new();
    for (on, name) in [
        (options.reverse, "reverse"),
        (options.prefixes, "prefixes"),
        (options.read_only, "read-only"),
    ] {
        if on {
            if !s.is_empty() {
                s.push('|');
            }
            s.push_str(name);
        }
    }
    if s.is_empty() {
        s.push_str("none");
    }
    let _ = write!(s, " ({} nodes)", doc.node_count());
    s
}
