//! XML Document - arena-based tree over a borrowed buffer
//!
//! Document storage with:
//! - Paged arenas for nodes and attributes
//! - NodeId / AttrId handles for traversal
//! - Zero-copy names, values and text via spans into the source

use std::ffi::{CStr, CString};
use std::fmt;

use super::node::{AttrId, Attribute, Element, Node, NodeId};
use super::span::Span;
use crate::arena::Arena;
use crate::options::ParseOptions;

/// Parsed XML document
///
/// Holds a shared borrow of the source buffer for its whole lifetime;
/// dropping the document releases every arena page at once.
pub struct Document<'a> {
    /// Source buffer (NUL-terminated spans in mutating mode)
    source: &'a [u8],
    /// Node arena; slot 0 is the synthetic parse root
    nodes: Arena<Node>,
    /// Attribute arena
    attrs: Arena<Attribute>,
    /// Root element (first top-level node)
    root: Option<NodeId>,
    options: ParseOptions,
}

impl<'a> Document<'a> {
    pub(crate) fn from_parts(
        source: &'a [u8],
        nodes: Arena<Node>,
        attrs: Arena<Attribute>,
        root: Option<NodeId>,
        options: ParseOptions,
    ) -> Self {
        Document {
            source,
            nodes,
            attrs,
            root,
            options,
        }
    }

    /// Get the root element ID
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Options this document was parsed with
    #[inline]
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Get original input
    #[inline]
    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// Get a node by ID
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get an element payload by ID (None for text nodes)
    #[inline]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).and_then(Node::as_element)
    }

    /// Get an attribute by ID
    #[inline]
    pub fn attr(&self, id: AttrId) -> Option<&Attribute> {
        self.attrs.get(id.0)
    }

    /// Resolve a span against the source
    #[inline]
    pub fn bytes(&self, span: Span) -> &'a [u8] {
        span.slice(self.source)
    }

    /// Local tag name of an element (empty for text or unknown IDs)
    pub fn tag(&self, id: NodeId) -> &'a [u8] {
        match self.element(id) {
            Some(elem) => self.bytes(elem.tag),
            None => &[],
        }
    }

    /// Namespace prefix of an element, when split off
    pub fn prefix(&self, id: NodeId) -> Option<&'a [u8]> {
        self.element(id)?.prefix.map(|p| self.bytes(p))
    }

    /// Name as written in the source, prefix included
    pub fn qualified_name(&self, id: NodeId) -> &'a [u8] {
        match self.element(id) {
            Some(elem) => self.bytes(elem.qualified_span()),
            None => &[],
        }
    }

    /// Bytes of a text node
    pub fn text(&self, id: NodeId) -> Option<&'a [u8]> {
        self.node(id)?.text_span().map(|s| self.bytes(s))
    }

    /// Attribute name bytes
    pub fn attr_name(&self, id: AttrId) -> &'a [u8] {
        self.attr(id).map(|a| self.bytes(a.name)).unwrap_or(&[])
    }

    /// Attribute value bytes
    pub fn attr_value(&self, id: AttrId) -> &'a [u8] {
        self.attr(id).map(|a| self.bytes(a.value)).unwrap_or(&[])
    }

    /// Parent of a node
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Next sibling of a node
    #[inline]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.next_sibling
    }

    /// Borrow a span as a NUL-terminated C string
    ///
    /// Only available in mutating mode, where the parser wrote the
    /// terminator. Returns None in read-only mode or when the span was not
    /// terminated (halted parse, prefix spans).
    pub fn cstr(&self, span: Span) -> Option<&'a CStr> {
        if self.options.read_only {
            return None;
        }
        span.as_cstr(self.source)
    }

    /// Owned NUL-terminated copy of a span, for C interop in any mode
    pub fn to_cstring(&self, span: Span) -> Option<CString> {
        CString::new(self.bytes(span)).ok()
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> Children<'_, 'a> {
        let first = self.element(id).and_then(|e| e.first_child);
        Children { doc: self, next: first }
    }

    /// Iterate over the attributes of an element (reverse source order)
    pub fn attributes(&self, id: NodeId) -> Attributes<'_, 'a> {
        let first = self.element(id).and_then(|e| e.first_attr);
        Attributes { doc: self, next: first }
    }

    /// Iterate over all descendants of a node (depth-first, pre-order)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_, 'a> {
        let mut stack = Vec::new();
        if let Some(first) = self.element(id).and_then(|e| e.first_child) {
            stack.push(first);
        }
        Descendants { doc: self, stack }
    }

    /// Number of parsed nodes (the synthetic parse root is not counted)
    pub fn node_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Number of parsed attributes
    pub fn attribute_count(&self) -> usize {
        self.attrs.len()
    }

    /// Arena pages held by this document
    pub fn page_count(&self) -> usize {
        self.nodes.page_count() + self.attrs.page_count()
    }

    /// Bytes reserved by this document's arenas
    pub fn allocated_bytes(&self) -> usize {
        self.nodes.allocated_bytes() + self.attrs.allocated_bytes()
    }

    /// Iterate element children only, skipping text runs
    pub(crate) fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|&c| self.node(c).is_some_and(Node::is_element))
    }
}

impl fmt::Debug for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.root)
            .field("options", &self.options)
            .field("nodes", &self.node_count())
            .field("attributes", &self.attrs.len())
            .field("source_len", &self.source.len())
            .finish()
    }
}

/// Iterator over child nodes
pub struct Children<'d, 'a> {
    doc: &'d Document<'a>,
    next: Option<NodeId>,
}

impl Iterator for Children<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}

/// Iterator over an element's attributes
pub struct Attributes<'d, 'a> {
    doc: &'d Document<'a>,
    next: Option<AttrId>,
}

impl Iterator for Attributes<'_, '_> {
    type Item = AttrId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.attr(current).and_then(|a| a.next);
        Some(current)
    }
}

/// Iterator over descendant nodes (depth-first)
pub struct Descendants<'d, 'a> {
    doc: &'d Document<'a>,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if let Some(node) = self.doc.node(current) {
            // Sibling first so the child subtree is visited before it
            if let Some(next) = node.next_sibling {
                self.stack.push(next);
            }
            if let Some(child) = node.as_element().and_then(|e| e.first_child) {
                self.stack.push(child);
            }
        }
        Some(current)
    }
}
