//! XML Node representation
//!
//! Nodes and attributes live in arenas and refer to each other through
//! compact u32 handles.

use std::fmt;

use super::span::Span;
use crate::options::ParseOptions;

/// Handle of a node in the document's node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

/// Handle of an attribute in the document's attribute arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrId(pub(crate) u32);

impl NodeId {
    /// Arena slot index
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl AttrId {
    /// Arena slot index
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Element {
    /// Local tag name (whole name when prefixes are not split)
    pub tag: Span,
    /// Namespace prefix, when split off
    pub prefix: Option<Span>,
    /// Head of the attribute list (reverse source order)
    pub first_attr: Option<AttrId>,
    /// Head of the child chain; None for a leaf element
    pub first_child: Option<NodeId>,
    /// Tail of the child chain
    pub last_child: Option<NodeId>,
}

impl Element {
    /// Span of the name as written in the source (`prefix:tag`)
    pub fn qualified_span(&self) -> Span {
        match self.prefix {
            Some(prefix) => Span::between(prefix.offset as usize, self.tag.end()),
            None => self.tag,
        }
    }
}

/// Node variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Element with attributes and children
    Element(Element),
    /// Literal text between tags
    Text(Span),
}

/// An XML node in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    /// Owning element (None for the document root)
    pub parent: Option<NodeId>,
    /// Next node in the parent's child chain
    pub next_sibling: Option<NodeId>,
    /// Options of the parse that produced this node
    pub flags: ParseOptions,
    pub kind: NodeKind,
}

impl Node {
    /// Create a new element node
    pub fn element(tag: Span, parent: Option<NodeId>, flags: ParseOptions) -> Self {
        Node {
            parent,
            next_sibling: None,
            flags,
            kind: NodeKind::Element(Element {
                tag,
                ..Element::default()
            }),
        }
    }

    /// Create a new text node
    pub fn text(span: Span, parent: Option<NodeId>, flags: ParseOptions) -> Self {
        Node {
            parent,
            next_sibling: None,
            flags,
            kind: NodeKind::Text(span),
        }
    }

    /// Check if this is an element node
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    /// Check if this is a text node
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(elem) => Some(elem),
            NodeKind::Text(_) => None,
        }
    }

    #[inline]
    pub(crate) fn as_element_mut(&mut self) -> Option<&mut Element> {
        match &mut self.kind {
            NodeKind::Element(elem) => Some(elem),
            NodeKind::Text(_) => None,
        }
    }

    /// Span of a text node
    #[inline]
    pub fn text_span(&self) -> Option<Span> {
        match self.kind {
            NodeKind::Text(span) => Some(span),
            NodeKind::Element(_) => None,
        }
    }

    /// Check if this node has children
    #[inline]
    pub fn has_children(&self) -> bool {
        self.as_element().is_some_and(|e| e.first_child.is_some())
    }

    /// Check if this node has attributes
    #[inline]
    pub fn has_attributes(&self) -> bool {
        self.as_element().is_some_and(|e| e.first_attr.is_some())
    }
}

/// Attribute record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attribute {
    pub name: Span,
    pub value: Span,
    /// Quote byte around the name, if it was quoted
    pub name_quote: Option<u8>,
    /// Quote byte around the value, if it was quoted
    pub value_quote: Option<u8>,
    /// Next attribute of the same element
    pub next: Option<AttrId>,
}
