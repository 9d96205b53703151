//! Navigation helpers over a parsed document
//!
//! Lookups by name and text access. Every comparison takes
//! `impl AsRef<[u8]>`, so `&str`, byte literals and `CStr::to_bytes()`
//! results all go through the same call.

use std::cmp::Ordering;

use super::document::Document;
use super::node::{AttrId, NodeId};

impl<'a> Document<'a> {
    /// Find an attribute of `node` by exact name
    pub fn attribute(&self, node: NodeId, name: impl AsRef<[u8]>) -> Option<AttrId> {
        let name = name.as_ref();
        self.attributes(node).find(|&a| self.attr_name(a) == name)
    }

    /// First child element of `node` whose local tag equals `tag`
    pub fn child_element(&self, node: NodeId, tag: impl AsRef<[u8]>) -> Option<NodeId> {
        let tag = tag.as_ref();
        self.child_elements(node).find(|&c| self.tag(c) == tag)
    }

    /// Next sibling element after `node` with the given local tag
    pub fn next_sibling_element(&self, node: NodeId, tag: impl AsRef<[u8]>) -> Option<NodeId> {
        let tag = tag.as_ref();
        let mut cur = self.next_sibling(node);
        while let Some(id) = cur {
            if self.element(id).is_some() && self.tag(id) == tag {
                return Some(id);
            }
            cur = self.next_sibling(id);
        }
        None
    }

    /// First text child of `node`
    pub fn first_text(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).find(|&c| self.is_text(c))
    }

    /// Next text sibling after `text`
    pub fn next_text(&self, text: NodeId) -> Option<NodeId> {
        let mut cur = self.next_sibling(text);
        while let Some(id) = cur {
            if self.is_text(id) {
                return Some(id);
            }
            cur = self.next_sibling(id);
        }
        None
    }

    /// Total length of the direct text children of `node`
    pub fn text_len(&self, node: NodeId) -> usize {
        self.children(node)
            .filter_map(|c| self.node(c)?.text_span())
            .map(|s| s.len())
            .sum()
    }

    /// Append the direct text children of `node` to `out`
    ///
    /// Returns the number of bytes appended.
    pub fn collect_text(&self, node: NodeId, out: &mut Vec<u8>) -> usize {
        let start = out.len();
        out.reserve(self.text_len(node));
        for child in self.children(node) {
            if let Some(text) = self.text(child) {
                out.extend_from_slice(text);
            }
        }
        out.len() - start
    }

    /// Local tag equals `name`
    #[inline]
    pub fn tag_eq(&self, node: NodeId, name: impl AsRef<[u8]>) -> bool {
        self.element(node).is_some() && self.tag(node) == name.as_ref()
    }

    /// Lexicographic byte comparison of the local tag against `name`
    #[inline]
    pub fn tag_cmp(&self, node: NodeId, name: impl AsRef<[u8]>) -> Ordering {
        self.tag(node).cmp(name.as_ref())
    }

    /// Text node content equals `value`
    #[inline]
    pub fn value_eq(&self, node: NodeId, value: impl AsRef<[u8]>) -> bool {
        self.text(node) == Some(value.as_ref())
    }

    /// Attribute value equals `value`
    #[inline]
    pub fn attr_value_eq(&self, attr: AttrId, value: impl AsRef<[u8]>) -> bool {
        self.attr(attr).is_some() && self.attr_value(attr) == value.as_ref()
    }

    #[inline]
    fn is_text(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.is_text())
    }
}
