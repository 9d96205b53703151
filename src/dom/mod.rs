//! DOM Module - Arena-based XML Document
//!
//! Implements a compact tree over the caller's buffer using:
//! - Paged arenas for nodes and attributes
//! - NodeId / AttrId (u32) indices for cache-friendly traversal
//! - Offset+length spans instead of copied strings

pub mod document;
pub mod navigate;
pub mod node;
pub mod span;

pub use document::{Attributes, Children, Descendants, Document};
pub use node::{AttrId, Attribute, Element, Node, NodeId, NodeKind};
pub use span::Span;
