//! leanxml - Single-pass XML tree builder over caller-owned buffers
//!
//! One scan over the input produces an arena-backed tree whose names,
//! values and text are spans into the original buffer:
//! - Mutating mode: NUL terminators are written in place, spans double as C strings
//! - Read-only mode: the buffer is never written
//! - Forward or reverse child order, optional `prefix:tag` splitting
//!
//! ```
//! use leanxml::{parse, ParseOptions};
//!
//! let mut buf = b"<config><width>640</width></config>".to_vec();
//! let doc = parse(&mut buf, ParseOptions::default()).unwrap();
//! let root = doc.root().unwrap();
//! let width = doc.child_element(root, "width");
//! assert_eq!(doc.value_or(width, 0u32), 640);
//! ```

pub mod arena;
pub mod convert;
mod core;
pub mod dom;
pub mod error;
pub mod objmap;
pub mod options;
pub mod parallel;
pub mod print;

pub use arena::{AllocError, Arena};
pub use convert::FromText;
pub use crate::core::{parse, parse_read_only};
pub use dom::{AttrId, Attribute, Document, Element, Node, NodeId, NodeKind, Span};
pub use error::{Construct, ParseError, SyntaxError, SyntaxErrorKind};
pub use options::ParseOptions;
pub use print::{to_xml, write_xml, Style};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
