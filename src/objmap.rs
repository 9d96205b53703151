//! Declarative child lookup
//!
//! A table of tag names is matched against an element's children in one
//! pass; callbacks then run in table order.
//!
//! ```
//! use std::ops::ControlFlow;
//! use leanxml::objmap::{dispatch, ObjMapEntry};
//! use leanxml::{parse_read_only, ParseOptions};
//!
//! let doc = parse_read_only(b"<cfg><width>640</width></cfg>", ParseOptions::default()).unwrap();
//! let mut width = 0u32;
//! let mut entries = [ObjMapEntry::new("width").on_found(|doc, node| {
//!     width = doc.value_or(Some(node), 0);
//!     ControlFlow::Continue(())
//! })];
//! let _ = dispatch(&doc, doc.root().unwrap(), &mut entries);
//! drop(entries);
//! assert_eq!(width, 640);
//! ```

use std::fmt;
use std::ops::ControlFlow;

use crate::dom::{Document, NodeId};

type FoundFn<'f> = Box<dyn FnMut(&Document<'_>, NodeId) -> ControlFlow<()> + 'f>;
type MissingFn<'f> = Box<dyn FnMut(&Document<'_>) -> ControlFlow<()> + 'f>;

/// One row of an object map
pub struct ObjMapEntry<'f> {
    tag: &'f [u8],
    found: Option<NodeId>,
    on_found: Option<FoundFn<'f>>,
    on_missing: Option<MissingFn<'f>>,
}

impl<'f> ObjMapEntry<'f> {
    /// Entry matching children whose local tag is `tag`
    pub fn new<T: AsRef<[u8]> + ?Sized>(tag: &'f T) -> Self {
        ObjMapEntry {
            tag: tag.as_ref(),
            found: None,
            on_found: None,
            on_missing: None,
        }
    }

    /// Callback for the matched child
    pub fn on_found<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Document<'_>, NodeId) -> ControlFlow<()> + 'f,
    {
        self.on_found = Some(Box::new(f));
        self
    }

    /// Callback when no child matched
    pub fn on_missing<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Document<'_>) -> ControlFlow<()> + 'f,
    {
        self.on_missing = Some(Box::new(f));
        self
    }

    pub fn tag(&self) -> &'f [u8] {
        self.tag
    }

    /// Child matched by the last [`resolve`]
    pub fn found(&self) -> Option<NodeId> {
        self.found
    }
}

impl fmt::Debug for ObjMapEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjMapEntry")
            .field("tag", &String::from_utf8_lossy(self.tag))
            .field("found", &self.found)
            .field("on_found", &self.on_found.is_some())
            .field("on_missing", &self.on_missing.is_some())
            .finish()
    }
}

/// Match the children of `parent` against `entries`
///
/// Each child is tried against the unresolved entries; the first match
/// wins and that entry is not considered again. Resolved entries at either
/// edge of the table shrink the search window.
pub fn resolve(doc: &Document<'_>, parent: NodeId, entries: &mut [ObjMapEntry<'_>]) {
    for entry in entries.iter_mut() {
        entry.found = None;
    }

    let (mut start, mut end) = (0, entries.len());
    for child in doc.child_elements(parent) {
        if start == end {
            break;
        }
        let tag = doc.tag(child);
        let Some(offset) = entries[start..end]
            .iter()
            .position(|e| e.found.is_none() && e.tag == tag)
        else {
            continue;
        };
        entries[start + offset].found = Some(child);

        while start < end && entries[start].found.is_some() {
            start += 1;
        }
        while end > start && entries[end - 1].found.is_some() {
            end -= 1;
        }
    }
}

/// Resolve, then run callbacks in entry order until one breaks
pub fn dispatch(doc: &Document<'_>, parent: NodeId, entries: &mut [ObjMapEntry<'_>]) -> ControlFlow<()> {
    if doc.element(parent).is_none() {
        return ControlFlow::Continue(());
    }
    resolve(doc, parent, entries);

    for entry in entries.iter_mut() {
        let flow = match entry.found {
            Some(node) => match entry.on_found.as_mut() {
                Some(f) => f(doc, node),
                None => ControlFlow::Continue(()),
            },
            None => match entry.on_missing.as_mut() {
                Some(f) => f(doc),
                None => ControlFlow::Continue(()),
            },
        };
        if flow.is_break() {
            log::trace!("object map stopped at {:?}", String::from_utf8_lossy(entry.tag));
            return flow;
        }
    }
    ControlFlow::Continue(())
}
