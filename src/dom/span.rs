//! Span - offset and length into the source buffer
//!
//! Zero-copy reference to a portion of the input document.
//! Used for tag names, prefixes, attribute names/values, and text runs.

use std::ffi::CStr;

/// A span referencing a portion of the source buffer
///
/// Size: 8 bytes (offset: 4 bytes, len: 4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset into the source buffer
    pub offset: u32,
    /// Length in bytes
    pub len: u32,
}

impl Span {
    /// Create a new span
    #[inline]
    pub const fn new(offset: u32, len: u32) -> Self {
        Self { offset, len }
    }

    /// Span covering `start..end` (end exclusive)
    #[inline]
    pub(crate) fn between(start: usize, end: usize) -> Self {
        Self::new(start as u32, end.saturating_sub(start) as u32)
    }

    /// Create an empty span at `offset`
    #[inline]
    pub const fn empty(offset: u32) -> Self {
        Self { offset, len: 0 }
    }

    /// Check if this span is empty
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length in bytes
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Get the end offset (exclusive)
    #[inline]
    pub const fn end(&self) -> usize {
        self.offset as usize + self.len as usize
    }

    /// Extract the byte slice from input
    #[inline]
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        input.get(self.offset as usize..self.end()).unwrap_or(&[])
    }

    /// Extract as UTF-8 string from input
    #[inline]
    pub fn as_str<'a>(&self, input: &'a [u8]) -> Option<&'a str> {
        std::str::from_utf8(self.slice(input)).ok()
    }

    /// View as a C string, if the byte after the span is a NUL terminator
    pub fn as_cstr<'a>(&self, input: &'a [u8]) -> Option<&'a CStr> {
        let with_nul = input.get(self.offset as usize..=self.end())?;
        CStr::from_bytes_with_nul(with_nul).ok()
    }
}
