//! SIMD-accelerated cursor over the source buffer using memchr
//!
//! Uses memchr crate for fast byte searching with SIMD acceleration:
//! - SSE2 (default x86_64)
//! - AVX2 (runtime detection)
//! - NEON (aarch64)
//!
//! The scanner also owns the (possibly writable) buffer borrow, so it is the
//! only place that ever writes NUL terminators.

use memchr::{memchr, memchr3, memmem};

/// Buffer borrowed for the duration of a parse
enum Source<'a> {
    /// Writable buffer; terminators are written unless `mutate` is off
    Writable(&'a mut [u8]),
    /// Shared buffer; never written
    Shared(&'a [u8]),
}

/// Cursor over the source buffer
pub struct Scanner<'a> {
    source: Source<'a>,
    /// Logical end of input: first NUL byte or slice end
    end: usize,
    pos: usize,
    mutate: bool,
}

impl<'a> Scanner<'a> {
    /// Scanner over a writable buffer
    ///
    /// With `mutate` off the buffer is treated exactly like a shared one.
    pub fn writable(buf: &'a mut [u8], mutate: bool) -> Self {
        let end = memchr(0, buf).unwrap_or(buf.len());
        Scanner {
            source: Source::Writable(buf),
            end,
            pos: 0,
            mutate,
        }
    }

    /// Scanner over a shared buffer (never writes)
    pub fn shared(buf: &'a [u8]) -> Self {
        let end = memchr(0, buf).unwrap_or(buf.len());
        Scanner {
            source: Source::Shared(buf),
            end,
            pos: 0,
            mutate: false,
        }
    }

    /// Input up to the logical end
    #[inline]
    pub fn input(&self) -> &[u8] {
        match &self.source {
            Source::Writable(buf) => &buf[..self.end],
            Source::Shared(buf) => &buf[..self.end],
        }
    }

    /// Length of the logical input
    #[inline]
    pub fn len(&self) -> usize {
        self.end
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input().get(self.pos).copied()
    }

    /// Byte at an absolute position
    #[inline]
    pub fn byte_at(&self, pos: usize) -> Option<u8> {
        self.input().get(pos).copied()
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Move to an absolute position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Get a slice from start to end positions
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &[u8] {
        self.input().get(start..end).unwrap_or(&[])
    }

    /// Check if input starts with a byte sequence at current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input()[self.pos.min(self.end)..].starts_with(needle)
    }

    /// Find next occurrence of a specific byte
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        let from = self.pos.min(self.end);
        memchr(byte, &self.input()[from..]).map(|i| from + i)
    }

    /// Find next occurrence of any of three bytes
    #[inline]
    pub fn find_byte3(&self, b1: u8, b2: u8, b3: u8) -> Option<usize> {
        let from = self.pos.min(self.end);
        memchr3(b1, b2, b3, &self.input()[from..]).map(|i| from + i)
    }

    /// Find next '<' (tag start) using SIMD
    #[inline]
    pub fn find_tag_start(&self) -> Option<usize> {
        self.find_byte(b'<')
    }

    /// Find a multi-byte terminator such as `-->`
    #[inline]
    pub fn find_seq(&self, needle: &[u8]) -> Option<usize> {
        let from = self.pos.min(self.end);
        memmem::find(&self.input()[from..], needle).map(|i| from + i)
    }

    /// Overwrite an already consumed byte with a NUL terminator
    ///
    /// No-op in read-only mode. Positions at or past the cursor are left
    /// alone: those bytes have not been classified yet.
    #[inline]
    pub fn terminate(&mut self, at: usize) {
        if !self.mutate || at >= self.pos {
            return;
        }
        if let Source::Writable(buf) = &mut self.source {
            buf[at] = 0;
        }
    }

    /// Give back the buffer as a shared borrow for the document
    pub fn into_source(self) -> &'a [u8] {
        match self.source {
            Source::Writable(buf) => buf,
            Source::Shared(buf) => buf,
        }
    }
}

/// Whitespace that is insignificant between tags
#[inline]
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Quote bytes accepted around attribute names and values
#[inline]
pub fn is_quote(b: u8) -> bool {
    matches!(b, b'"' | b'\'' | b'`')
}
