//! Paged Arena
//!
//! Append-only record storage used by the parser:
//! - Fixed-capacity pages; the newest page is the current page
//! - Requests larger than a page get an oversized page of their own
//! - Slots are addressed by u32 indices, never by reference
//! - Nothing is freed individually; the whole chain drops together

use std::mem::size_of;
use thiserror::Error;

/// Default page size in bytes (page bookkeeping is taken out of this)
pub const DEFAULT_PAGE_BYTES: usize = 32 * 1024;

/// Page memory could not be reserved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("arena could not reserve {requested} bytes")]
pub struct AllocError {
    /// Size of the failed reservation in bytes
    pub requested: usize,
}

/// A contiguous run of slots returned by [`Arena::alloc_run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Run {
    /// Index of the first slot
    pub start: u32,
    /// Number of slots
    pub len: u32,
}

/// One page of the chain
struct Page<T> {
    /// Global index of the first slot in this page
    base: u32,
    /// Slot capacity (never exceeded, so `slots` never reallocates)
    capacity: usize,
    slots: Vec<T>,
}

impl<T> Page<T> {
    #[inline]
    fn remaining(&self) -> usize {
        self.capacity - self.slots.len()
    }

    #[inline]
    fn end(&self) -> u32 {
        self.base + self.slots.len() as u32
    }
}

/// Number of `T` slots that fit in a page of `page_bytes`
fn slots_per_page<T>(page_bytes: usize) -> usize {
    let net = page_bytes.saturating_sub(size_of::<Page<T>>());
    match size_of::<T>() {
        0 => net.max(1),
        size => (net / size).max(1),
    }
}

/// Growable chain of fixed-capacity pages
///
/// Indices handed out by [`alloc`](Arena::alloc) and
/// [`alloc_run`](Arena::alloc_run) are dense and increasing across pages,
/// and stay valid until the arena is dropped.
pub struct Arena<T> {
    pages: Vec<Page<T>>,
    page_slots: usize,
    len: u32,
}

impl<T> Arena<T> {
    /// Create an arena with the default page size
    pub fn new() -> Self {
        Self::with_page_bytes(DEFAULT_PAGE_BYTES)
    }

    /// Create an arena whose regular pages hold roughly `page_bytes` bytes
    pub fn with_page_bytes(page_bytes: usize) -> Self {
        Arena {
            pages: Vec::new(),
            page_slots: slots_per_page::<T>(page_bytes),
            len: 0,
        }
    }

    /// Store a record and return its index
    pub fn alloc(&mut self, value: T) -> Result<u32, AllocError> {
        let page = self.page_for(1)?;
        let id = page.end();
        page.slots.push(value);
        self.len += 1;
        Ok(id)
    }

    /// Reserve `len` contiguous default-initialized slots
    ///
    /// For `Arena<u8>` this is a zeroed byte span.
    pub fn alloc_run(&mut self, len: usize) -> Result<Run, AllocError>
    where
        T: Default,
    {
        let page = self.page_for(len)?;
        let start = page.end();
        page.slots.extend(std::iter::repeat_with(T::default).take(len));
        self.len += len as u32;
        Ok(Run {
            start,
            len: len as u32,
        })
    }

    /// Current page if it has room for `count` slots, a fresh one otherwise
    fn page_for(&mut self, count: usize) -> Result<&mut Page<T>, AllocError> {
        let needs_page = match self.pages.last() {
            Some(page) => page.remaining() < count,
            None => true,
        };
        if needs_page {
            self.push_page(count)?;
        }
        let current = self.pages.len() - 1;
        Ok(&mut self.pages[current])
    }

    fn push_page(&mut self, count: usize) -> Result<(), AllocError> {
        let capacity = self.page_slots.max(count);
        let requested = capacity.saturating_mul(size_of::<T>());

        // Indices are u32
        if (self.len as usize).saturating_add(count) > u32::MAX as usize {
            return Err(AllocError { requested });
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| AllocError { requested })?;
        self.pages
            .try_reserve(1)
            .map_err(|_| AllocError { requested })?;

        log::trace!(
            "arena: page {} opened with {} slots{}",
            self.pages.len(),
            capacity,
            if capacity > self.page_slots { " (oversized)" } else { "" }
        );

        self.pages.push(Page {
            base: self.len,
            capacity,
            slots,
        });
        Ok(())
    }

    /// Find the page holding `id` and the slot offset inside it
    #[inline]
    fn locate(&self, id: u32) -> Option<(usize, usize)> {
        // Fast path: most lookups during parsing hit the current page
        if let Some(last) = self.pages.last() {
            if id >= last.base {
                return (id < last.end()).then(|| (self.pages.len() - 1, (id - last.base) as usize));
            }
        }
        let index = self.pages.partition_point(|p| p.base <= id).checked_sub(1)?;
        let page = &self.pages[index];
        (id < page.end()).then(|| (index, (id - page.base) as usize))
    }

    /// Get a record by index
    #[inline]
    pub fn get(&self, id: u32) -> Option<&T> {
        let (page, offset) = self.locate(id)?;
        self.pages[page].slots.get(offset)
    }

    /// Get a mutable record by index
    #[inline]
    pub fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        let (page, offset) = self.locate(id)?;
        self.pages[page].slots.get_mut(offset)
    }

    /// Slots of a run (empty if the run did not come from this arena)
    pub fn run(&self, run: Run) -> &[T] {
        match self.run_bounds(run) {
            Some((page, start, end)) => &self.pages[page].slots[start..end],
            None => &[],
        }
    }

    /// Mutable slots of a run
    pub fn run_mut(&mut self, run: Run) -> &mut [T] {
        match self.run_bounds(run) {
            Some((page, start, end)) => &mut self.pages[page].slots[start..end],
            None => &mut [],
        }
    }

    fn run_bounds(&self, run: Run) -> Option<(usize, usize, usize)> {
        if run.len == 0 {
            return None;
        }
        let (page, start) = self.locate(run.start)?;
        let end = start + run.len as usize;
        (end <= self.pages[page].slots.len()).then_some((page, start, end))
    }

    /// Number of slots handed out
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Check if nothing has been allocated
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of pages in the chain
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Bytes reserved by all pages, bookkeeping included
    pub fn allocated_bytes(&self) -> usize {
        self.pages
            .iter()
            .map(|p| p.capacity * size_of::<T>() + size_of::<Page<T>>())
            .sum()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("len", &self.len)
            .field("pages", &self.pages.len())
            .field("page_slots", &self.page_slots)
            .finish()
    }
}
