//! Buffer pool manager: the page cache core.
//!
//! The pool owns a fixed array of frames, a page table mapping resident page
//! ids to frame indices, and the pin/dirty bookkeeping that keeps in-use
//! pages safe from eviction. All bookkeeping lives behind a single lock in
//! [`BufferPool`]; frame contents sit behind per-frame `RwLock`s so pinned
//! pages can be read and written without it.
//!
//! # Shared Types
//!
//! - `FrameMeta`: per-frame metadata (pins, resident page, dirty flag,
//!   replacement policy state)
//! - `BufferFrame`: a buffer pool frame holding one page's contents
//! - `BufferStats`: opt-in hit/miss statistics
//! - `PageHandle`: scoped pin guard returned by fetch/new

mod guard;
mod pool;

pub use guard::PageHandle;
pub use pool::BufferPool;

use std::sync::atomic::AtomicUsize;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::page::{Page, PageId};

#[cfg(feature = "replacement_lru")]
use crate::intrusive_dll::IntrusiveNode;

// ============================================================================
// FrameMeta
// ============================================================================

#[derive(Debug)]
pub(crate) struct FrameMeta {
    pub(crate) page_id: Option<PageId>,
    pub(crate) pins: usize,
    pub(crate) dirty: bool,
    #[cfg(feature = "replacement_lru")]
    pub(crate) prev_idx: Option<usize>,
    #[cfg(feature = "replacement_lru")]
    pub(crate) next_idx: Option<usize>,
    #[cfg(feature = "replacement_clock")]
    pub(crate) ref_bit: bool,
}

impl FrameMeta {
    pub(crate) fn new() -> Self {
        Self {
            page_id: None,
            pins: 0,
            dirty: false,
            #[cfg(feature = "replacement_lru")]
            prev_idx: None,
            #[cfg(feature = "replacement_lru")]
            next_idx: None,
            #[cfg(feature = "replacement_clock")]
            ref_bit: false,
        }
    }

    /// Increment the pin count. Returns true if the frame was previously
    /// unpinned.
    pub(crate) fn pin(&mut self) -> bool {
        let was_zero = self.pins == 0;
        self.pins += 1;
        was_zero
    }

    /// Decrement the pin count. Returns true if the frame became unpinned.
    pub(crate) fn unpin(&mut self) -> bool {
        assert!(self.pins > 0, "FrameMeta::unpin on zero pins");
        self.pins -= 1;
        self.pins == 0
    }

    pub(crate) fn is_pinned(&self) -> bool {
        self.pins > 0
    }
}

#[cfg(feature = "replacement_lru")]
impl IntrusiveNode for FrameMeta {
    fn prev(&self) -> Option<usize> {
        self.prev_idx
    }

    fn set_prev(&mut self, prev: Option<usize>) {
        self.prev_idx = prev
    }

    fn next(&self) -> Option<usize> {
        self.next_idx
    }

    fn set_next(&mut self, next: Option<usize>) {
        self.next_idx = next
    }
}

// ============================================================================
// BufferFrame
// ============================================================================

/// A fixed slot of the buffer pool holding one page's contents. The metadata
/// for the frame lives in the pool's state, under the pool lock; only the
/// byte contents are reachable through the frame itself.
#[derive(Debug)]
pub(crate) struct BufferFrame {
    index: usize,
    page: RwLock<Page>,
}

impl BufferFrame {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            page: RwLock::new(Page::new()),
        }
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn read_page(&self) -> RwLockReadGuard<'_, Page> {
        self.page.read().unwrap()
    }

    pub(crate) fn write_page(&self) -> RwLockWriteGuard<'_, Page> {
        self.page.write().unwrap()
    }
}

// ============================================================================
// BufferStats
// ============================================================================

/// Hit/miss statistics for the buffer pool.
#[derive(Debug)]
pub struct BufferStats {
    pub hits: AtomicUsize,
    pub misses: AtomicUsize,
}

impl Default for BufferStats {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferStats {
    pub fn new() -> Self {
        Self {
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn get(&self) -> (usize, usize) {
        (
            self.hits.load(std::sync::atomic::Ordering::Relaxed),
            self.misses.load(std::sync::atomic::Ordering::Relaxed),
        )
    }

    pub fn reset(&self) {
        self.hits.store(0, std::sync::atomic::Ordering::Relaxed);
        self.misses.store(0, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn hit_rate(&self) -> f64 {
        let (hits, misses) = self.get();
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}
