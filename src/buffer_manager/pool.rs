//! The buffer pool manager proper: fetch/unpin/flush/new/delete over a fixed
//! set of frames, with eviction delegated to the configured replacement
//! policy and write-back delegated to the storage manager.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::{debug, trace};

use crate::error::PoolError;
use crate::page::PageId;
use crate::replacement::PolicyState;
use crate::storage::PageStore;

use super::{BufferFrame, BufferStats, FrameMeta, PageHandle};

/// All pool bookkeeping that must be observed atomically: the page table, the
/// frame metadata, the free list and the replacement policy state. Every
/// operation that touches any of these takes the one lock around it, so no
/// caller ever sees a half-updated pool.
struct PoolState {
    page_table: HashMap<PageId, usize>,
    free_frames: VecDeque<usize>,
    meta: Vec<FrameMeta>,
    policy: PolicyState,
    next_page_id: PageId,
}

/// The buffer pool manager. Mediates all page access between callers and the
/// storage manager, guaranteeing that pinned pages are never evicted and that
/// dirty pages are written back before their frame is reused.
pub struct BufferPool {
    storage: Arc<dyn PageStore>,
    frames: Vec<Arc<BufferFrame>>,
    state: Mutex<PoolState>,
    stats: OnceLock<Arc<BufferStats>>,
}

impl BufferPool {
    /// Create a pool of `num_frames` frames over the given storage manager.
    ///
    /// Fresh page ids handed out by [`BufferPool::new_page`] start past the
    /// store's current extent so reopening an existing file never clobbers
    /// its pages.
    pub fn new(storage: Arc<dyn PageStore>, num_frames: usize) -> Result<Self, PoolError> {
        let frames = (0..num_frames)
            .map(|index| Arc::new(BufferFrame::new(index)))
            .collect();
        let next_page_id = storage.num_pages()?;
        Ok(Self {
            storage,
            frames,
            state: Mutex::new(PoolState {
                page_table: HashMap::new(),
                free_frames: (0..num_frames).collect(),
                meta: (0..num_frames).map(|_| FrameMeta::new()).collect(),
                policy: PolicyState::new(num_frames),
                next_page_id,
            }),
            stats: OnceLock::new(),
        })
    }

    pub fn enable_stats(&self) {
        let _ = self.stats.set(Arc::new(BufferStats::new()));
    }

    pub fn stats(&self) -> Option<&Arc<BufferStats>> {
        self.stats.get()
    }

    /// Number of frames in the pool.
    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    /// Number of pages currently resident.
    pub fn resident_pages(&self) -> usize {
        self.state.lock().unwrap().page_table.len()
    }

    /// Number of unpinned frames, that is frames eligible for reuse.
    pub fn available(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.meta.iter().filter(|m| !m.is_pinned()).count()
    }

    /// Current pin count of a resident page, or None if not resident.
    pub fn pin_count(&self, page_id: PageId) -> Option<usize> {
        let state = self.state.lock().unwrap();
        state
            .page_table
            .get(&page_id)
            .map(|&frame_idx| state.meta[frame_idx].pins)
    }

    /// Return a pinned handle to the page identified by `page_id`.
    ///
    /// On a hit no I/O occurs. On a miss a free frame (or an evicted victim)
    /// is loaded from storage. Fails with [`PoolError::CapacityExhausted`]
    /// when every frame is pinned, and with [`PoolError::Io`] when the read
    /// fails, in which case the frame goes back to the free list and no page
    /// table entry is created.
    pub fn fetch_page(&self, page_id: PageId) -> Result<PageHandle<'_>, PoolError> {
        let mut state = self.state.lock().unwrap();

        if let Some(&frame_idx) = state.page_table.get(&page_id) {
            let PoolState { policy, meta, .. } = &mut *state;
            policy.record_access(frame_idx, meta);
            meta[frame_idx].pin();
            if let Some(stats) = self.stats.get() {
                stats
                    .hits
                    .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            }
            trace!(page_id, frame_idx, "buffer pool hit");
            return Ok(self.handle(page_id, frame_idx));
        }

        if let Some(stats) = self.stats.get() {
            stats
                .misses
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }

        let frame_idx = self.take_frame(&mut state)?;
        {
            let mut page = self.frames[frame_idx].write_page();
            if let Err(e) = self.storage.read_page(page_id, &mut page) {
                drop(page);
                state.free_frames.push_front(frame_idx);
                debug!(page_id, frame_idx, error = %e, "page load failed, frame returned to free list");
                return Err(e);
            }
        }
        self.install(&mut state, frame_idx, page_id, false);
        trace!(page_id, frame_idx, "buffer pool miss, page loaded");
        Ok(self.handle(page_id, frame_idx))
    }

    /// Release one pin on `page_id`, optionally marking it dirty.
    ///
    /// Dirtiness is sticky: once a page is marked dirty only a successful
    /// flush clears it, never a later `mark_dirty = false` unpin. Fails with
    /// [`PoolError::InvalidPage`] when the page is not resident or has no
    /// outstanding pins; an unbalanced unpin is a caller bug, not a transient
    /// condition.
    pub fn unpin_page(&self, page_id: PageId, mark_dirty: bool) -> Result<(), PoolError> {
        let mut state = self.state.lock().unwrap();
        let Some(&frame_idx) = state.page_table.get(&page_id) else {
            return Err(PoolError::InvalidPage(page_id));
        };
        let PoolState { policy, meta, .. } = &mut *state;
        if !meta[frame_idx].is_pinned() {
            return Err(PoolError::InvalidPage(page_id));
        }
        if mark_dirty {
            meta[frame_idx].dirty = true;
        }
        let became_unpinned = meta[frame_idx].unpin();
        policy.record_access(frame_idx, meta);
        if became_unpinned {
            trace!(page_id, frame_idx, "page fully unpinned, eligible for eviction");
        }
        Ok(())
    }

    /// Write a resident page back to storage if it is dirty.
    ///
    /// A clean page is a no-op. On write failure the dirty flag is left set
    /// so a later flush retries. Fails with [`PoolError::InvalidPage`] when
    /// the page is not resident.
    pub fn flush_page(&self, page_id: PageId) -> Result<(), PoolError> {
        let mut state = self.state.lock().unwrap();
        let Some(&frame_idx) = state.page_table.get(&page_id) else {
            return Err(PoolError::InvalidPage(page_id));
        };
        self.flush_frame(&mut state, page_id, frame_idx)
    }

    /// Flush every dirty resident page. Used at clean shutdown.
    pub fn flush_all(&self) -> Result<(), PoolError> {
        let mut state = self.state.lock().unwrap();
        let resident: Vec<(PageId, usize)> = state
            .page_table
            .iter()
            .map(|(&page_id, &frame_idx)| (page_id, frame_idx))
            .collect();
        for (page_id, frame_idx) in resident {
            self.flush_frame(&mut state, page_id, frame_idx)?;
        }
        Ok(())
    }

    /// Allocate a fresh page id, install a zeroed page for it pinned and
    /// dirty, and return both.
    ///
    /// Page ids increase monotonically and are never reused within the
    /// process lifetime. Fails with [`PoolError::CapacityExhausted`] under
    /// the same conditions as [`BufferPool::fetch_page`].
    pub fn new_page(&self) -> Result<(PageId, PageHandle<'_>), PoolError> {
        let mut state = self.state.lock().unwrap();
        let frame_idx = self.take_frame(&mut state)?;
        let page_id = state.next_page_id;
        state.next_page_id += 1;
        self.frames[frame_idx].write_page().clear();
        //  a new page is logically dirty until written back
        self.install(&mut state, frame_idx, page_id, true);
        debug!(page_id, frame_idx, "new page allocated");
        Ok((page_id, self.handle(page_id, frame_idx)))
    }

    /// Drop a page from the pool, discarding any unflushed modifications.
    ///
    /// Fails with [`PoolError::PageInUse`] while the page is pinned.
    /// Deleting a page that is not resident is a no-op: the post-condition
    /// already holds.
    pub fn delete_page(&self, page_id: PageId) -> Result<(), PoolError> {
        let mut state = self.state.lock().unwrap();
        let Some(&frame_idx) = state.page_table.get(&page_id) else {
            return Ok(());
        };
        if state.meta[frame_idx].is_pinned() {
            return Err(PoolError::PageInUse(page_id));
        }
        state.page_table.remove(&page_id);
        let PoolState {
            policy,
            meta,
            free_frames,
            ..
        } = &mut *state;
        policy.on_frame_freed(frame_idx, meta);
        meta[frame_idx].page_id = None;
        //  deleted data is discarded, not written back
        meta[frame_idx].dirty = false;
        free_frames.push_back(frame_idx);
        debug!(page_id, frame_idx, "page deleted from pool");
        Ok(())
    }

    /// Obtain a frame for a new occupant: an unoccupied slot if one exists,
    /// otherwise an eviction victim chosen by the replacement policy.
    ///
    /// A dirty victim is flushed synchronously before its frame is handed
    /// out; if that flush fails the eviction is aborted and the victim stays
    /// resident exactly as it was.
    fn take_frame(&self, state: &mut PoolState) -> Result<usize, PoolError> {
        if let Some(frame_idx) = state.free_frames.pop_front() {
            return Ok(frame_idx);
        }

        let PoolState {
            policy,
            meta,
            page_table,
            ..
        } = state;
        let victim = policy
            .choose_victim(meta)
            .ok_or(PoolError::CapacityExhausted)?;
        let old_page_id = meta[victim].page_id.expect("victim frame must hold a page");

        if meta[victim].dirty {
            let page = self.frames[victim].read_page();
            if let Err(e) = self.storage.write_page(old_page_id, page.as_slice()) {
                debug!(page_id = old_page_id, frame_idx = victim, error = %e, "victim flush failed, eviction aborted");
                return Err(e);
            }
            meta[victim].dirty = false;
        }

        policy.on_frame_freed(victim, meta);
        meta[victim].page_id = None;
        page_table.remove(&old_page_id);
        debug!(page_id = old_page_id, frame_idx = victim, "page evicted");
        Ok(victim)
    }

    /// Record a page as resident in `frame_idx`, pinned once. The page table
    /// entry and the frame metadata are updated under the same lock hold, so
    /// they can never disagree.
    fn install(&self, state: &mut PoolState, frame_idx: usize, page_id: PageId, dirty: bool) {
        state.page_table.insert(page_id, frame_idx);
        let PoolState { policy, meta, .. } = state;
        meta[frame_idx].page_id = Some(page_id);
        meta[frame_idx].dirty = dirty;
        let newly_pinned = meta[frame_idx].pin();
        debug_assert!(newly_pinned, "freshly installed frame must have zero pins");
        policy.on_frame_assigned(frame_idx, meta);
    }

    fn flush_frame(
        &self,
        state: &mut PoolState,
        page_id: PageId,
        frame_idx: usize,
    ) -> Result<(), PoolError> {
        if !state.meta[frame_idx].dirty {
            return Ok(());
        }
        {
            let page = self.frames[frame_idx].read_page();
            //  on failure the dirty flag stays set so the flush can be retried
            self.storage.write_page(page_id, page.as_slice())?;
        }
        state.meta[frame_idx].dirty = false;
        debug!(page_id, frame_idx, "page flushed");
        Ok(())
    }

    fn handle(&self, page_id: PageId, frame_idx: usize) -> PageHandle<'_> {
        PageHandle::new(self, Arc::clone(&self.frames[frame_idx]), page_id)
    }

    #[cfg(test)]
    pub(crate) fn assert_pool_invariants(&self) {
        let state = self.state.lock().unwrap();
        assert_eq!(
            state.page_table.len() + state.free_frames.len(),
            self.frames.len(),
            "every frame must be either occupied or free"
        );
        for (&page_id, &frame_idx) in &state.page_table {
            assert_eq!(
                state.meta[frame_idx].page_id,
                Some(page_id),
                "page table and frame metadata disagree for page {}",
                page_id
            );
            assert_eq!(self.frames[frame_idx].index(), frame_idx);
        }
        for &frame_idx in &state.free_frames {
            assert!(state.meta[frame_idx].page_id.is_none());
            assert_eq!(state.meta[frame_idx].pins, 0);
        }
    }

    #[cfg(test)]
    pub(crate) fn is_dirty(&self, page_id: PageId) -> Option<bool> {
        let state = self.state.lock().unwrap();
        state
            .page_table
            .get(&page_id)
            .map(|&frame_idx| state.meta[frame_idx].dirty)
    }
}
