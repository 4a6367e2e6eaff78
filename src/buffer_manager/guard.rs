use std::cell::Cell;
use std::sync::Arc;

use tracing::trace;

use crate::page::{Page, PageId};

use super::{BufferFrame, BufferPool};

/// A pinned page. The pin is held for the lifetime of the handle and released
/// on drop, so a page can never be evicted while code still holds a way to
/// reach its frame.
///
/// Mutating the page through [`PageHandle::write`] does not implicitly mark
/// it dirty; callers that modify contents must call [`PageHandle::mark_dirty`]
/// or the modification may be silently discarded at eviction.
pub struct PageHandle<'a> {
    pool: &'a BufferPool,
    frame: Arc<BufferFrame>,
    page_id: PageId,
    dirty: Cell<bool>,
}

impl<'a> PageHandle<'a> {
    pub(crate) fn new(pool: &'a BufferPool, frame: Arc<BufferFrame>, page_id: PageId) -> Self {
        Self {
            pool,
            frame,
            page_id,
            dirty: Cell::new(false),
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Read access to the page contents.
    pub fn read(&self) -> std::sync::RwLockReadGuard<'_, Page> {
        self.frame.read_page()
    }

    /// Write access to the page contents. Remember to call
    /// [`PageHandle::mark_dirty`] after modifying.
    pub fn write(&self) -> std::sync::RwLockWriteGuard<'_, Page> {
        self.frame.write_page()
    }

    /// Record that the page contents were modified through this handle. The
    /// flag is carried to the pool when the handle drops.
    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }
}

impl std::fmt::Debug for PageHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageHandle")
            .field("page_id", &self.page_id)
            .field("dirty", &self.dirty.get())
            .finish()
    }
}

impl Drop for PageHandle<'_> {
    fn drop(&mut self) {
        trace!(
            page_id = self.page_id,
            frame_idx = self.frame.index(),
            "pin released"
        );
        //  cannot fail: the page stays resident while this pin is held
        let _ = self.pool.unpin_page(self.page_id, self.dirty.get());
    }
}
