//! LRU (Least Recently Used) replacement policy.
//!
//! Classic LRU over an intrusive doubly-linked list threaded through the
//! pool's frame metadata: head = most recently used, tail = eviction
//! candidate.
//!
//! # Algorithm
//!
//! - On access: move the frame to the head
//! - On assignment: insert the frame at the head
//! - On victim selection: scan from the tail towards the head and return the
//!   first unpinned frame
//!
//! # Complexity
//!
//! - Access: O(1)
//! - Victim selection: O(n) worst case if most frames are pinned

use crate::buffer_manager::FrameMeta;
use crate::intrusive_dll::{IntrusiveList, IntrusiveNode};

/// LRU policy state. The list contains exactly the occupied frames, pinned or
/// not; victim selection skips pinned entries.
#[derive(Debug)]
pub struct PolicyState {
    list: IntrusiveList,
}

impl PolicyState {
    pub(crate) fn new(_num_frames: usize) -> Self {
        Self {
            list: IntrusiveList::new(),
        }
    }

    /// Records an access by promoting the frame to the head of the list.
    pub(crate) fn record_access(&mut self, frame_idx: usize, meta: &mut [FrameMeta]) {
        self.list.move_to_head(frame_idx, meta);
    }

    /// Links a newly assigned frame at the head as the most recently used.
    pub(crate) fn on_frame_assigned(&mut self, frame_idx: usize, meta: &mut [FrameMeta]) {
        self.list.push_head(frame_idx, meta);
    }

    /// Unlinks a frame that is being evicted or returned to the free list.
    pub(crate) fn on_frame_freed(&mut self, frame_idx: usize, meta: &mut [FrameMeta]) {
        self.list.remove(frame_idx, meta);
    }

    /// Selects the least recently used unpinned frame, leaving it linked.
    ///
    /// Returns None when every occupied frame is pinned.
    pub(crate) fn choose_victim(&mut self, meta: &mut [FrameMeta]) -> Option<usize> {
        let mut current = self.list.peek_tail();
        while let Some(frame_idx) = current {
            if meta[frame_idx].pins == 0 {
                return Some(frame_idx);
            }
            current = meta[frame_idx].prev();
        }
        None
    }
}
