//! Buffer pool replacement policies for cache eviction.
//!
//! A policy is selected at compile time via Cargo features; exactly one must
//! be enabled. Both policies expose the same `PolicyState` surface, so the
//! buffer pool depends only on that interface:
//!
//! - `record_access(frame_idx, meta)`: called on every fetch hit and unpin
//! - `on_frame_assigned(frame_idx, meta)`: called when a page is installed
//! - `on_frame_freed(frame_idx, meta)`: called when a frame is evicted or
//!   deleted
//! - `choose_victim(meta) -> Option<frame_idx>`: picks an unpinned frame for
//!   reuse without unlinking it, so a failed victim flush leaves the policy
//!   state untouched
//!
//! # Available Policies
//!
//! - **LRU** (`replacement_lru`): exact least-recently-used order over an
//!   intrusive doubly-linked list. Best for workloads with temporal locality.
//! - **Clock** (`replacement_clock`): second-chance sweep over reference
//!   bits. Approximates LRU with lower bookkeeping overhead.

#[cfg(all(feature = "replacement_lru", feature = "replacement_clock"))]
compile_error!("Enable only one buffer replacement policy feature (LRU or Clock)");

#[cfg(not(any(feature = "replacement_lru", feature = "replacement_clock")))]
compile_error!("At least one buffer replacement policy feature must be enabled");

#[cfg(feature = "replacement_lru")]
mod lru;
#[cfg(feature = "replacement_lru")]
pub use lru::PolicyState;

#[cfg(feature = "replacement_clock")]
mod clock;
#[cfg(feature = "replacement_clock")]
pub use clock::PolicyState;
