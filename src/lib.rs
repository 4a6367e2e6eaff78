//! A buffer pool manager for fixed-size disk pages.
//!
//! The crate stacks three layers:
//!
//! - [`disk`]: positioned byte I/O against a file or an in-memory store
//! - [`storage`]: page-granular reads and writes over the disk layer
//! - [`buffer_manager`]: the pool itself, with pinning, dirty tracking and
//!   eviction under a configurable replacement policy
//!
//! The replacement policy is selected at compile time through cargo features
//! (`replacement_lru` is the default, `replacement_clock` the alternative).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pagepool::{BufferPool, FileDisk, StorageManager};
//!
//! # fn main() -> Result<(), pagepool::PoolError> {
//! let disk = FileDisk::open("app.db")?;
//! let storage = Arc::new(StorageManager::new(Box::new(disk)));
//! let pool = BufferPool::new(storage, 64)?;
//!
//! let (page_id, handle) = pool.new_page()?;
//! handle.write().set_string(0, "hello");
//! handle.mark_dirty();
//! drop(handle);
//!
//! let handle = pool.fetch_page(page_id)?;
//! assert_eq!(handle.read().get_string(0), "hello");
//! drop(handle);
//! pool.flush_all()?;
//! # Ok(())
//! # }
//! ```

pub mod buffer_manager;
pub mod disk;
pub mod error;
pub mod page;
pub mod replacement;
pub mod storage;
pub mod test_utils;

#[cfg(feature = "replacement_lru")]
mod intrusive_dll;

pub use buffer_manager::{BufferPool, BufferStats, PageHandle};
pub use disk::{DiskManager, FileDisk, MemoryDisk};
pub use error::PoolError;
pub use page::{Page, PageId, PAGE_SIZE};
pub use storage::{PageStore, StorageManager};
