//! Storage manager: translates logical page identifiers into byte offsets and
//! issues fixed-size reads and writes through the disk layer. No caching, no
//! concurrency control of its own.

use crate::disk::DiskManager;
use crate::error::PoolError;
use crate::page::{Page, PageId, PAGE_SIZE};

/// The page-granular storage interface consumed by the buffer pool. Keeping
/// this a trait lets tests substitute recording or failing doubles for the
/// real [`StorageManager`].
pub trait PageStore: Send + Sync {
    /// Read the page identified by `page_id` into `page`. Pages beyond the
    /// current file extent read as all-zero.
    fn read_page(&self, page_id: PageId, page: &mut Page) -> Result<(), PoolError>;

    /// Write exactly one page of bytes at `page_id`'s offset. `bytes` must be
    /// exactly [`PAGE_SIZE`] long.
    fn write_page(&self, page_id: PageId, bytes: &[u8]) -> Result<(), PoolError>;

    /// Number of pages currently covered by the backing store, rounding a
    /// trailing partial page up.
    fn num_pages(&self) -> Result<u64, PoolError>;
}

/// Storage manager over a single linear page address space.
pub struct StorageManager {
    disk: Box<dyn DiskManager>,
}

impl StorageManager {
    pub fn new(disk: Box<dyn DiskManager>) -> Self {
        Self { disk }
    }

    fn page_offset(page_id: PageId) -> Result<u64, PoolError> {
        page_id
            .checked_mul(PAGE_SIZE as u64)
            .ok_or_else(|| PoolError::InvalidArgument(format!("page id {} out of range", page_id)))
    }
}

impl PageStore for StorageManager {
    fn read_page(&self, page_id: PageId, page: &mut Page) -> Result<(), PoolError> {
        let offset = Self::page_offset(page_id)?;
        self.disk.read_at(page.as_mut_slice(), offset)?;
        Ok(())
    }

    fn write_page(&self, page_id: PageId, bytes: &[u8]) -> Result<(), PoolError> {
        if bytes.len() != PAGE_SIZE {
            return Err(PoolError::InvalidArgument(format!(
                "page write requires {} bytes, got {}",
                PAGE_SIZE,
                bytes.len()
            )));
        }
        let offset = Self::page_offset(page_id)?;
        self.disk.write_at(bytes, offset)?;
        Ok(())
    }

    fn num_pages(&self) -> Result<u64, PoolError> {
        let len = self.disk.len()?;
        Ok(len.div_ceil(PAGE_SIZE as u64))
    }
}
