use crate::page::PageId;

/// Errors surfaced by the page cache and its storage layers.
///
/// I/O failures are propagated unchanged and never retried internally; retry
/// policy belongs to the caller. `CapacityExhausted` is recoverable (release
/// pins and retry), the rest indicate caller protocol violations.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("no unpinned frame available for eviction")]
    CapacityExhausted,

    #[error("page {0} is not resident or has no outstanding pins")]
    InvalidPage(PageId),

    #[error("page {0} still has outstanding pins")]
    PageInUse(PageId),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl PoolError {
    /// True when the underlying cause was an I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(self, PoolError::Io(_))
    }
}
