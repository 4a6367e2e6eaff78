//! Disk I/O layer: positioned reads and writes of raw byte ranges against a
//! backing store. This layer knows nothing about pages or tuples; the storage
//! manager sits on top of it and imposes the page addressing scheme.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use std::sync::Mutex;

/// A byte-addressable random-access store supporting positioned read and
/// positioned write. The page cache does not assume any particular transport
/// beyond these operations.
pub trait DiskManager: Send + Sync {
    /// Fill `buf` from the store at `offset`. Reaching end-of-file before the
    /// buffer is full is not an error: the unread tail is left zero, which
    /// lets files grow lazily.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()>;

    /// Write all of `buf` at `offset`. A short write (disk full, truncation)
    /// is surfaced as an error, never as success.
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<()>;

    /// Current length of the store in bytes.
    fn len(&self) -> io::Result<u64>;
}

/// Disk manager over a single database file.
pub struct FileDisk {
    //  seek + read must be atomic with respect to other callers sharing the
    //  file handle
    file: Mutex<File>,
}

impl FileDisk {
    /// Open (creating if absent) the backing file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        Ok(Self::new(file))
    }

    pub fn new(file: File) -> Self {
        Self {
            file: Mutex::new(file),
        }
    }
}

impl DiskManager for FileDisk {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        let mut file = self.file.lock().unwrap();
        file.seek(io::SeekFrom::Start(offset))?;
        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        buf[filled..].fill(0);
        Ok(())
    }

    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<()> {
        let mut file = self.file.lock().unwrap();
        file.seek(io::SeekFrom::Start(offset))?;
        file.write_all(buf)
    }

    fn len(&self) -> io::Result<u64> {
        let file = self.file.lock().unwrap();
        Ok(file.metadata()?.len())
    }
}

/// In-memory disk manager used by tests and benchmarks.
pub struct MemoryDisk {
    data: Mutex<Vec<u8>>,
}

impl MemoryDisk {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(Vec::new()),
        }
    }
}

impl Default for MemoryDisk {
    fn default() -> Self {
        Self::new()
    }
}

impl DiskManager for MemoryDisk {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        let data = self.data.lock().unwrap();
        let offset = offset as usize;
        let available = data.len().saturating_sub(offset).min(buf.len());
        if available > 0 {
            buf[..available].copy_from_slice(&data[offset..offset + available]);
        }
        buf[available..].fill(0);
        Ok(())
    }

    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<()> {
        let mut data = self.data.lock().unwrap();
        let end = offset as usize + buf.len();
        if data.len() < end {
            data.resize(end, 0);
        }
        data[offset as usize..end].copy_from_slice(buf);
        Ok(())
    }

    fn len(&self) -> io::Result<u64> {
        Ok(self.data.lock().unwrap().len() as u64)
    }
}

#[cfg(test)]
mod disk_tests {
    use super::*;
    use crate::test_utils::TestDir;

    fn setup() -> (TestDir, FileDisk) {
        let dir = TestDir::new_unique();
        let disk = FileDisk::open(dir.as_ref().join("test.db")).unwrap();
        (dir, disk)
    }

    #[test]
    fn test_write_then_read_at_offset() {
        let (_dir, disk) = setup();
        disk.write_at(b"hello", 128).unwrap();

        let mut buf = [0u8; 5];
        disk.read_at(&mut buf, 128).unwrap();
        assert_eq!(&buf, b"hello");
        assert_eq!(disk.len().unwrap(), 133);
    }

    #[test]
    fn test_short_read_zero_fills_tail() {
        let (_dir, disk) = setup();
        disk.write_at(b"abc", 0).unwrap();

        let mut buf = [0xFFu8; 8];
        disk.read_at(&mut buf, 0).unwrap();
        assert_eq!(&buf[..3], b"abc");
        assert_eq!(&buf[3..], &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_read_past_end_of_file_is_all_zero() {
        let (_dir, disk) = setup();
        let mut buf = [0xFFu8; 16];
        disk.read_at(&mut buf, 1 << 20).unwrap();
        assert!(buf.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_memory_disk_matches_file_contract() {
        let disk = MemoryDisk::new();
        disk.write_at(b"xyz", 10).unwrap();
        assert_eq!(disk.len().unwrap(), 13);

        let mut buf = [0xFFu8; 6];
        disk.read_at(&mut buf, 9).unwrap();
        assert_eq!(&buf, &[0, b'x', b'y', b'z', 0, 0]);
    }
}
