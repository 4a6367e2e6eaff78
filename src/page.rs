/// Identifier of a fixed-size page in the backing store. Page ids are
/// non-negative, stable for the lifetime of the store, and address the byte
/// range `page_id * PAGE_SIZE .. (page_id + 1) * PAGE_SIZE`.
pub type PageId = u64;

/// Fixed page size, uniform across the store.
pub const PAGE_SIZE: usize = 4096;

/// The page struct that holds exactly [`PAGE_SIZE`] bytes of page contents.
pub struct Page {
    contents: Box<[u8]>,
}

impl Page {
    const INT_BYTES: usize = 4;

    /// Create a new, zeroed page.
    pub fn new() -> Self {
        Self {
            contents: vec![0; PAGE_SIZE].into_boxed_slice(),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.contents
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.contents
    }

    /// Reset every byte to zero.
    pub fn clear(&mut self) {
        self.contents.fill(0);
    }

    /// Get an integer from the page at the given offset
    pub fn get_int(&self, offset: usize) -> i32 {
        let bytes: [u8; Self::INT_BYTES] = self.contents[offset..offset + Self::INT_BYTES]
            .try_into()
            .unwrap();
        i32::from_be_bytes(bytes)
    }

    /// Set an integer at the given offset
    pub fn set_int(&mut self, offset: usize, n: i32) {
        self.contents[offset..offset + Self::INT_BYTES].copy_from_slice(&n.to_be_bytes());
    }

    /// Get a slice of bytes from the page at the given offset. Read the length and then the bytes
    pub fn get_bytes(&self, mut offset: usize) -> Vec<u8> {
        let bytes: [u8; Self::INT_BYTES] = self.contents[offset..offset + Self::INT_BYTES]
            .try_into()
            .unwrap();
        let length = u32::from_be_bytes(bytes) as usize;
        offset += Self::INT_BYTES;
        self.contents[offset..offset + length].to_vec()
    }

    /// Set a slice of bytes at the given offset. Write the length and then the bytes
    pub fn set_bytes(&mut self, mut offset: usize, bytes: &[u8]) {
        let length = bytes.len() as u32;
        self.contents[offset..offset + Self::INT_BYTES].copy_from_slice(&length.to_be_bytes());
        offset += Self::INT_BYTES;
        self.contents[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Get a string from the page at the given offset
    pub fn get_string(&self, offset: usize) -> String {
        let bytes = self.get_bytes(offset);
        String::from_utf8(bytes).unwrap()
    }

    /// Set a string at the given offset
    pub fn set_string(&mut self, offset: usize, string: &str) {
        self.set_bytes(offset, string.as_bytes());
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        //  4096 raw bytes are not useful debug output
        f.debug_struct("Page").finish_non_exhaustive()
    }
}
