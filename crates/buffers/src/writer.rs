//! Positional binary writer over an auto-growing buffer.

/// A binary buffer writer.
///
/// Writes happen at the cursor (`u8`, `u16_le`, `buf`, ...) or at an
/// absolute offset (`set_*`). Writing past the current length grows the
/// buffer, filling any gap with zero bytes. Multi-byte integers are
/// little-endian.
///
/// # Example
///
/// ```
/// use ratefile_buffers::Writer;
///
/// let mut writer = Writer::with_len(4);
/// writer.set_u16_le(1, 0x0302);
/// writer.seek(6);
/// writer.u8(0xff);
/// assert_eq!(writer.flush(), vec![0, 2, 3, 0, 0, 0, 0xff]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Writer {
    uint8: Vec<u8>,
    /// Current cursor position.
    pub x: usize,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer over `len` zero bytes.
    pub fn with_len(len: usize) -> Self {
        Self {
            uint8: vec![0; len],
            x: 0,
        }
    }

    /// Current buffer length.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    /// Returns `true` when nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Moves the cursor to an absolute position.
    pub fn seek(&mut self, x: usize) {
        self.x = x;
    }

    /// Grows the buffer with zero bytes to at least `len` bytes.
    pub fn ensure_len(&mut self, len: usize) {
        if self.uint8.len() < len {
            self.uint8.resize(len, 0);
        }
    }

    /// Writes bytes at an absolute offset without moving the cursor.
    pub fn set_buf(&mut self, offset: usize, bytes: &[u8]) {
        let end = offset + bytes.len();
        self.ensure_len(end);
        self.uint8[offset..end].copy_from_slice(bytes);
    }

    /// Writes one byte at an absolute offset.
    pub fn set_u8(&mut self, offset: usize, val: u8) {
        self.set_buf(offset, &[val]);
    }

    /// Writes a little-endian `u16` at an absolute offset.
    pub fn set_u16_le(&mut self, offset: usize, val: u16) {
        self.set_buf(offset, &val.to_le_bytes());
    }

    /// Writes a little-endian `u32` at an absolute offset.
    pub fn set_u32_le(&mut self, offset: usize, val: u32) {
        self.set_buf(offset, &val.to_le_bytes());
    }

    /// Writes bytes at the cursor and advances it.
    pub fn buf(&mut self, bytes: &[u8]) {
        self.set_buf(self.x, bytes);
        self.x += bytes.len();
    }

    /// Writes `count` copies of `byte` at the cursor.
    pub fn fill(&mut self, byte: u8, count: usize) {
        let end = self.x + count;
        self.ensure_len(end);
        self.uint8[self.x..end].fill(byte);
        self.x = end;
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.buf(&[val]);
    }

    #[inline]
    pub fn u16_le(&mut self, val: u16) {
        self.buf(&val.to_le_bytes());
    }

    #[inline]
    pub fn u32_le(&mut self, val: u32) {
        self.buf(&val.to_le_bytes());
    }

    /// Borrows the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8
    }

    /// Takes the buffer, leaving the writer empty.
    pub fn flush(&mut self) -> Vec<u8> {
        self.x = 0;
        std::mem::take(&mut self.uint8)
    }
}
