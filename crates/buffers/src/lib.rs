//! Binary buffer utilities for the rate file codec.
//!
//! # Overview
//!
//! - [`Reader`] - Reads little-endian data from a byte slice with cursor tracking
//! - [`Writer`] - Writes little-endian data into an auto-growing buffer,
//!   at the cursor or at absolute offsets
//!
//! # Example
//!
//! ```
//! use ratefile_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.u16_le(0x0203);
//! writer.buf(b"R94");
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8(), Ok(0x01));
//! assert_eq!(reader.u16_le(), Ok(0x0203));
//! assert_eq!(reader.buf(3), Ok(&b"R94"[..]));
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer {
                offset,
                needed,
                available,
            } => write!(
                f,
                "end of buffer at offset {offset}: needed {needed} bytes, {available} available"
            ),
        }
    }
}

impl std::error::Error for BufferError {}
