//! Rate file codec error type.

use ratefile_buffers::BufferError;
use thiserror::Error;

/// Error type for rate file decoding and encoding.
///
/// Every variant carries the offset or the expected/actual values that
/// triggered it.
#[derive(Debug, Error)]
pub enum RateFileError {
    #[error("invalid format: {field} at offset {offset} has unsupported value {found:#04x}")]
    InvalidFormat {
        field: &'static str,
        offset: usize,
        found: u8,
    },
    #[error("size mismatch: header declares {declared} body bytes, body expands to {actual}")]
    SizeMismatch { declared: usize, actual: usize },
    #[error("truncated data at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedData {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("count mismatch in {table} at offset {offset}: declared {declared}, found {found}")]
    CountMismatch {
        table: &'static str,
        offset: usize,
        declared: usize,
        found: usize,
    },
    #[error("field too long: {field} holds at most {max}, got {actual}")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RateFileError {
    /// Distinct non-zero process exit status per failure kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            RateFileError::InvalidFormat { .. } => 2,
            RateFileError::SizeMismatch { .. } => 3,
            RateFileError::TruncatedData { .. } => 4,
            RateFileError::CountMismatch { .. } => 5,
            RateFileError::FieldTooLong { .. } => 6,
            RateFileError::Io(_) => 7,
            RateFileError::Json(_) => 8,
        }
    }
}

impl From<BufferError> for RateFileError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer {
                offset,
                needed,
                available,
            } => RateFileError::TruncatedData {
                offset,
                needed,
                available,
            },
        }
    }
}

/// A specialized Result type for rate file operations.
pub type Result<T> = std::result::Result<T, RateFileError>;
