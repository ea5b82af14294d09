use thiserror::Error;

/// Failure reading from a [`crate::Reader`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("invalid utf-8 in buffer")]
    InvalidUtf8,
}
