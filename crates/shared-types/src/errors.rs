//! # Error Types
//!
//! Errors raised when decoding shared value objects.

use thiserror::Error;

/// Errors that can occur while parsing a value object from text or bytes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Input is not valid hexadecimal.
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    /// Input decoded to the wrong number of bytes.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
