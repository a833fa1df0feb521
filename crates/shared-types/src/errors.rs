//! # Parse Errors
//!
//! Errors produced when decoding primitives from their text forms.

use thiserror::Error;

/// Errors from parsing chain and peer primitives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Hex string is malformed.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded byte length does not match the expected width.
    #[error("Invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected byte width.
        expected: usize,
        /// Actual byte width.
        got: usize,
    },

    /// Numeric identifier is not a valid u64.
    #[error("Invalid chain id: {0}")]
    InvalidChainId(String),
}
