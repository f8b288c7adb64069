//! Errors of the wire-level encoding and decoding layer.

use std::sync::Arc;

use thiserror::Error;

use super::TryFromPrimitiveError;

/// An error rooted in reading wire primitives off a frame body.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum LowLevelDeserializationError {
    /// The frame body ended before the announced value did.
    #[error("Too few bytes received: expected {expected}, received {received}")]
    TooFewBytesReceived {
        /// Bytes the primitive being read still required.
        expected: usize,
        /// Bytes actually left in the body.
        received: usize,
    },

    /// An underlying byte-level read failed.
    #[error("IO error: {0}")]
    IoError(Arc<std::io::Error>),

    /// A length prefix was negative where a value was mandatory.
    #[error("Invalid length of a wire value: {0}")]
    InvalidValueLength(i32),

    /// A `[string]` carried bytes that are not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    UnableToParseString(#[from] std::str::Utf8Error),

    /// A consistency short does not name any known consistency level.
    #[error(transparent)]
    UnknownConsistency(#[from] TryFromPrimitiveError<u16>),
}

impl From<std::io::Error> for LowLevelDeserializationError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(Arc::new(err))
    }
}

/// An error returned when parsing the body of an ERROR response fails.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum CqlErrorParseError {
    /// The error code could not be read.
    #[error("Malformed error code: {0}")]
    ErrorCodeParseError(LowLevelDeserializationError),

    /// The error message could not be read.
    #[error("Malformed error message: {0}")]
    MessageParseError(LowLevelDeserializationError),
}
