//! Errors a request execution can complete with.

use cetus_cql::frame::response::ResponseOpcode;
use thiserror::Error;

/// Which side of the driver/server boundary produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSource {
    /// The driver itself.
    Client,
    /// The database node, via an ERROR response.
    Server,
    /// The connection layer underneath the driver.
    Transport,
}

/// An error that a request execution completed with.
///
/// Every variant carries its origin explicitly (see [`RequestError::source`]);
/// server error codes are preserved raw instead of being folded into a shared
/// numeric namespace.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Database sent an ERROR response.
    #[error("Database returned an error: code {code:#06x}, message: {message}")]
    DbError {
        /// Raw server error code.
        code: i32,
        /// Message text sent by the server.
        message: String,
    },

    /// Received a response other than RESULT or ERROR where a result was
    /// expected.
    #[error("Unexpected response from the server: {0:?}")]
    UnexpectedResponse(ResponseOpcode),

    /// No response arrived within the armed deadline.
    #[error("Request timed out")]
    RequestTimeout,

    /// The connection layer reported a failure, e.g. a connection reset.
    #[error("Connection broken: {0}")]
    BrokenConnection(String),

    /// Received an ERROR response whose body could not be parsed.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// Every host in the query plan has been attempted without success.
    #[error("No more hosts left to attempt the request against")]
    EmptyPlan,
}

impl RequestError {
    /// Side of the driver/server boundary this error originates from.
    pub fn source(&self) -> ErrorSource {
        match self {
            RequestError::DbError { .. } => ErrorSource::Server,
            RequestError::BrokenConnection(_) => ErrorSource::Transport,
            RequestError::UnexpectedResponse(_)
            | RequestError::RequestTimeout
            | RequestError::InvalidMessage(_)
            | RequestError::EmptyPlan => ErrorSource::Client,
        }
    }

    /// Raw server error code, for server-sourced errors.
    pub fn db_code(&self) -> Option<i32> {
        match self {
            RequestError::DbError { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorSource, RequestError};

    #[test]
    fn sources_are_tagged_per_variant() {
        let db = RequestError::DbError {
            code: 0x2200,
            message: "Invalid query".to_owned(),
        };
        assert_eq!(db.source(), ErrorSource::Server);
        assert_eq!(db.db_code(), Some(0x2200));

        let broken = RequestError::BrokenConnection("connection reset".to_owned());
        assert_eq!(broken.source(), ErrorSource::Transport);
        assert_eq!(broken.db_code(), None);

        assert_eq!(RequestError::RequestTimeout.source(), ErrorSource::Client);
        assert_eq!(RequestError::EmptyPlan.source(), ErrorSource::Client);
    }
}
