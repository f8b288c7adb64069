//! CQL responses received from the server.

pub mod error;

pub use error::Error;

use bytes::Bytes;

use super::TryFromPrimitiveError;

/// Opcode of a response, used to identify the response type in a CQL frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ResponseOpcode {
    /// Something went wrong server-side; the body carries a code and message.
    Error = 0x00,
    /// The connection is ready for queries.
    Ready = 0x02,
    /// The server requires authentication.
    Authenticate = 0x03,
    /// Answer to an OPTIONS request.
    Supported = 0x06,
    /// Result of a QUERY, PREPARE, EXECUTE or BATCH request.
    Result = 0x08,
    /// A pushed server event.
    Event = 0x0C,
    /// A follow-up SASL challenge.
    AuthChallenge = 0x0E,
    /// Authentication succeeded.
    AuthSuccess = 0x10,
}

impl TryFrom<u8> for ResponseOpcode {
    type Error = TryFromPrimitiveError<u8>;

    fn try_from(value: u8) -> Result<Self, TryFromPrimitiveError<u8>> {
        match value {
            0x00 => Ok(Self::Error),
            0x02 => Ok(Self::Ready),
            0x03 => Ok(Self::Authenticate),
            0x06 => Ok(Self::Supported),
            0x08 => Ok(Self::Result),
            0x0C => Ok(Self::Event),
            0x0E => Ok(Self::AuthChallenge),
            0x10 => Ok(Self::AuthSuccess),
            _ => Err(TryFromPrimitiveError {
                enum_name: "ResponseOpcode",
                primitive: value,
            }),
        }
    }
}

/// A single response frame: its opcode and the undecoded body.
///
/// Interpretation of `body` depends on `opcode`; the request-execution core
/// only ever decodes ERROR bodies itself and hands RESULT bodies through.
#[derive(Debug, Clone)]
pub struct ResponseFrame {
    /// Kind of the response.
    pub opcode: ResponseOpcode,
    /// Raw frame body.
    pub body: Bytes,
}
