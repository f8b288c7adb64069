//! CQL requests sent by the client.

pub mod execute;

pub use execute::Execute;

use super::TryFromPrimitiveError;

/// Opcode of a request, used to identify the request type in a CQL frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum RequestOpcode {
    /// Initializes the connection.
    Startup = 0x01,
    /// Asks the server which STARTUP options are supported.
    Options = 0x05,
    /// Executes a single unprepared statement.
    Query = 0x07,
    /// Prepares a statement for later execution through EXECUTE.
    Prepare = 0x09,
    /// Executes a single prepared statement.
    Execute = 0x0A,
    /// Registers the connection for server event pushes.
    Register = 0x0B,
    /// Executes a batch of statements.
    Batch = 0x0D,
    /// Answers a server authentication challenge.
    AuthResponse = 0x0F,
}

impl TryFrom<u8> for RequestOpcode {
    type Error = TryFromPrimitiveError<u8>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Startup),
            0x05 => Ok(Self::Options),
            0x07 => Ok(Self::Query),
            0x09 => Ok(Self::Prepare),
            0x0A => Ok(Self::Execute),
            0x0B => Ok(Self::Register),
            0x0D => Ok(Self::Batch),
            0x0F => Ok(Self::AuthResponse),
            _ => Err(TryFromPrimitiveError {
                enum_name: "RequestOpcode",
                primitive: value,
            }),
        }
    }
}
