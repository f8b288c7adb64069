//! CQL protocol-level representation of an `ERROR` response.

use crate::frame::frame_errors::CqlErrorParseError;
use crate::frame::types;

/// An error reported by the server in an `ERROR` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// Raw server error code.
    pub code: i32,
    /// Human-readable description sent alongside the code.
    pub message: String,
}

impl Error {
    /// Parses the body of an `ERROR` response: `[int code][string message]`.
    pub fn deserialize(buf: &mut &[u8]) -> Result<Self, CqlErrorParseError> {
        let code = types::read_int(buf)
            .map_err(|err| CqlErrorParseError::ErrorCodeParseError(err.into()))?;
        let message = types::read_string(buf)
            .map_err(CqlErrorParseError::MessageParseError)?
            .to_owned();

        Ok(Error { code, message })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::Error;
    use crate::frame::frame_errors::CqlErrorParseError;
    use crate::frame::types;

    #[test]
    fn parses_code_and_message() {
        let mut body = Vec::new();
        types::write_int(0x2200, &mut body);
        types::write_string("Invalid query", &mut body).unwrap();

        let error = Error::deserialize(&mut &body[..]).unwrap();
        assert_eq!(error.code, 0x2200);
        assert_eq!(error.message, "Invalid query");
    }

    #[test]
    fn truncated_body_is_rejected() {
        let mut body = Vec::new();
        types::write_int(0x1000, &mut body);
        types::write_short(20, &mut body); // message shorter than announced

        assert_matches!(
            Error::deserialize(&mut &body[..]),
            Err(CqlErrorParseError::MessageParseError(_))
        );
    }
}
