//! CQL protocol-level representation of an `EXECUTE` request.

use std::num::TryFromIntError;

use bytes::Bytes;
use thiserror::Error;

use crate::frame::types::{self, Consistency};

// Query flags, fixed by protocol v2.
const FLAG_VALUES: u8 = 0x01;
const FLAG_PAGE_SIZE: u8 = 0x04;
const FLAG_WITH_PAGING_STATE: u8 = 0x08;
const FLAG_WITH_SERIAL_CONSISTENCY: u8 = 0x10;

/// The single protocol version this encoder speaks.
pub const SUPPORTED_VERSION: u8 = 2;

/// A single value bound to a marker of a prepared statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
    /// An explicit database null.
    Null,
    /// Serialized bytes of the value.
    Value(Bytes),
}

impl BoundValue {
    // An `[int]` length prefix plus the payload; nulls are length -1
    // with no payload.
    fn wire_size(&self) -> usize {
        match self {
            BoundValue::Null => 4,
            BoundValue::Value(v) => 4 + v.len(),
        }
    }

    fn write(&self, buf: &mut Vec<u8>) -> Result<(), TryFromIntError> {
        match self {
            BoundValue::Null => {
                types::write_int(-1, buf);
                Ok(())
            }
            BoundValue::Value(v) => types::write_bytes(v, buf),
        }
    }
}

/// CQL protocol-level representation of an `EXECUTE` request,
/// used to execute a single prepared statement.
#[derive(Debug, Clone)]
pub struct Execute {
    /// ID of the prepared statement to execute, as issued by the server.
    pub id: Bytes,

    /// Consistency level of the execution.
    pub consistency: Consistency,

    /// Values bound to the statement's markers, in marker order.
    pub values: Vec<BoundValue>,

    /// Requested page size. Negative means no paging requested;
    /// `0` is a valid explicit page size.
    pub page_size: i32,

    /// Cursor of a previous result page. Empty means start from the
    /// beginning.
    pub paging_state: Bytes,

    /// Raw serial consistency. `0` means unset; the wire format cannot
    /// tell an explicit `0` apart from "not provided".
    pub serial_consistency: u16,
}

/// Wire buffers of an encoded request, in send order, plus their total size.
///
/// The paging buffer exists only if at least one paging-related field of the
/// request is present, so `buffers` holds either one or two entries.
#[derive(Debug, Clone)]
pub struct EncodedRequest {
    /// One or two independently sized body buffers.
    pub buffers: Vec<Vec<u8>>,
    /// Sum of the lengths of all buffers.
    pub total_size: usize,
}

impl Execute {
    /// Encodes the request body for the given protocol version.
    ///
    /// Buffer sizes are computed up front, so each returned buffer is
    /// allocated exactly once and filled with append-only writes. The flags
    /// byte is derived purely from which optional fields are present.
    pub fn encode(&self, version: u8) -> Result<EncodedRequest, ExecuteSerializationError> {
        if version != SUPPORTED_VERSION {
            return Err(ExecuteSerializationError::UnsupportedVersion(version));
        }

        let mut flags = 0u8;

        // <id> [short bytes] + <consistency> [short] + <flags> [byte]
        let mut query_buf_size = 2 + self.id.len() + 2 + 1;
        let mut paging_buf_size = 0;

        if !self.values.is_empty() {
            // <n> [short] + <value_1>...<value_n>
            query_buf_size += 2 + self.values.iter().map(BoundValue::wire_size).sum::<usize>();
            flags |= FLAG_VALUES;
        }
        if self.page_size >= 0 {
            paging_buf_size += 4;
            flags |= FLAG_PAGE_SIZE;
        }
        if !self.paging_state.is_empty() {
            paging_buf_size += 4 + self.paging_state.len();
            flags |= FLAG_WITH_PAGING_STATE;
        }
        if self.serial_consistency != 0 {
            paging_buf_size += 2;
            flags |= FLAG_WITH_SERIAL_CONSISTENCY;
        }

        let mut buffers = Vec::with_capacity(if paging_buf_size > 0 { 2 } else { 1 });

        let mut query_buf = Vec::with_capacity(query_buf_size);
        types::write_short_bytes(&self.id, &mut query_buf)
            .map_err(ExecuteSerializationError::StatementIdSerialization)?;
        types::write_consistency(self.consistency, &mut query_buf);
        query_buf.push(flags);
        if !self.values.is_empty() {
            types::write_short_length(self.values.len(), &mut query_buf)
                .map_err(ExecuteSerializationError::ValueCountSerialization)?;
            for value in &self.values {
                value
                    .write(&mut query_buf)
                    .map_err(ExecuteSerializationError::ValueSerialization)?;
            }
        }
        debug_assert_eq!(query_buf.len(), query_buf_size);
        buffers.push(query_buf);

        if paging_buf_size > 0 {
            let mut paging_buf = Vec::with_capacity(paging_buf_size);
            if self.page_size >= 0 {
                types::write_int(self.page_size, &mut paging_buf);
            }
            if !self.paging_state.is_empty() {
                types::write_bytes(&self.paging_state, &mut paging_buf)
                    .map_err(ExecuteSerializationError::PagingStateSerialization)?;
            }
            if self.serial_consistency != 0 {
                types::write_short(self.serial_consistency, &mut paging_buf);
            }
            debug_assert_eq!(paging_buf.len(), paging_buf_size);
            buffers.push(paging_buf);
        }

        Ok(EncodedRequest {
            buffers,
            total_size: query_buf_size + paging_buf_size,
        })
    }
}

/// An error returned when encoding an EXECUTE request fails.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum ExecuteSerializationError {
    /// Encoder invoked for a protocol version it does not speak.
    #[error("Unsupported protocol version {0}, only version {SUPPORTED_VERSION} is supported")]
    UnsupportedVersion(u8),

    /// The prepared statement id does not fit a `[short bytes]`.
    #[error("Malformed statement id: {0}")]
    StatementIdSerialization(TryFromIntError),

    /// The number of bound values does not fit a `[short]`.
    #[error("Too many bound values: {0}")]
    ValueCountSerialization(TryFromIntError),

    /// A bound value does not fit a `[bytes]`.
    #[error("Malformed bound value: {0}")]
    ValueSerialization(TryFromIntError),

    /// The paging state does not fit a `[bytes]`.
    #[error("Malformed paging state: {0}")]
    PagingStateSerialization(TryFromIntError),
}
