//! CQL binary protocol: wire primitives, requests and responses.

pub mod frame_errors;
pub mod request;
pub mod response;
pub mod types;

use thiserror::Error;

/// An error returned when a numeric value read off the wire does not map
/// to any variant of the target enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid {enum_name}: {primitive}")]
pub struct TryFromPrimitiveError<T: std::fmt::Debug + std::fmt::Display> {
    /// Name of the enum the value was supposed to map to.
    pub enum_name: &'static str,
    /// The offending value.
    pub primitive: T,
}
