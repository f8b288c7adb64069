//! CQL protocol-level types and request encoding.
//!
//! Mainly intended to be used by the cetus driver core, but can also be
//! useful for other applications that need to speak the CQL binary protocol.

pub mod frame;

pub use crate::frame::types::Consistency;
