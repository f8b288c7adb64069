//! Result handoff between the I/O thread and the request's consumer.

pub mod future;

pub use future::{RequestOutcome, ResponseFuture};
