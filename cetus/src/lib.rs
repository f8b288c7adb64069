//! Request-execution core of a CQL driver.
//!
//! This crate owns the lifecycle of a single prepared-statement execution:
//! encoding the request (via `cetus-cql`), walking the ordered queue of
//! candidate hosts on retryable failures, reacting to timeouts, classifying
//! server responses and driving exactly one terminal completion of the
//! [`ResponseFuture`] the consumer awaits.
//!
//! The socket transport, cluster topology discovery, the load balancing
//! policy that orders candidate hosts, and the retry policy that *decides*
//! whether to retry are all collaborators injected from the outside.

pub mod cluster;
pub mod errors;
pub mod execution;
pub mod response;
pub mod utils;

pub use cluster::Host;
pub use errors::{ErrorSource, RequestError};
pub use execution::{FinishListener, RequestHandler, RequestState, RetryHandler, RetryType};
pub use response::ResponseFuture;
