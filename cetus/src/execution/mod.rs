//! Per-request execution lifecycle.

pub mod handler;

pub use handler::{FinishListener, RequestHandler, RequestState, RetryHandler, RetryType};
