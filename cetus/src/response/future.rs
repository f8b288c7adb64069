//! One-shot result slot shared between the I/O thread and the consumer that
//! submitted the request.

use std::sync::{Mutex, MutexGuard};

use bytes::Bytes;
use tokio::sync::Notify;

use crate::cluster::Host;
use crate::errors::RequestError;

/// Outcome of a finished request: the raw RESULT body, or an error.
pub type RequestOutcome = Result<Bytes, RequestError>;

/// A single-assignment result slot for one logical request.
///
/// The union of [`set_result`](Self::set_result) and
/// [`set_error`](Self::set_error) takes effect at most once over the slot's
/// whole lifetime: the first write wins and every later write is discarded.
/// This holds under races, e.g. a timeout firing while a response is being
/// delivered on another thread. The responding host is a separate slot with
/// the same write-once rule.
///
/// Setters never block; the consumer side may poll with
/// [`outcome`](Self::outcome) or await [`wait`](Self::wait).
pub struct ResponseFuture {
    state: Mutex<FutureState>,
    notify: Notify,
    statement: String,
}

struct FutureState {
    outcome: Option<RequestOutcome>,
    coordinator: Option<Host>,
}

impl ResponseFuture {
    /// Creates an empty slot, keeping a diagnostic copy of the statement
    /// text it belongs to.
    pub fn new(statement: impl Into<String>) -> Self {
        ResponseFuture {
            state: Mutex::new(FutureState {
                outcome: None,
                coordinator: None,
            }),
            notify: Notify::new(),
            statement: statement.into(),
        }
    }

    /// Completes the slot with a successful result body.
    /// Returns whether the write took effect.
    pub fn set_result(&self, body: Bytes) -> bool {
        self.complete(Ok(body))
    }

    /// Completes the slot with an error. Returns whether the write took
    /// effect.
    pub fn set_error(&self, error: RequestError) -> bool {
        self.complete(Err(error))
    }

    fn complete(&self, outcome: RequestOutcome) -> bool {
        let won = {
            let mut state = self.lock();
            if state.outcome.is_some() {
                false
            } else {
                state.outcome = Some(outcome);
                true
            }
        };
        if won {
            self.notify.notify_waiters();
        }
        won
    }

    /// Records the host that produced the terminal event. Settable once;
    /// later calls are discarded. Returns whether the write took effect.
    pub fn set_client(&self, host: Host) -> bool {
        let mut state = self.lock();
        if state.coordinator.is_some() {
            return false;
        }
        state.coordinator = Some(host);
        true
    }

    /// The outcome, if the request has already finished.
    pub fn outcome(&self) -> Option<RequestOutcome> {
        self.lock().outcome.clone()
    }

    /// The host recorded for the terminal event, if any.
    pub fn coordinator(&self) -> Option<Host> {
        self.lock().coordinator
    }

    /// Text of the statement this future belongs to.
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Waits until the request finishes and returns its outcome.
    pub async fn wait(&self) -> RequestOutcome {
        loop {
            let notified = self.notify.notified();
            if let Some(outcome) = self.outcome() {
                return outcome;
            }
            notified.await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, FutureState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
