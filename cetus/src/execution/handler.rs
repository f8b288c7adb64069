//! Lifecycle of a single logical request across one or more host attempts.

use std::collections::VecDeque;
use std::sync::Arc;

use cetus_cql::frame::request::execute::{EncodedRequest, Execute, ExecuteSerializationError};
use cetus_cql::frame::response::{self, ResponseFrame, ResponseOpcode};
use tracing::{debug, trace, warn};

use crate::cluster::Host;
use crate::errors::RequestError;
use crate::response::future::ResponseFuture;
use crate::utils::timer::RequestTimer;

/// How a retry decision re-targets the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryType {
    /// Re-dispatch against the unchanged front of the host queue.
    CurrentHost,
    /// Move the front host into the attempted history and re-dispatch
    /// against the next one.
    NextHost,
}

/// Lifecycle state of a request handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Built, not yet handed to the transport.
    Created,
    /// An attempt is in flight. Attempts are strictly sequential; there is
    /// never more than one outstanding dispatch per logical request.
    Dispatched,
    /// A retry decision asked for a new attempt that has not been
    /// dispatched yet.
    RetryRequested,
    /// A terminal event completed the response future. Terminal; no further
    /// transitions are legal.
    Completed,
}

/// Retry capability injected by the owning collaborator.
///
/// Called after the handler has performed the re-targeting mechanics; the
/// implementation is expected to re-dispatch against
/// [`RequestHandler::current_host`], or finish the request with
/// [`RequestError::EmptyPlan`] if the queue is exhausted.
pub trait RetryHandler: Send + Sync {
    /// Applies a retry decision to the handler.
    fn on_retry(&self, handler: &mut RequestHandler, retry_type: RetryType);
}

/// Completion capability, notified when the handler reaches a terminal
/// event so the owner can release per-request bookkeeping (disarm the
/// timer, free the stream id). Fires exactly once per handler lifetime.
pub trait FinishListener: Send + Sync {
    /// Called once, on the first terminal event.
    fn on_finished(&self, handler: &RequestHandler);
}

/// Owns the full lifecycle of one logical request: the request body, the
/// ordered queue of candidate hosts, the attempted-host history, the timeout
/// timer handle and the response future the consumer awaits.
///
/// All event entry points ([`on_response`](Self::on_response),
/// [`on_error`](Self::on_error), [`on_timeout`](Self::on_timeout)) are driven
/// by the single I/O thread, synchronously with connection event dispatch;
/// none of them blocks. The response future is the only piece shared with
/// other threads, and its one-shot contract keeps the completion path
/// idempotent even when a timeout races with an in-flight response.
pub struct RequestHandler {
    request: Arc<Execute>,
    future: Arc<ResponseFuture>,
    hosts: VecDeque<Host>,
    attempted_hosts: Vec<Host>,
    state: RequestState,
    finished: bool,
    retry_handler: Option<Arc<dyn RetryHandler>>,
    finish_listener: Option<Arc<dyn FinishListener>>,
    /// Timeout timer for the current attempt; armed per attempt by the
    /// owning connection.
    pub timer: RequestTimer,
    /// Keyspace the statement was prepared against, for diagnostics.
    pub keyspace: Option<String>,
}

impl RequestHandler {
    /// Creates a handler over a request body and the candidate hosts chosen
    /// by the load balancing policy, front first.
    pub fn new(
        request: Arc<Execute>,
        hosts: impl IntoIterator<Item = Host>,
        statement: impl Into<String>,
    ) -> Self {
        RequestHandler {
            request,
            future: Arc::new(ResponseFuture::new(statement)),
            hosts: hosts.into_iter().collect(),
            attempted_hosts: Vec::new(),
            state: RequestState::Created,
            finished: false,
            retry_handler: None,
            finish_listener: None,
            timer: RequestTimer::new(),
            keyspace: None,
        }
    }

    /// Encodes the owned request body for the given protocol version.
    pub fn encode(&self, version: u8) -> Result<EncodedRequest, ExecuteSerializationError> {
        self.request.encode(version)
    }

    /// The request body this handler owns.
    pub fn request(&self) -> &Arc<Execute> {
        &self.request
    }

    /// The future the consumer awaits.
    pub fn future(&self) -> &Arc<ResponseFuture> {
        &self.future
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Registers the retry capability. Without one, [`retry`](Self::retry)
    /// is a no-op.
    pub fn set_retry_handler(&mut self, retry_handler: Arc<dyn RetryHandler>) {
        self.retry_handler = Some(retry_handler);
    }

    /// Registers the completion listener.
    pub fn set_finish_listener(&mut self, finish_listener: Arc<dyn FinishListener>) {
        self.finish_listener = Some(finish_listener);
    }

    /// Marks the current attempt as handed to the transport. Ignored once
    /// the handler has completed; completion is terminal.
    pub fn mark_dispatched(&mut self) {
        if self.state == RequestState::Completed {
            warn!("ignoring dispatch of a completed request");
            return;
        }
        trace!(host = ?self.current_host(), "request dispatched");
        self.state = RequestState::Dispatched;
    }

    /// Front of the host queue, i.e. the target of the current attempt.
    /// `None` iff the queue is exhausted. Never mutates.
    pub fn current_host(&self) -> Option<Host> {
        self.hosts.front().copied()
    }

    /// Remaining candidate hosts, front first.
    pub fn queued_hosts(&self) -> &VecDeque<Host> {
        &self.hosts
    }

    /// Hosts already targeted by this request, in attempt order.
    pub fn attempted_hosts(&self) -> &[Host] {
        &self.attempted_hosts
    }

    /// Moves the front host into the attempted history without dispatching.
    pub fn next_host(&mut self) {
        if let Some(host) = self.hosts.pop_front() {
            self.attempted_hosts.push(host);
        }
    }

    /// Classifies a response delivered by the transport and completes the
    /// future. RESULT carries the success body; ERROR is mapped to a
    /// server-sourced [`RequestError`]; anything else completes with
    /// [`RequestError::UnexpectedResponse`].
    pub fn on_response(&mut self, response: ResponseFrame) {
        // Capture the responding host before any queue mutation can occur.
        self.record_responder();

        match response.opcode {
            ResponseOpcode::Result => {
                self.future.set_result(response.body);
            }
            ResponseOpcode::Error => {
                let error = match response::Error::deserialize(&mut &response.body[..]) {
                    Ok(error) => RequestError::DbError {
                        code: error.code,
                        message: error.message,
                    },
                    Err(parse_error) => RequestError::InvalidMessage(parse_error.to_string()),
                };
                self.future.set_error(error);
            }
            other => {
                warn!(opcode = ?other, "unexpected response to an EXECUTE request");
                self.future.set_error(RequestError::UnexpectedResponse(other));
            }
        }
        self.complete();
    }

    /// Transport-level failure of the current attempt, passed through
    /// verbatim.
    pub fn on_error(&mut self, error: RequestError) {
        self.record_responder();
        self.future.set_error(error);
        self.complete();
    }

    /// The armed timer fired before any response arrived.
    pub fn on_timeout(&mut self) {
        self.record_responder();
        self.future.set_error(RequestError::RequestTimeout);
        self.complete();
    }

    /// Applies a retry decision. The re-targeting mechanics happen here;
    /// the registered [`RetryHandler`] then re-dispatches. Without a
    /// registered handler this is a no-op and the original completion
    /// stands. Advancing past the last host is a no-op on the queue; the
    /// retry handler must detect exhaustion via
    /// [`current_host`](Self::current_host) and finish the request with an
    /// error instead. A retry decision arriving after completion is ignored;
    /// completion is terminal.
    pub fn retry(&mut self, retry_type: RetryType) {
        if self.state == RequestState::Completed {
            warn!(?retry_type, "ignoring retry of a completed request");
            return;
        }
        let Some(retry_handler) = self.retry_handler.clone() else {
            return;
        };
        if retry_type == RetryType::NextHost {
            self.next_host();
        }
        debug!(?retry_type, host = ?self.current_host(), "retry requested");
        self.state = RequestState::RetryRequested;
        retry_handler.on_retry(self, retry_type);
    }

    // Every terminal event records the current front host, when one exists;
    // the future's write-once rule keeps the first recording.
    fn record_responder(&mut self) {
        if let Some(host) = self.current_host() {
            self.future.set_client(host);
        }
    }

    fn complete(&mut self) {
        self.state = RequestState::Completed;
        self.notify_finished();
    }

    // Fires the finished notification at most once per handler lifetime,
    // no matter how many terminal events race in.
    fn notify_finished(&mut self) {
        if self.finished {
            warn!("spurious terminal event after completion");
            return;
        }
        self.finished = true;
        trace!(statement = self.future.statement(), "request finished");
        if let Some(listener) = self.finish_listener.clone() {
            listener.on_finished(self);
        }
    }
}
