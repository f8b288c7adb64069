//! Per-attempt timeout timer.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};

use tokio::time::{Instant, Sleep};

/// An armable, cancellable deadline.
///
/// Unarmed by default. Awaiting the timer resolves once an armed deadline
/// passes; waiting on an unarmed timer parks until the timer is armed and
/// its deadline is reached. [`cancel`](Self::cancel) disarms a pending
/// deadline and reports whether there was one, which lets the owning
/// connection decide whether a concurrently delivered response or the
/// timeout is authoritative.
#[derive(Default)]
pub struct RequestTimer {
    sleep: Option<Pin<Box<Sleep>>>,
    waker: Option<Waker>,
}

impl RequestTimer {
    /// Creates a new, unarmed timer.
    pub fn new() -> Self {
        Default::default()
    }

    /// Arms the timer to fire at the given moment, replacing any previously
    /// armed deadline. A deadline already in the past fires at once.
    pub fn arm(&mut self, deadline: Instant) {
        // A parked waiter cannot be moved onto the new deadline directly;
        // wake it and let it re-register. This also covers waiters whose
        // registration was dropped by an intervening cancel.
        if let Some(waker) = self.waker.take() {
            waker.wake();
        }
        match &mut self.sleep {
            Some(sleep) => sleep.as_mut().reset(deadline),
            None => self.sleep = Some(Box::pin(tokio::time::sleep_until(deadline))),
        }
    }

    /// Disarms the timer. Returns whether a deadline was still pending.
    pub fn cancel(&mut self) -> bool {
        self.sleep.take().is_some()
    }

    /// The armed deadline, or `None` if the timer is unarmed.
    pub fn deadline(&self) -> Option<Instant> {
        self.sleep.as_ref().map(|sleep| sleep.deadline())
    }
}

impl Future for RequestTimer {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.sleep {
            Some(sleep) => match sleep.as_mut().poll(cx) {
                Poll::Ready(()) => {
                    this.sleep = None;
                    this.waker = None;
                    Poll::Ready(())
                }
                Poll::Pending => {
                    // Keep our own copy of the waker: the one registered
                    // inside the sleep dies with it on cancel.
                    this.waker = Some(cx.waker().clone());
                    Poll::Pending
                }
            },
            None => {
                this.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};
    use std::task::Poll;
    use std::time::Duration;

    use futures::future;
    use tokio::time::Instant;

    use super::RequestTimer;

    #[tokio::test(start_paused = true)]
    async fn fires_at_the_armed_deadline() {
        let mut timer = RequestTimer::new();
        assert_eq!(timer.deadline(), None);

        let deadline = Instant::now() + Duration::from_millis(50);
        timer.arm(deadline);
        assert_eq!(timer.deadline(), Some(deadline));

        (&mut timer).await;
        assert!(Instant::now() >= deadline);

        // Fired timers return to the unarmed state and can be re-armed.
        assert_eq!(timer.deadline(), None);
        timer.arm(Instant::now() + Duration::from_millis(10));
        (&mut timer).await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_reports_whether_a_deadline_was_pending() {
        let mut timer = RequestTimer::new();
        assert!(!timer.cancel());

        timer.arm(Instant::now() + Duration::from_secs(1));
        assert!(timer.cancel());
        assert_eq!(timer.deadline(), None);
        assert!(!timer.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn parked_waiter_survives_cancel_and_rearm() {
        use std::future::Future;

        let timer = Arc::new(Mutex::new(RequestTimer::new()));
        timer.lock().unwrap().arm(Instant::now() + Duration::from_secs(60));

        let waiter = tokio::spawn({
            let timer = timer.clone();
            future::poll_fn(move |cx| Pin::new(&mut *timer.lock().unwrap()).poll(cx))
        });
        // Let the waiter register with the armed deadline.
        tokio::task::yield_now().await;

        // The owner finishes the attempt and re-arms for the next one; the
        // waiter must carry over to the new deadline.
        assert!(timer.lock().unwrap().cancel());
        let deadline = Instant::now() + Duration::from_millis(10);
        timer.lock().unwrap().arm(deadline);

        waiter.await.unwrap();
        assert!(Instant::now() >= deadline);
    }

    #[tokio::test(start_paused = true)]
    async fn waiter_on_unarmed_timer_resumes_after_arming() {
        use std::future::Future;

        let timer = Arc::new(Mutex::new(RequestTimer::new()));
        let mut awaitee = future::poll_fn({
            let timer = timer.clone();
            move |cx| {
                let mut lock = timer.lock().unwrap();
                Pin::new(&mut *lock).poll(cx)
            }
        });

        assert_eq!(futures::poll(&mut awaitee).await, Poll::Pending);

        let deadline = Instant::now() + Duration::from_millis(20);
        timer.lock().unwrap().arm(deadline);
        (&mut awaitee).await;
        assert!(Instant::now() >= deadline);
    }
}
