//! # Asynchronous multicast event.
//!
//! [`AsyncEvent`] owns an ordered list of subscribers and dispatches each
//! occurrence to **all** of them concurrently, handing the publisher one
//! completion signal that resolves only when every handler has finished.
//!
//! ## Architecture
//! ```text
//! invoke_all(sender, payload)
//!     │  snapshot = subscribers.clone()      (one critical section)
//!     ├──────────────► handler 1 ──┐
//!     ├──────────────► handler 2 ──┼──► join ──► Ok(()) | DispatchError
//!     └──────────────► handler N ──┘
//! ```
//!
//! ## Rules
//! - Handlers are started in subscription order but may complete in any order.
//! - A failing handler never cancels or skips its siblings; every invocation
//!   runs to its own natural completion.
//! - Subscribing or unsubscribing during an in-flight dispatch only affects
//!   dispatches started afterwards.
//! - Panics inside handlers are caught and surfaced as
//!   [`HandlerError::Panicked`] in the aggregate (isolation).

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{self, Either, join_all};

use crate::error::{DispatchError, HandlerError, HandlerFailure};
use crate::handlers::{Handler, HandlerRef};

/// Multicast dispatcher for one named event.
///
/// `S` is the sender type (the object firing the event), `P` the payload type
/// shared with every handler. The subscriber list is the only mutable state;
/// it is owned by this instance and mutated only through
/// [`subscribe`](AsyncEvent::subscribe) / [`unsubscribe`](AsyncEvent::unsubscribe).
///
/// ### Properties
/// - **Ordered**: insertion order is preserved; duplicates are permitted and
///   invoked once per registration.
/// - **Snapshot-isolated**: each `invoke_all` call reads the list exactly once,
///   atomically, and concurrent mutation never affects an in-flight dispatch.
/// - **Join-complete**: the returned future resolves only after every handler
///   of the round has resolved, success or failure.
pub struct AsyncEvent<S, P> {
    subscribers: Mutex<Vec<HandlerRef<S, P>>>,
}

impl<S, P> AsyncEvent<S, P>
where
    S: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    /// Creates an event with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Appends `handler` to the end of the subscriber list.
    ///
    /// Every dispatch started after this call includes `handler`, once per
    /// registration; subscribing the same handle twice means two invocations
    /// per occurrence.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use eventcast::{AsyncEvent, SyncFn};
    ///
    /// let event: AsyncEvent<(), String> = AsyncEvent::new();
    /// let echo = SyncFn::arc("echo", |_: &(), msg: &String| {
    ///     println!("{msg}");
    ///     Ok(())
    /// });
    ///
    /// event.subscribe(Arc::clone(&echo));
    /// assert_eq!(event.len(), 1);
    ///
    /// event.unsubscribe(&echo);
    /// assert!(event.is_empty());
    /// ```
    pub fn subscribe(&self, handler: HandlerRef<S, P>) {
        self.lock().push(handler);
    }

    /// Removes the first registration of `handler`, matched by `Arc` identity.
    ///
    /// Removes at most one occurrence per call; a handler that was subscribed
    /// twice stays subscribed once. Unsubscribing a handler that is not
    /// registered is a no-op, not an error. An in-flight dispatch that already
    /// snapshotted `handler` still invokes it.
    pub fn unsubscribe(&self, handler: &HandlerRef<S, P>) {
        let mut subscribers = self.lock();
        if let Some(position) = subscribers.iter().position(|h| Arc::ptr_eq(h, handler)) {
            subscribers.remove(position);
        }
    }

    /// Number of current registrations (duplicates counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if no handler is currently subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Dispatches one occurrence to every current subscriber.
    ///
    /// The subscriber list is snapshotted when `invoke_all` is *called*, in a
    /// single critical section; the returned future then drives the round:
    ///
    /// 1. An empty snapshot yields an already-resolved `Ok(())` without
    ///    creating any handler invocation.
    /// 2. Otherwise one invocation per handler is started, in snapshot order,
    ///    without waiting for earlier ones to finish; handlers may complete in
    ///    any order.
    /// 3. The future resolves only after **every** invocation has resolved.
    ///    An early failure never cancels or skips siblings.
    /// 4. If all succeeded the round succeeds with no value; otherwise it
    ///    fails with a [`DispatchError`] carrying every failure in snapshot
    ///    order, the primary being the first failed handler in that order.
    ///
    /// A handler that panics is caught and reported as
    /// [`HandlerError::Panicked`] instead of unwinding through the join.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicU32, Ordering};
    /// use eventcast::{AsyncEvent, SyncFn};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), eventcast::DispatchError> {
    /// let sum = Arc::new(AtomicU32::new(0));
    /// let event: AsyncEvent<(), u32> = AsyncEvent::new();
    ///
    /// let counter = Arc::clone(&sum);
    /// event.subscribe(SyncFn::arc("sum", move |_: &(), n: &u32| {
    ///     counter.fetch_add(*n, Ordering::Relaxed);
    ///     Ok(())
    /// }));
    ///
    /// event.invoke_all(&(), &2).await?;
    /// event.invoke_all(&(), &3).await?;
    /// assert_eq!(sum.load(Ordering::Relaxed), 5);
    /// # Ok(())
    /// # }
    /// ```
    pub fn invoke_all<'a>(
        &self,
        sender: &'a S,
        payload: &'a P,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send + 'a {
        let snapshot: Vec<HandlerRef<S, P>> = self.lock().clone();

        if snapshot.is_empty() {
            return Either::Left(future::ready(Ok(())));
        }

        Either::Right(async move {
            let invocations: Vec<_> = snapshot
                .iter()
                .map(|handler| AssertUnwindSafe(handler.handle(sender, payload)).catch_unwind())
                .collect();

            let dispatched = invocations.len();
            let results = join_all(invocations).await;

            let failures: Vec<HandlerFailure> = results
                .into_iter()
                .enumerate()
                .filter_map(|(index, outcome)| {
                    let error = match outcome {
                        Ok(Ok(())) => return None,
                        Ok(Err(error)) => error,
                        Err(panic) => HandlerError::Panicked {
                            message: panic_message(panic.as_ref()),
                        },
                    };
                    Some(HandlerFailure { index, error })
                })
                .collect();

            if failures.is_empty() {
                Ok(())
            } else {
                Err(DispatchError::new(dispatched, failures))
            }
        })
    }

    fn lock(&self) -> MutexGuard<'_, Vec<HandlerRef<S, P>>> {
        // The list only ever sees push / remove-one, so a guard recovered from
        // a poisoned lock still holds a well-formed list.
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, P> Default for AsyncEvent<S, P>
where
    S: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, P> fmt::Debug for AsyncEvent<S, P>
where
    S: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncEvent")
            .field("subscribers", &self.len())
            .finish()
    }
}

/// Extracts a printable message from a caught panic payload.
fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{Handler, SyncFn};

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::oneshot;
    use tokio::time::Instant;

    /// Blocks on a one-shot gate, then records completion.
    struct Gated {
        gate: Mutex<Option<oneshot::Receiver<()>>>,
        done: Arc<AtomicUsize>,
    }

    impl Gated {
        fn subscribe_to(event: &AsyncEvent<(), ()>, done: &Arc<AtomicUsize>) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            event.subscribe(Arc::new(Gated {
                gate: Mutex::new(Some(rx)),
                done: Arc::clone(done),
            }));
            tx
        }
    }

    #[async_trait]
    impl Handler<(), ()> for Gated {
        async fn handle(&self, _sender: &(), _payload: &()) -> Result<(), HandlerError> {
            let gate = self.gate.lock().unwrap().take().expect("gate reused");
            let _ = gate.await;
            self.done.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Sleeps, then records completion and succeeds.
    struct SlowOk {
        delay: Duration,
        done: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Handler<(), ()> for SlowOk {
        async fn handle(&self, _sender: &(), _payload: &()) -> Result<(), HandlerError> {
            tokio::time::sleep(self.delay).await;
            self.done.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Fails without suspending.
    struct FailsNow {
        error: &'static str,
    }

    #[async_trait]
    impl Handler<(), ()> for FailsNow {
        async fn handle(&self, _sender: &(), _payload: &()) -> Result<(), HandlerError> {
            Err(HandlerError::Fail {
                error: self.error.to_string(),
            })
        }
    }

    /// Sleeps, then fails.
    struct FailsLate {
        delay: Duration,
        error: &'static str,
    }

    #[async_trait]
    impl Handler<(), ()> for FailsLate {
        async fn handle(&self, _sender: &(), _payload: &()) -> Result<(), HandlerError> {
            tokio::time::sleep(self.delay).await;
            Err(HandlerError::Fail {
                error: self.error.to_string(),
            })
        }
    }

    /// Counts invocations.
    struct Counter {
        hits: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Handler<(), ()> for Counter {
        async fn handle(&self, _sender: &(), _payload: &()) -> Result<(), HandlerError> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Panics;

    #[async_trait]
    impl Handler<(), ()> for Panics {
        async fn handle(&self, _sender: &(), _payload: &()) -> Result<(), HandlerError> {
            panic!("kaboom");
        }
    }

    #[test]
    fn test_invoke_all_without_subscribers_is_already_resolved() {
        let event: AsyncEvent<(), ()> = AsyncEvent::new();
        // No runtime here: the empty round must resolve on the first poll
        // without scheduling anything.
        let outcome = event.invoke_all(&(), &()).now_or_never();
        assert!(matches!(outcome, Some(Ok(()))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_waits_for_every_handler() {
        let event = Arc::new(AsyncEvent::<(), ()>::new());
        let done = Arc::new(AtomicUsize::new(0));

        let mut gates = Vec::new();
        for _ in 0..5 {
            gates.push(Gated::subscribe_to(&event, &done));
        }

        let join = {
            let event = Arc::clone(&event);
            tokio::spawn(async move { event.invoke_all(&(), &()).await })
        };

        // Release the gates in reverse subscription order: the join must stay
        // pending until the very first handler (released last) finishes too.
        while gates.len() > 1 {
            gates.pop().unwrap().send(()).unwrap();
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert!(!join.is_finished(), "join resolved with gates still closed");
        }
        gates.pop().unwrap().send(()).unwrap();

        join.await.unwrap().unwrap();
        assert_eq!(done.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handlers_start_concurrently() {
        let event: AsyncEvent<(), ()> = AsyncEvent::new();
        let started = Arc::new(Mutex::new(Vec::new()));

        struct Stamps {
            delay: Duration,
            started: Arc<Mutex<Vec<Instant>>>,
        }

        #[async_trait]
        impl Handler<(), ()> for Stamps {
            async fn handle(&self, _sender: &(), _payload: &()) -> Result<(), HandlerError> {
                self.started.lock().unwrap().push(Instant::now());
                tokio::time::sleep(self.delay).await;
                Ok(())
            }
        }

        for _ in 0..3 {
            event.subscribe(Arc::new(Stamps {
                delay: Duration::from_secs(1),
                started: Arc::clone(&started),
            }));
        }

        let begin = Instant::now();
        event.invoke_all(&(), &()).await.unwrap();
        let elapsed = begin.elapsed();

        // Three one-second handlers overlap instead of serializing.
        assert!(elapsed < Duration::from_secs(2), "serialized: {elapsed:?}");

        let started = started.lock().unwrap();
        assert_eq!(started.len(), 3);
        let window = *started.iter().max().unwrap() - *started.iter().min().unwrap();
        assert!(window < Duration::from_millis(10), "staggered: {window:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_does_not_abort_siblings() {
        let event: AsyncEvent<(), ()> = AsyncEvent::new();
        let done = Arc::new(AtomicUsize::new(0));

        event.subscribe(Arc::new(SlowOk {
            delay: Duration::from_secs(1),
            done: Arc::clone(&done),
        }));
        event.subscribe(Arc::new(FailsNow { error: "boom" }));
        event.subscribe(Arc::new(SlowOk {
            delay: Duration::from_secs(1),
            done: Arc::clone(&done),
        }));

        let begin = Instant::now();
        let err = event.invoke_all(&(), &()).await.unwrap_err();

        // The round resolved to failure only after the delayed siblings ran
        // to completion.
        assert!(begin.elapsed() >= Duration::from_secs(1));
        assert_eq!(done.load(Ordering::SeqCst), 2);

        assert_eq!(err.failed(), 1);
        assert_eq!(err.dispatched(), 3);
        assert_eq!(err.failures()[0].index, 1);
        assert!(matches!(err.primary(), HandlerError::Fail { error } if error == "boom"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_primary_follows_snapshot_order_not_completion_order() {
        let event: AsyncEvent<(), ()> = AsyncEvent::new();

        // The first subscriber fails *last* in wall-clock terms; it must still
        // be the primary.
        event.subscribe(Arc::new(FailsLate {
            delay: Duration::from_secs(1),
            error: "slow-first",
        }));
        event.subscribe(Arc::new(FailsNow { error: "fast-second" }));

        let err = event.invoke_all(&(), &()).await.unwrap_err();

        assert_eq!(err.failed(), 2);
        assert!(matches!(err.primary(), HandlerError::Fail { error } if error == "slow-first"));
        assert_eq!(err.failures()[0].index, 0);
        assert_eq!(err.failures()[1].index, 1);
    }

    #[tokio::test]
    async fn test_panicking_handler_is_isolated() {
        let event: AsyncEvent<(), ()> = AsyncEvent::new();
        let hits = Arc::new(AtomicUsize::new(0));

        event.subscribe(Arc::new(Counter {
            hits: Arc::clone(&hits),
        }));
        event.subscribe(Arc::new(Panics));
        event.subscribe(Arc::new(Counter {
            hits: Arc::clone(&hits),
        }));

        let err = event.invoke_all(&(), &()).await.unwrap_err();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(err.failures()[0].index, 1);
        assert!(
            matches!(err.primary(), HandlerError::Panicked { message } if message == "kaboom")
        );
    }

    #[tokio::test]
    async fn test_unsubscribe_removes_one_registration_at_a_time() {
        let event: AsyncEvent<(), ()> = AsyncEvent::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let handler: HandlerRef<(), ()> = Arc::new(Counter {
            hits: Arc::clone(&hits),
        });

        event.subscribe(Arc::clone(&handler));
        event.subscribe(Arc::clone(&handler));
        assert_eq!(event.len(), 2);

        event.invoke_all(&(), &()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        event.unsubscribe(&handler);
        assert_eq!(event.len(), 1);
        event.invoke_all(&(), &()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        event.unsubscribe(&handler);
        event.unsubscribe(&handler); // no registration left: no-op
        assert!(event.is_empty());
        event.invoke_all(&(), &()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unsubscribe_unknown_handler_is_a_no_op() {
        let event: AsyncEvent<(), ()> = AsyncEvent::new();
        let subscribed: HandlerRef<(), ()> = Arc::new(FailsNow { error: "a" });
        let stranger: HandlerRef<(), ()> = Arc::new(FailsNow { error: "a" });

        event.subscribe(Arc::clone(&subscribed));
        event.unsubscribe(&stranger);
        assert_eq!(event.len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_is_taken_when_invoke_all_is_called() {
        let event: AsyncEvent<(), ()> = AsyncEvent::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let round = event.invoke_all(&(), &());

        // Subscribed after the snapshot: not part of this round.
        event.subscribe(Arc::new(Counter {
            hits: Arc::clone(&hits),
        }));

        round.await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        event.invoke_all(&(), &()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_during_in_flight_dispatch_waits_for_next_round() {
        let event = Arc::new(AsyncEvent::<(), ()>::new());
        let done = Arc::new(AtomicUsize::new(0));
        let gate = Gated::subscribe_to(&event, &done);

        let join = {
            let event = Arc::clone(&event);
            tokio::spawn(async move { event.invoke_all(&(), &()).await })
        };

        // Let the round start and park on its gate, then subscribe.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let hits = Arc::new(AtomicUsize::new(0));
        event.subscribe(Arc::new(Counter {
            hits: Arc::clone(&hits),
        }));

        gate.send(()).unwrap();
        join.await.unwrap().unwrap();

        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0, "late subscriber joined in-flight round");

        event.invoke_all(&(), &()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handlers_start_in_order_and_complete_in_any_order() {
        let event: AsyncEvent<(), ()> = AsyncEvent::new();
        let starts = Arc::new(Mutex::new(Vec::new()));
        let finishes = Arc::new(Mutex::new(Vec::new()));

        struct Tracked {
            id: usize,
            delay: Duration,
            starts: Arc<Mutex<Vec<usize>>>,
            finishes: Arc<Mutex<Vec<usize>>>,
        }

        #[async_trait]
        impl Handler<(), ()> for Tracked {
            async fn handle(&self, _sender: &(), _payload: &()) -> Result<(), HandlerError> {
                self.starts.lock().unwrap().push(self.id);
                tokio::time::sleep(self.delay).await;
                self.finishes.lock().unwrap().push(self.id);
                Ok(())
            }
        }

        // Later subscribers sleep less, so completion order is reversed.
        for id in 0..3 {
            event.subscribe(Arc::new(Tracked {
                id,
                delay: Duration::from_secs(3 - id as u64),
                starts: Arc::clone(&starts),
                finishes: Arc::clone(&finishes),
            }));
        }

        event.invoke_all(&(), &()).await.unwrap();

        assert_eq!(*starts.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(*finishes.lock().unwrap(), vec![2, 1, 0]);
    }

    #[tokio::test]
    async fn test_mixed_sync_and_async_handlers_share_one_round() {
        let event: AsyncEvent<(), ()> = AsyncEvent::new();
        let hits = Arc::new(AtomicUsize::new(0));

        event.subscribe(Arc::new(Counter {
            hits: Arc::clone(&hits),
        }));
        let counter = Arc::clone(&hits);
        event.subscribe(SyncFn::arc("sync", move |_: &(), _: &()| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

        event.invoke_all(&(), &()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
