//! # The asynchronous subscriber contract.
//!
//! A [`Handler`] receives the sender that fired the event and a shared
//! reference to the payload, and returns a future that resolves when the
//! handler is done with this occurrence. The common handle type is
//! [`HandlerRef`], an `Arc<dyn Handler>` suitable for registration and for
//! identity-based unsubscription.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;

/// # Asynchronous event subscriber.
///
/// The future returned by [`handle`](Handler::handle) is the handler's
/// completion signal for one occurrence: the dispatcher treats it as an opaque
/// asynchronous operation that may suspend at any point and take arbitrarily
/// long. Resolving with `Err` marks this handler failed for the round without
/// affecting any sibling handler.
///
/// Handlers hold no dispatcher state; whatever a subscriber needs, it captures
/// itself.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use eventcast::{Handler, HandlerError};
///
/// struct Alerter {
///     threshold: f64,
/// }
///
/// #[async_trait]
/// impl Handler<String, f64> for Alerter {
///     async fn handle(&self, sender: &String, payload: &f64) -> Result<(), HandlerError> {
///         if *payload > self.threshold {
///             println!("{sender}: {payload} over threshold");
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Handler<S, P>: Send + Sync {
    /// Handles one occurrence of the event.
    ///
    /// Called with the sender that fired the event and the payload shared by
    /// every handler of the round. The payload is never mutated by the
    /// dispatcher and must not be assumed exclusive.
    async fn handle(&self, sender: &S, payload: &P) -> Result<(), HandlerError>;
}

/// Shared handle to a handler (`Arc<dyn Handler>`).
///
/// Registration stores a clone of this `Arc`; `unsubscribe` removes the first
/// registration whose `Arc` points at the same handler
/// ([`Arc::ptr_eq`]). Two independently created handlers are distinct
/// subscriptions even when their behavior is identical.
pub type HandlerRef<S, P> = Arc<dyn Handler<S, P>>;
