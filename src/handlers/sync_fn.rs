//! # Synchronous-callback adapter (`SyncFn`).
//!
//! [`SyncFn`] lifts a plain `Fn(&S, &P) -> Result<(), HandlerError>` callback
//! into the [`Handler`] contract. The lifted handler runs the callback to
//! completion within the calling poll, with no suspension point, and hands
//! back an already-resolved completion signal; a callback error is propagated
//! unchanged, never swallowed.
//!
//! ## Example
//! ```
//! use eventcast::{HandlerRef, SyncFn};
//!
//! let echo: HandlerRef<(), String> = SyncFn::arc("echo", |_: &(), msg: &String| {
//!     println!("{msg}");
//!     Ok(())
//! });
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::handlers::handler::{Handler, HandlerRef};

/// Function-backed synchronous handler.
///
/// Wraps a callback that completes without suspending; the surrounding
/// dispatch still treats it like any other handler.
#[derive(Debug)]
pub struct SyncFn<F> {
    /// Stable handler name, for the subscriber's own logs and demos.
    name: Cow<'static, str>,
    f: F,
}

impl<F> SyncFn<F> {
    /// Creates a new synchronous handler.
    ///
    /// Prefer [`SyncFn::arc`] when you immediately need a [`HandlerRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the handler and returns it as a shared handle.
    ///
    /// # Example
    /// ```
    /// use eventcast::{HandlerRef, SyncFn};
    ///
    /// let h: HandlerRef<u32, u32> = SyncFn::arc("noop", |_: &u32, _: &u32| Ok(()));
    /// ```
    pub fn arc<S, P>(name: impl Into<Cow<'static, str>>, f: F) -> HandlerRef<S, P>
    where
        S: Send + Sync + 'static,
        P: Send + Sync + 'static,
        F: Fn(&S, &P) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Arc::new(Self::new(name, f))
    }

    /// Returns the handler name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl<S, P, F> Handler<S, P> for SyncFn<F>
where
    S: Send + Sync + 'static,
    P: Send + Sync + 'static,
    F: Fn(&S, &P) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    async fn handle(&self, sender: &S, payload: &P) -> Result<(), HandlerError> {
        (self.f)(sender, payload)
    }
}
