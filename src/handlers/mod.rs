//! # Event handlers: the subscriber contract and its adapters.
//!
//! This module provides the [`Handler`] trait that every subscriber must
//! satisfy, the shared handle type [`HandlerRef`], and the synchronous
//! adapter [`SyncFn`].
//!
//! ## Subscriber shapes
//! - **Async subscribers** implement [`Handler`] directly (see the trait docs).
//! - **Synchronous callbacks** are lifted into the same contract with
//!   [`SyncFn`]; their invocation completes within the calling poll.
//!
//! Handlers are registered with an
//! [`AsyncEvent`](crate::AsyncEvent) as [`HandlerRef`] values; the `Arc`
//! identity of the handle is what `unsubscribe` matches on.

mod handler;
mod sync_fn;

#[cfg(feature = "logging")]
mod log;

pub use handler::{Handler, HandlerRef};
pub use sync_fn::SyncFn;

#[cfg(feature = "logging")]
pub use log::ConsoleWriter;
