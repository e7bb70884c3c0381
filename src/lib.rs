//! # eventcast
//!
//! **Eventcast** is a small multicast notification primitive for async Rust.
//!
//! It lets a publisher register any number of asynchronous subscribers
//! against a named event and, on each occurrence, dispatch to all of them
//! concurrently while receiving a single completion signal that resolves
//! only once every subscriber has finished, successfully or not. Ordinary
//! multicast callbacks assume synchronous handlers; when handlers do
//! asynchronous work (I/O, delays, downstream calls), the publisher needs a
//! way to fan out and rejoin without handlers serializing behind each other
//! and without losing visibility into failures.
//!
//! ## Architecture
//! ```text
//!  Publisher                      AsyncEvent<S, P>
//!     │ subscribe/unsubscribe ───► [ handler 1, handler 2, … handler N ]
//!     │                                   (ordered, duplicates allowed)
//!     │ invoke_all(sender, payload)
//!     │        snapshot ──► start all, in order, concurrently
//!     │                        ├─► handler 1 ──┐
//!     │                        ├─► handler 2 ──┼─► join
//!     │                        └─► handler N ──┘
//!     ◄──── Ok(()) ──────────────── all succeeded
//!     ◄──── Err(DispatchError) ──── ≥1 failed (every failure kept,
//!                                   primary = first in snapshot order)
//! ```
//!
//! ## Guarantees
//! - The subscriber list is snapshotted atomically when `invoke_all` is
//!   called; concurrent subscribe/unsubscribe only affects later rounds.
//! - Handlers are started in subscription order and run concurrently; an
//!   early failure never cancels or skips the others.
//! - The completion signal resolves only after *every* handler of the round
//!   has resolved.
//! - With no subscribers, `invoke_all` resolves immediately without
//!   scheduling any asynchronous work.
//!
//! ## Features
//! | Area             | Description                                             | Key types / traits               |
//! |------------------|---------------------------------------------------------|----------------------------------|
//! | **Dispatch**     | Ordered subscriber list, fan-out/join per occurrence.   | [`AsyncEvent`]                   |
//! | **Subscribers**  | Async subscriber contract and shared handles.           | [`Handler`], [`HandlerRef`]      |
//! | **Sync adapter** | Lift a plain callback into the handler contract.        | [`SyncFn`]                       |
//! | **Errors**       | Per-handler and aggregate dispatch failures.            | [`HandlerError`], [`DispatchError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`ConsoleWriter`] handler
//!   _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use eventcast::{AsyncEvent, Handler, HandlerError, SyncFn};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Handler<String, u32> for Audit {
//!     async fn handle(&self, sender: &String, payload: &u32) -> Result<(), HandlerError> {
//!         // await downstream work here
//!         println!("{sender}: {payload}");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), eventcast::DispatchError> {
//!     let event: AsyncEvent<String, u32> = AsyncEvent::new();
//!
//!     event.subscribe(Arc::new(Audit));
//!     event.subscribe(SyncFn::arc("echo", |_: &String, n: &u32| {
//!         println!("echo {n}");
//!         Ok(())
//!     }));
//!
//!     // Resolves once both subscribers are done; fails if any failed.
//!     event.invoke_all(&"sensor".to_string(), &42).await?;
//!     Ok(())
//! }
//! ```
//!
//! The dispatcher defines no cancellation or scheduling of its own:
//! recurring publication, backpressure, and cancellation belong to the
//! publisher and its runtime (see the `thermometer` demo for a
//! cancellation-driven publishing loop).

mod dispatch;
mod error;
mod handlers;

// ---- Public re-exports ----

pub use dispatch::AsyncEvent;
pub use error::{DispatchError, HandlerError, HandlerFailure};
pub use handlers::{Handler, HandlerRef, SyncFn};

// Optional: expose a simple built-in logging handler (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use handlers::ConsoleWriter;
