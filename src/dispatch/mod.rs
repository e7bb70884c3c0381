//! # Multicast dispatch: the subscriber list and the fan-out/join call.
//!
//! This module groups the event **dispatcher** [`AsyncEvent`]: an ordered,
//! mutable list of subscribers plus the `invoke_all` operation that snapshots
//! the list, starts every handler concurrently and joins them into a single
//! completion signal.
//!
//! ## Quick reference
//! - **Publishers**: call [`AsyncEvent::invoke_all`] once per occurrence and
//!   await the returned future before deciding how to proceed.
//! - **Subscribers**: register through [`AsyncEvent::subscribe`] and leave
//!   through [`AsyncEvent::unsubscribe`].

mod event;

pub use event::AsyncEvent;
