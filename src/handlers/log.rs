//! # Simple logging handler for debugging and demos.
//!
//! [`ConsoleWriter`] prints every payload it receives to stdout in a
//! human-readable format. This is primarily useful for development,
//! debugging, and examples.
//!
//! ## Output format
//! ```text
//! [event] 21.4
//! [event] reading received
//! ```

use std::fmt::Display;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::handlers::handler::Handler;

/// Simple stdout logging handler.
///
/// Enabled via the `logging` feature. Prints each payload via its
/// [`Display`] impl, for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Handler`] for
/// structured logging or metrics collection.
pub struct ConsoleWriter;

#[async_trait]
impl<S, P> Handler<S, P> for ConsoleWriter
where
    S: Send + Sync + 'static,
    P: Display + Send + Sync + 'static,
{
    async fn handle(&self, _sender: &S, payload: &P) -> Result<(), HandlerError> {
        println!("[event] {payload}");
        Ok(())
    }
}
