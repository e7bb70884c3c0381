//! # Example: sync_and_async
//!
//! Mixes trait-based async subscribers with `SyncFn`-lifted callbacks on one
//! event.
//!
//! Shows how to:
//! - Implement [`Handler`] for a subscriber that suspends mid-invocation.
//! - Lift plain synchronous callbacks with [`SyncFn::arc`]; they complete
//!   within the calling poll, before the round suspends on the async ones.
//! - Unsubscribe a handler by its shared handle.
//!
//! ## Run
//! ```bash
//! cargo run --example sync_and_async
//! ```

use std::sync::Arc;
use std::time::Duration;

use eventcast::{AsyncEvent, Handler, HandlerError, HandlerRef, SyncFn};

/// Async subscriber: pretends to ship the message somewhere slow.
struct SlowShipper;

#[async_trait::async_trait]
impl Handler<String, String> for SlowShipper {
    async fn handle(&self, sender: &String, message: &String) -> Result<(), HandlerError> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        println!("[shipper] delivered {message:?} from {sender}");
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== sync_and_async example ===\n");

    let publisher = "publisher".to_string();
    let event: AsyncEvent<String, String> = AsyncEvent::new();

    event.subscribe(Arc::new(SlowShipper));

    // Lifted callback: no suspension, effects complete inline.
    let stamp: HandlerRef<String, String> =
        SyncFn::arc("stamp", |sender: &String, message: &String| {
            println!("[stamp] {sender} -> {message:?}");
            Ok(())
        });
    event.subscribe(Arc::clone(&stamp));

    println!("round 1 ({} subscribers):", event.len());
    event.invoke_all(&publisher, &"hello".to_string()).await?;

    event.unsubscribe(&stamp);
    println!("\nround 2 ({} subscriber, stamp unsubscribed):", event.len());
    event.invoke_all(&publisher, &"bye".to_string()).await?;

    println!("\n=== example completed ===");
    Ok(())
}
