//! # Example: aggregate_failures
//!
//! One dispatch round with mixed outcomes, inspected two ways.
//!
//! Shows how to:
//! - Read only the primary failure (the first failed handler in snapshot
//!   order) from the round's [`DispatchError`].
//! - Walk the full failure list when one representative error is not enough.
//! - Observe that failing handlers never cancel their slower siblings.
//!
//! ## Run
//! ```bash
//! cargo run --example aggregate_failures
//! ```

use std::sync::Arc;
use std::time::Duration;

use eventcast::{AsyncEvent, Handler, HandlerError, SyncFn};

/// Succeeds after a delay, proving it was not cancelled by failing siblings.
struct Survivor;

#[async_trait::async_trait]
impl Handler<String, u32> for Survivor {
    async fn handle(&self, _sender: &String, batch: &u32) -> Result<(), HandlerError> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        println!("[survivor] finished batch {batch}");
        Ok(())
    }
}

/// Fails after a delay, so the immediate failure below completes first.
struct SlowReject;

#[async_trait::async_trait]
impl Handler<String, u32> for SlowReject {
    async fn handle(&self, _sender: &String, batch: &u32) -> Result<(), HandlerError> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Err(HandlerError::Fail {
            error: format!("slow validator rejected batch {batch}"),
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== aggregate_failures example ===\n");

    let event: AsyncEvent<String, u32> = AsyncEvent::new();

    event.subscribe(Arc::new(SlowReject));
    event.subscribe(SyncFn::arc("fast-reject", |_: &String, batch: &u32| {
        Err(HandlerError::Fail {
            error: format!("fast validator rejected batch {batch}"),
        })
    }));
    event.subscribe(Arc::new(Survivor));

    let sender = "importer".to_string();
    match event.invoke_all(&sender, &7).await {
        Ok(()) => println!("all handlers succeeded"),
        Err(err) => {
            // The primary is the slow validator: first in snapshot order,
            // even though the fast one failed earlier in wall-clock time.
            println!("round failed: {err}");
            println!("primary label: {}", err.primary().as_label());

            println!("\nfull failure list ({} of {}):", err.failed(), err.dispatched());
            for failure in err.failures() {
                println!("  [{}] {}", failure.index, failure.error);
            }
        }
    }

    println!("\n=== example completed ===");
    Ok(())
}
