//! # Example: thermometer
//!
//! A cancellation-driven publisher that simulates a temperature sensor and
//! fans every reading out to three delayed console subscribers.
//!
//! Shows how to:
//! - Own an [`AsyncEvent`] inside a publisher and pass the publisher as sender.
//! - Implement [`Handler`] for subscribers that do (simulated) async work.
//! - Await the completion signal of each round before producing the next
//!   reading, so the publication rate follows the slowest subscriber.
//! - Stop the loop cooperatively with a [`CancellationToken`].
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► subscribe UnitDisplay ×3 (°C / °F / K)
//!   ├─► spawn Thermometer::monitor(token)
//!   │        loop:
//!   │          ├─► reading = previous ± jitter
//!   │          ├─► invoke_all(self, reading) ──► all displays, concurrently
//!   │          ├─► await the round (backpressure)
//!   │          └─► sleep 1-3s (cancellable)
//!   └─► sleep 10s, cancel token, join monitor
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example thermometer
//! ```

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use eventcast::{AsyncEvent, Handler, HandlerError};

/// Payload published on every reading.
#[derive(Debug, Clone, Copy)]
struct TemperatureChanged {
    celsius: f64,
}

/// Demo publisher: simulates a sensor and owns the event.
struct Thermometer {
    temperature_changed: AsyncEvent<Thermometer, TemperatureChanged>,
}

impl Thermometer {
    fn new() -> Self {
        Self {
            temperature_changed: AsyncEvent::new(),
        }
    }

    /// Publishes randomized readings until the token is cancelled.
    ///
    /// Each round is awaited before the next reading is produced: the
    /// publication rate naturally follows the slowest current subscriber.
    async fn monitor(&self, ctx: CancellationToken) {
        let mut celsius = 20.0;

        while !ctx.is_cancelled() {
            celsius += rand::thread_rng().gen_range(-1.0..1.0);
            let reading = TemperatureChanged { celsius };

            println!("[thermometer] publishing {celsius:.1}\u{b0}C");
            match self.temperature_changed.invoke_all(self, &reading).await {
                Ok(()) => println!("[thermometer] round complete\n"),
                Err(err) => println!("[thermometer] round failed: {err}\n"),
            }

            let pause = Duration::from_millis(rand::thread_rng().gen_range(1000..3000));
            tokio::select! {
                _ = ctx.cancelled() => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }

        println!("[thermometer] stopped");
    }
}

/// Console subscriber converting each reading before printing it.
struct UnitDisplay {
    id: usize,
    unit: &'static str,
    convert: fn(f64) -> f64,
}

#[async_trait::async_trait]
impl Handler<Thermometer, TemperatureChanged> for UnitDisplay {
    async fn handle(
        &self,
        _sender: &Thermometer,
        reading: &TemperatureChanged,
    ) -> Result<(), HandlerError> {
        // Simulate downstream work (rendering, I/O).
        tokio::time::sleep(Duration::from_millis(500)).await;

        let value = (self.convert)(reading.celsius);
        println!("[display {}] responding with {value:.1}{}", self.id, self.unit);
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== thermometer example ===\n");

    let thermometer = Arc::new(Thermometer::new());

    let displays = [
        UnitDisplay {
            id: 0,
            unit: "\u{b0}C",
            convert: |celsius| celsius,
        },
        UnitDisplay {
            id: 1,
            unit: "\u{b0}F",
            convert: |celsius| celsius * 9.0 / 5.0 + 32.0,
        },
        UnitDisplay {
            id: 2,
            unit: "K",
            convert: |celsius| celsius + 273.15,
        },
    ];
    for display in displays {
        thermometer.temperature_changed.subscribe(Arc::new(display));
    }

    let ctx = CancellationToken::new();
    let monitor = {
        let thermometer = Arc::clone(&thermometer);
        let ctx = ctx.clone();
        tokio::spawn(async move { thermometer.monitor(ctx).await })
    };

    tokio::time::sleep(Duration::from_secs(10)).await;
    ctx.cancel();
    monitor.await?;

    println!("\n=== example completed ===");
    Ok(())
}
