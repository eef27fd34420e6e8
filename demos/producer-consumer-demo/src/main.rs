//! Producer-Consumer Handoff Demo
//!
//! Runs the same ten items through a queue of capacity five twice:
//!
//! - **Slow producer** (50ms per item) feeding a fast consumer (5ms): the
//!   buffer stays nearly empty and the run is producer-bound
//! - **Fast producer** (5ms) feeding a slow consumer (50ms): the buffer
//!   fills to capacity and the producer is held back
//!
//! A third run shows a consumer failing on its fourth item and the producer
//! being stopped.
//!
//! ```text
//! ItemSource → TokioBuffer (capacity) → ItemSink
//! ```
//!
//! Configuration comes from the environment:
//! - `DEMO_CAPACITY` (default 5)
//! - `DEMO_ITEMS` (default 10)
//! - `RUST_LOG` (default `producer_consumer_demo=info,handoff_tokio_adapter=debug`)

use std::time::Duration;

use handoff_core::{BoxError, Consumer, Producer, QueueCfg, QueueStats};
use handoff_tokio_adapter::{QueueMonitor, TokioQueue};
use tokio::time::{sleep, Instant};

/* ================== Producer / Consumer ================== */

/// Emits `count` numbered items, `delay` apart
struct ItemSource {
    next: u32,
    count: u32,
    delay: Duration,
}

impl Producer<u32> for ItemSource {
    async fn next(&mut self) -> Result<Option<u32>, BoxError> {
        if self.next >= self.count {
            return Ok(None);
        }
        sleep(self.delay).await;
        self.next += 1;
        tracing::info!(item = self.next, "[produce]");
        Ok(Some(self.next))
    }
}

/// Handles items in `delay`, optionally rejecting one of them
struct ItemSink {
    delay: Duration,
    fail_on: Option<u32>,
    monitor: QueueMonitor<u32>,
}

impl Consumer<u32> for ItemSink {
    async fn handle(&mut self, item: u32) -> Result<(), BoxError> {
        if self.fail_on == Some(item) {
            return Err(format!("item {item} rejected").into());
        }
        sleep(self.delay).await;
        tracing::info!(item, buffered = self.monitor.len(), "[consume]");
        Ok(())
    }
}

/* ================== Scenarios ================== */

struct Scenario {
    name: &'static str,
    produce_every: Duration,
    consume_every: Duration,
    fail_on: Option<u32>,
}

async fn run_scenario(
    scenario: &Scenario,
    capacity: usize,
    items: u32,
) -> anyhow::Result<QueueStats> {
    let queue = TokioQueue::new(QueueCfg::new(capacity).with_name(scenario.name))?;
    let source = ItemSource {
        next: 0,
        count: items,
        delay: scenario.produce_every,
    };
    let sink = ItemSink {
        delay: scenario.consume_every,
        fail_on: scenario.fail_on,
        monitor: queue.monitor(),
    };

    let start = Instant::now();
    let stats = queue
        .run(source, sink)
        .await
        .map_err(|e| e.with_context(scenario.name).into_anyhow())?;

    tracing::info!(
        scenario = scenario.name,
        elapsed_ms = start.elapsed().as_millis() as u64,
        %stats,
        "scenario finished"
    );
    Ok(stats)
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "producer_consumer_demo=info,handoff_tokio_adapter=debug".into()
            }),
        )
        .init();

    let capacity = env_or("DEMO_CAPACITY", 5usize);
    let items = env_or("DEMO_ITEMS", 10u32);

    let scenarios = [
        Scenario {
            name: "slow-producer",
            produce_every: Duration::from_millis(50),
            consume_every: Duration::from_millis(5),
            fail_on: None,
        },
        Scenario {
            name: "fast-producer",
            produce_every: Duration::from_millis(5),
            consume_every: Duration::from_millis(50),
            fail_on: None,
        },
    ];

    for scenario in &scenarios {
        let stats = run_scenario(scenario, capacity, items).await?;
        println!("{}: {}", scenario.name, serde_json::to_string(&stats)?);
    }

    let failing = Scenario {
        name: "failing-consumer",
        produce_every: Duration::from_millis(5),
        consume_every: Duration::from_millis(20),
        fail_on: Some(4),
    };
    match run_scenario(&failing, capacity, items).await {
        Ok(stats) => anyhow::bail!("expected a consumer failure, got {stats}"),
        Err(e) => tracing::warn!(error = %e, "failing-consumer stopped as expected"),
    }

    Ok(())
}
