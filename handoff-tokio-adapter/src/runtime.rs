//! Tokio queue orchestrator
//!
//! [`TokioQueue`] spawns the production and consumption tasks on the current
//! tokio runtime and joins them with one combined wait. On the first failure
//! the sibling task is stopped actively:
//!
//! 1. the shared buffer is aborted and every waiter notified, so a sibling
//!    suspended on the buffer returns
//! 2. the sibling's `JoinHandle` is aborted, so a sibling suspended inside an
//!    external producer or consumer call is cancelled
//!
//! A run therefore never hangs because one side failed. Dropping the `run`
//! future (a timeout, a losing `select!` branch) aborts both tasks.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use handoff_core::{Consumer, Producer, QueueCfg, QueueError, QueueResult, QueueStats};
use tokio::task::{JoinError, JoinHandle};

use crate::buffer::TokioBuffer;
use crate::TokioErrorSupport;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

const PRODUCER_TASK: &str = "producer";
const CONSUMER_TASK: &str = "consumer";

/// A bounded queue ready to run once
///
/// # Example
/// ```rust
/// use handoff_core::{BoxError, QueueCfg};
/// use handoff_tokio_adapter::TokioQueue;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = TokioQueue::new(QueueCfg::new(4).with_name("numbers"))?;
/// let monitor = queue.monitor();
///
/// let mut next = 0u32;
/// let stats = queue
///     .run(
///         move || {
///             next += 1;
///             let item = (next <= 10).then_some(next);
///             async move { Ok::<_, BoxError>(item) }
///         },
///         |n: u32| async move {
///             assert!(n <= 10);
///             Ok::<_, BoxError>(())
///         },
///     )
///     .await?;
///
/// assert_eq!(stats.consumed, 10);
/// assert!(monitor.stats().is_complete());
/// # Ok(())
/// # }
/// ```
pub struct TokioQueue<T> {
    cfg: QueueCfg,
    buffer: Arc<TokioBuffer<T>>,
}

impl<T> TokioQueue<T>
where
    T: Send + 'static,
{
    /// Validates `cfg` and allocates the buffer
    ///
    /// # Errors
    /// `QueueError::InvalidConfiguration` if the capacity is 0.
    pub fn new(cfg: QueueCfg) -> QueueResult<Self> {
        cfg.validate()?;
        let buffer = Arc::new(TokioBuffer::new(&cfg));
        Ok(Self { cfg, buffer })
    }

    pub fn cfg(&self) -> &QueueCfg {
        &self.cfg
    }

    /// Read-only handle for observing the buffer during and after the run
    pub fn monitor(&self) -> QueueMonitor<T> {
        QueueMonitor {
            buffer: Arc::clone(&self.buffer),
        }
    }

    /// Runs the producer and consumer concurrently until both have finished
    ///
    /// Must be called from within a tokio runtime. Resolves with the final
    /// accounting once the producer has returned its end-of-stream sentinel
    /// and every item has been consumed.
    ///
    /// # Errors
    /// - `QueueError::ProducerFailed` if the producer returned an error
    /// - `QueueError::ConsumerFailed` if the consumer returned an error
    /// - `QueueError::TaskFailed` if either callable panicked
    pub async fn run<P, C>(self, producer: P, consumer: C) -> QueueResult<QueueStats>
    where
        P: Producer<T> + 'static,
        C: Consumer<T> + 'static,
    {
        #[cfg(feature = "tracing")]
        debug!(queue = %self.cfg, "starting queue run");

        let mut production = AbortOnDrop(tokio::spawn(crate::producer::run(
            Arc::clone(&self.buffer),
            producer,
            self.cfg.name.clone(),
        )));
        let mut consumption = AbortOnDrop(tokio::spawn(crate::consumer::run(
            Arc::clone(&self.buffer),
            consumer,
            self.cfg.name.clone(),
        )));

        let finished = tokio::select! {
            joined = &mut production => Finished::Production(flatten(PRODUCER_TASK, joined)),
            joined = &mut consumption => Finished::Consumption(flatten(CONSUMER_TASK, joined)),
        };
        let (first, sibling, sibling_name) = match finished {
            Finished::Production(result) => (result, consumption, CONSUMER_TASK),
            Finished::Consumption(result) => (result, production, PRODUCER_TASK),
        };

        let outcome = match first {
            Ok(()) => flatten(sibling_name, sibling.await),
            Err(error) => {
                self.stop_sibling(sibling, sibling_name, &error).await;
                Err(error)
            }
        };

        let stats = self.buffer.stats();

        #[cfg(feature = "tracing")]
        match &outcome {
            Ok(()) => debug!(queue = %self.cfg, %stats, "queue run finished"),
            Err(e) => warn!(queue = %self.cfg, %stats, error = %e, "queue run failed"),
        }

        outcome.map(|()| stats)
    }

    async fn stop_sibling(
        &self,
        sibling: AbortOnDrop,
        _name: &'static str,
        _cause: &QueueError,
    ) {
        #[cfg(feature = "tracing")]
        warn!(
            queue = %self.cfg,
            task = _name,
            error = %_cause,
            "stopping sibling task after failure"
        );

        self.buffer.abort();
        sibling.0.abort();
        // Ok(()) after observing the abort, or a cancellation JoinError
        let _ = sibling.await;
    }
}

/// Task handle that aborts its task when dropped
///
/// Keeps the production and consumption tasks tied to the `run` future.
struct AbortOnDrop(JoinHandle<QueueResult<()>>);

impl Future for AbortOnDrop {
    type Output = Result<QueueResult<()>, JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        // No-op for a task that already finished
        self.0.abort();
    }
}

/// Which task the combined wait saw finish first
enum Finished {
    Production(QueueResult<()>),
    Consumption(QueueResult<()>),
}

fn flatten(
    task: &'static str,
    joined: Result<QueueResult<()>, JoinError>,
) -> QueueResult<()> {
    match joined {
        Ok(result) => result,
        Err(join_error) => Err(QueueError::from_join_error(task, join_error)),
    }
}

/// Read-only view of a queue's buffer
///
/// Cloneable and usable from any task. Snapshots taken after the run
/// reflect its final state.
pub struct QueueMonitor<T> {
    buffer: Arc<TokioBuffer<T>>,
}

impl<T: Send> QueueMonitor<T> {
    /// Items currently buffered
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn stats(&self) -> QueueStats {
        self.buffer.stats()
    }
}

impl<T> Clone for QueueMonitor<T> {
    fn clone(&self) -> Self {
        Self {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

/// Runs a bounded queue between `producer` and `consumer`
///
/// Shorthand for `TokioQueue::new(QueueCfg::new(max_size))?.run(producer, consumer)`.
///
/// # Example
/// ```rust
/// use handoff_core::BoxError;
/// use handoff_tokio_adapter::queue;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut lines = vec!["c", "b", "a"];
/// let stats = queue(
///     2,
///     move || {
///         let line = lines.pop();
///         async move { Ok::<_, BoxError>(line) }
///     },
///     |line: &'static str| async move {
///         println!("{line}");
///         Ok::<_, BoxError>(())
///     },
/// )
/// .await?;
/// assert_eq!(stats.consumed, 3);
/// # Ok(())
/// # }
/// ```
pub async fn queue<T, P, C>(max_size: usize, producer: P, consumer: C) -> QueueResult<QueueStats>
where
    T: Send + 'static,
    P: Producer<T> + 'static,
    C: Consumer<T> + 'static,
{
    TokioQueue::new(QueueCfg::new(max_size))?
        .run(producer, consumer)
        .await
}
