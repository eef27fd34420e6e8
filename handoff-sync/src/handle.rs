//! Owned runtime for blocking queue runs

use handoff_core::{BoxError, QueueCfg, QueueError, QueueResult, QueueStats};
use handoff_tokio_adapter::{TokioErrorSupport, TokioQueue};
use tokio::runtime::Runtime;

use crate::consumer::BlockingConsumer;
use crate::in_flight::InFlight;
use crate::producer::BlockingProducer;

/// Name given to every runtime worker and blocking-pool thread
pub const RUNTIME_THREAD_NAME: &str = "handoff-sync-runtime";

const WORKER_THREADS: usize = 2;

/// A queue configuration bound to its own multi-threaded tokio runtime
///
/// The runtime is created once and reused by every [`run`](Self::run); it is
/// shut down when the `SyncQueue` is dropped.
///
/// # Example
///
/// ```rust
/// use handoff_core::QueueCfg;
/// use handoff_sync::SyncQueue;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = SyncQueue::new(QueueCfg::new(2).with_name("lines"))?;
///
/// let mut lines = vec!["b", "a"];
/// let mut seen = Vec::new();
/// let stats = queue.run(
///     move || Ok::<_, std::io::Error>(lines.pop()),
///     move |line: &'static str| {
///         seen.push(line);
///         Ok::<_, std::io::Error>(())
///     },
/// )?;
/// assert_eq!(stats.consumed, 2);
/// # Ok(())
/// # }
/// ```
pub struct SyncQueue {
    cfg: QueueCfg,
    runtime: Runtime,
}

impl SyncQueue {
    /// Validates `cfg` and starts the runtime
    ///
    /// # Errors
    ///
    /// - `QueueError::InvalidConfiguration` if the capacity is 0
    /// - `QueueError::RuntimeError` if the runtime fails to start
    pub fn new(cfg: QueueCfg) -> QueueResult<Self> {
        cfg.validate()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(WORKER_THREADS)
            .thread_name(RUNTIME_THREAD_NAME)
            .enable_all()
            .build()
            .map_err(QueueError::from_runtime_build_error)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(queue = %cfg, "sync queue runtime started");

        Ok(Self { cfg, runtime })
    }

    /// The validated configuration every run uses
    pub fn cfg(&self) -> &QueueCfg {
        &self.cfg
    }

    /// Runs `producer` and `consumer` to completion, blocking the caller
    ///
    /// Both closures run on the runtime's blocking pool. When one side fails
    /// while the other is inside a blocking call, this method waits for that
    /// call to return; the closure is not called again afterwards.
    ///
    /// # Errors
    ///
    /// Same as `TokioQueue::run`.
    ///
    /// # Panics
    ///
    /// If called from within an async execution context.
    pub fn run<T, P, C, PE, CE>(&self, producer: P, consumer: C) -> QueueResult<QueueStats>
    where
        T: Send + 'static,
        P: FnMut() -> Result<Option<T>, PE> + Send + 'static,
        C: FnMut(T) -> Result<(), CE> + Send + 'static,
        PE: Into<BoxError> + Send + 'static,
        CE: Into<BoxError> + Send + 'static,
    {
        let queue = TokioQueue::new(self.cfg.clone())?;
        let in_flight = InFlight::new();

        self.runtime.block_on(async {
            let result = queue
                .run(
                    BlockingProducer::new(producer, in_flight.clone()),
                    BlockingConsumer::new(consumer, in_flight.clone()),
                )
                .await;
            in_flight.wait_idle().await;
            result
        })
    }
}

/// Runs a bounded queue between two blocking closures
///
/// Shorthand for `SyncQueue::new(QueueCfg::new(max_size))?.run(producer, consumer)`;
/// the runtime lives only for this call.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut remaining = 3u32;
/// let stats = handoff_sync::queue_blocking(
///     1,
///     move || {
///         let item = (remaining > 0).then_some(remaining);
///         remaining = remaining.saturating_sub(1);
///         Ok::<_, std::io::Error>(item)
///     },
///     |n: u32| {
///         println!("countdown {n}");
///         Ok::<_, std::io::Error>(())
///     },
/// )?;
/// assert_eq!(stats.pushed, 3);
/// # Ok(())
/// # }
/// ```
pub fn queue_blocking<T, P, C, PE, CE>(
    max_size: usize,
    producer: P,
    consumer: C,
) -> QueueResult<QueueStats>
where
    T: Send + 'static,
    P: FnMut() -> Result<Option<T>, PE> + Send + 'static,
    C: FnMut(T) -> Result<(), CE> + Send + 'static,
    PE: Into<BoxError> + Send + 'static,
    CE: Into<BoxError> + Send + 'static,
{
    SyncQueue::new(QueueCfg::new(max_size))?.run(producer, consumer)
}
