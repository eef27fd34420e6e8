//! Production task
//!
//! Pulls items from the external [`Producer`] and pushes them into the
//! shared buffer until the producer returns its end-of-stream sentinel:
//!
//! ```text
//! Filling -> WaitingForSpace -> Filling -> ... -> Ended
//! ```

use std::sync::Arc;

use handoff_core::{Producer, QueueError, QueueResult};

use crate::buffer::TokioBuffer;

/// Runs the production loop to completion
///
/// Returns `Ok(())` after end of stream, or after the run was aborted by a
/// failing consumer (that failure is reported by the orchestrator).
pub(crate) async fn run<T, P>(
    buffer: Arc<TokioBuffer<T>>,
    mut producer: P,
    queue: String,
) -> QueueResult<()>
where
    T: Send + 'static,
    P: Producer<T>,
{
    loop {
        let item = match producer.next().await {
            Ok(Some(item)) => item,
            Ok(None) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    queue = %queue,
                    pushed = buffer.stats().pushed,
                    "producer reached end of stream"
                );

                buffer.mark_end_of_production();
                return Ok(());
            }
            Err(source) => {
                return Err(QueueError::ProducerFailed {
                    queue,
                    stats: buffer.stats(),
                    source,
                });
            }
        };

        if !buffer.push(item).await {
            #[cfg(feature = "tracing")]
            tracing::debug!(queue = %queue, "production stopped by abort");

            return Ok(());
        }
    }
}
