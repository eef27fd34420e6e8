//! Consumption task
//!
//! Pops items in FIFO order and awaits the external [`Consumer`] on each one
//! before popping the next:
//!
//! ```text
//! Draining -> WaitingForItem -> Draining -> ... -> Ended
//! ```

use std::sync::Arc;

use handoff_core::{Consumer, Popped, QueueError, QueueResult};

use crate::buffer::TokioBuffer;

/// Runs the consumption loop to completion
///
/// Returns `Ok(())` once production has ended and the buffer is empty, or
/// after the run was aborted by a failing producer.
pub(crate) async fn run<T, C>(
    buffer: Arc<TokioBuffer<T>>,
    mut consumer: C,
    queue: String,
) -> QueueResult<()>
where
    T: Send + 'static,
    C: Consumer<T>,
{
    loop {
        let item = match buffer.pop().await {
            Popped::Item(item) => item,
            Popped::Drained => {
                #[cfg(feature = "tracing")]
                tracing::debug!(queue = %queue, "consumer drained buffer");

                return Ok(());
            }
            Popped::Aborted => {
                #[cfg(feature = "tracing")]
                tracing::debug!(queue = %queue, "consumption stopped by abort");

                return Ok(());
            }
            // pop() waits instead of reporting an empty buffer
            Popped::Empty => continue,
        };

        if let Err(source) = consumer.handle(item).await {
            return Err(QueueError::ConsumerFailed {
                queue,
                stats: buffer.stats(),
                source,
            });
        }
        buffer.record_consumed();
    }
}
