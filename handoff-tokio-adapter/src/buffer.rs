//! Tokio buffer implementation
//!
//! [`TokioBuffer`] pairs the core [`BufferState`] with a waiter set:
//!
//! - **State**: `std::sync::Mutex<BufferState<T>>`, locked only for short,
//!   non-async critical sections
//! - **Waiter set**: `tokio::sync::Notify`, woken with `notify_waiters()` so
//!   every suspended task re-checks its condition (notify-all, no targeted
//!   wakeup)
//!
//! A waiter registers with the notifier *before* inspecting the state, so a
//! notification sent between the check and the suspension is never lost.

use std::pin::pin;
use std::sync::{Mutex as StdMutex, MutexGuard, PoisonError};

use handoff_core::{BufferState, Popped, Pushed, QueueCfg, QueueStats};
use tokio::sync::Notify;

/// Bounded FIFO shared by the production and consumption tasks
pub struct TokioBuffer<T> {
    state: StdMutex<BufferState<T>>,
    waiters: Notify,
}

impl<T: Send> TokioBuffer<T> {
    /// Creates an empty buffer. `cfg` must already be validated.
    pub fn new(cfg: &QueueCfg) -> Self {
        Self {
            state: StdMutex::new(BufferState::new(cfg)),
            waiters: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BufferState<T>> {
        // No critical section can leave the state half-updated
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wakes every task currently suspended in [`wait_for`](Self::wait_for)
    pub fn notify_all(&self) {
        self.waiters.notify_waiters();
    }

    /// Suspends until `condition` returns `Some`
    ///
    /// `condition` runs with the state locked, once immediately and again
    /// after every notification. Wakeups carry no information about what
    /// changed; returning `None` simply waits for the next one.
    pub async fn wait_for<R>(
        &self,
        mut condition: impl FnMut(&mut BufferState<T>) -> Option<R>,
    ) -> R {
        loop {
            let mut notified = pin!(self.waiters.notified());
            notified.as_mut().enable();

            let ready = {
                let mut state = self.lock();
                condition(&mut state)
            };
            if let Some(ready) = ready {
                return ready;
            }

            #[cfg(feature = "tracing")]
            tracing::trace!("buffer waiter suspended");

            notified.await;
        }
    }

    /// Appends `item`, waiting while the buffer is at capacity
    ///
    /// Returns `false` if the run was aborted instead; the item is dropped.
    pub async fn push(&self, item: T) -> bool {
        let mut pending = Some(item);
        let accepted = self
            .wait_for(|state| {
                // Refilled below whenever the buffer is full
                let item = pending.take()?;
                match state.push(item) {
                    Pushed::Accepted => Some(true),
                    Pushed::Aborted => Some(false),
                    Pushed::Full(item) => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(
                            len = state.len(),
                            capacity = state.capacity(),
                            "buffer full, producer waiting for space"
                        );

                        pending = Some(item);
                        None
                    }
                }
            })
            .await;

        if accepted {
            self.notify_all();
        }
        accepted
    }

    /// Removes the head, waiting while the buffer is empty and production
    /// has not ended
    ///
    /// Never returns [`Popped::Empty`].
    pub async fn pop(&self) -> Popped<T> {
        let popped = self
            .wait_for(|state| match state.pop() {
                Popped::Empty => None,
                other => Some(other),
            })
            .await;

        if matches!(popped, Popped::Item(_)) {
            self.notify_all();
        }
        popped
    }

    /// Sets the end-of-production flag and wakes all waiters
    pub fn mark_end_of_production(&self) {
        self.lock().mark_end_of_production();
        self.notify_all();
    }

    /// Stops the run and wakes all waiters
    ///
    /// Every suspended or later `push`/`pop` returns immediately.
    pub fn abort(&self) {
        self.lock().abort();
        self.notify_all();
    }

    /// Records that the consumer finished one popped item
    pub fn record_consumed(&self) {
        self.lock().record_consumed();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    pub fn stats(&self) -> QueueStats {
        self.lock().stats()
    }
}
