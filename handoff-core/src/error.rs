//! Error handling for handoff queue runs
//!
//! A run can fail in exactly three ways that callers are expected to handle:
//!
//! - **Configuration**: the queue was set up with an unusable bound
//! - **Producer**: the external producer failed while fetching the next item
//! - **Consumer**: the external consumer failed while handling an item
//!
//! Two further variants describe the execution environment rather than the
//! callables: a task that panicked or was cancelled from outside, and a
//! runtime that could not be started by the blocking wrapper.
//!
//! # Error Code System
//!
//! Each variant carries a stable numeric code, grouped by category:
//!
//! - **Configuration** (0x4000-0x4FFF)
//! - **Internal / runtime** (0x7000-0x7FFF)
//! - **Callable failures** (0xB000-0xBFFF)
//!
//! # Diagnostics
//!
//! Producer and consumer failures carry a [`QueueStats`] snapshot taken at the
//! moment of failure, so items that were popped but never finished are still
//! visible to the caller:
//!
//! ```rust
//! use handoff_core::{QueueError, QueueStats};
//!
//! fn report(error: &QueueError) {
//!     if let Some(stats) = error.stats() {
//!         eprintln!(
//!             "{} items never completed ({} in flight)",
//!             stats.incomplete(),
//!             stats.in_flight()
//!         );
//!     }
//! }
//! # let _ = report;
//! # let _ = QueueStats::default();
//! ```

use thiserror::Error;

use crate::buffer::QueueStats;

/// Boxed error returned by external producers and consumers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error type for all handoff operations
#[derive(Debug, Error)]
pub enum QueueError {
    /// A configuration value is unusable, e.g. a zero capacity bound
    #[error("Invalid configuration for {parameter}: {reason}")]
    InvalidConfiguration { parameter: String, reason: String },

    /// The producer failed while fetching the next item
    ///
    /// The consumption task has already been stopped when this is returned.
    #[error("Producer failed on queue {queue} after {} items: {source}", .stats.pushed)]
    ProducerFailed {
        queue: String,
        stats: QueueStats,
        #[source]
        source: BoxError,
    },

    /// The consumer failed while handling an item
    ///
    /// The failed item is counted in `stats.in_flight()`. The production task
    /// has already been stopped when this is returned.
    #[error("Consumer failed on queue {queue} after {} items: {source}", .stats.consumed)]
    ConsumerFailed {
        queue: String,
        stats: QueueStats,
        #[source]
        source: BoxError,
    },

    /// A task panicked or was cancelled from outside the queue
    #[error("Task {task} failed: {reason}")]
    TaskFailed { task: &'static str, reason: String },

    /// Runtime execution errors (runtime construction, scheduling)
    #[error("Runtime error: {message}")]
    RuntimeError { message: String },
}

impl QueueError {
    /// Creates an `InvalidConfiguration` error
    pub fn invalid_configuration(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        QueueError::InvalidConfiguration {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the external producer caused this error
    pub fn is_producer_failure(&self) -> bool {
        matches!(self, QueueError::ProducerFailed { .. })
    }

    /// Returns true if the external consumer caused this error
    pub fn is_consumer_failure(&self) -> bool {
        matches!(self, QueueError::ConsumerFailed { .. })
    }

    /// Returns true if the queue was rejected before starting
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, QueueError::InvalidConfiguration { .. })
    }

    /// Buffer accounting captured when a callable failed
    pub fn stats(&self) -> Option<&QueueStats> {
        match self {
            QueueError::ProducerFailed { stats, .. } | QueueError::ConsumerFailed { stats, .. } => {
                Some(stats)
            }
            _ => None,
        }
    }

    /// Returns a stable numeric code for this error
    ///
    /// ```rust
    /// use handoff_core::QueueError;
    ///
    /// let error = QueueError::invalid_configuration("capacity", "must be > 0");
    /// assert_eq!(error.error_code(), 0x4001);
    /// assert_eq!(error.error_category(), 0x4000);
    /// ```
    pub const fn error_code(&self) -> u32 {
        match self {
            // Configuration errors: 0x4000-0x4FFF
            QueueError::InvalidConfiguration { .. } => 0x4001,

            // Internal errors: 0x7000-0x7FFF
            QueueError::RuntimeError { .. } => 0x7002,
            QueueError::TaskFailed { .. } => 0x7003,

            // Callable errors: 0xB000-0xBFFF
            QueueError::ProducerFailed { .. } => 0xB001,
            QueueError::ConsumerFailed { .. } => 0xB002,
        }
    }

    /// Returns the error category based on the error code
    pub const fn error_category(&self) -> u32 {
        self.error_code() & 0xF000
    }

    fn prepend_context<S: Into<String>>(existing: &mut String, new_context: S) {
        let new_context = new_context.into();
        existing.insert_str(0, ": ");
        existing.insert_str(0, &new_context);
    }

    /// Adds context to the textual part of an error
    ///
    /// ```rust
    /// use handoff_core::QueueError;
    ///
    /// let error = QueueError::invalid_configuration("capacity", "must be > 0")
    ///     .with_context("Loading ingest queue");
    /// assert_eq!(
    ///     error.to_string(),
    ///     "Invalid configuration for capacity: Loading ingest queue: must be > 0"
    /// );
    /// ```
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        match self {
            QueueError::InvalidConfiguration {
                parameter,
                mut reason,
            } => {
                Self::prepend_context(&mut reason, context);
                QueueError::InvalidConfiguration { parameter, reason }
            }
            QueueError::ProducerFailed {
                mut queue,
                stats,
                source,
            } => {
                Self::prepend_context(&mut queue, context);
                QueueError::ProducerFailed {
                    queue,
                    stats,
                    source,
                }
            }
            QueueError::ConsumerFailed {
                mut queue,
                stats,
                source,
            } => {
                Self::prepend_context(&mut queue, context);
                QueueError::ConsumerFailed {
                    queue,
                    stats,
                    source,
                }
            }
            QueueError::TaskFailed { task, mut reason } => {
                Self::prepend_context(&mut reason, context);
                QueueError::TaskFailed { task, reason }
            }
            QueueError::RuntimeError { mut message } => {
                Self::prepend_context(&mut message, context);
                QueueError::RuntimeError { message }
            }
        }
    }

    /// Converts this error into an `anyhow::Error` for application boundaries
    pub fn into_anyhow(self) -> anyhow::Error {
        self.into()
    }
}

/// Type alias for Results using QueueError
pub type QueueResult<T> = Result<T, QueueError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn consumer_failure() -> QueueError {
        QueueError::ConsumerFailed {
            queue: "ingest".to_string(),
            stats: QueueStats {
                capacity: 5,
                len: 2,
                pushed: 6,
                popped: 4,
                consumed: 3,
                ..QueueStats::default()
            },
            source: "disk full".into(),
        }
    }

    #[test]
    fn test_error_codes() {
        let producer = QueueError::ProducerFailed {
            queue: "q".to_string(),
            stats: QueueStats::default(),
            source: "boom".into(),
        };
        assert_eq!(producer.error_code(), 0xB001);
        assert_eq!(consumer_failure().error_code(), 0xB002);
        assert_eq!(
            QueueError::invalid_configuration("capacity", "zero").error_code(),
            0x4001
        );
        assert_eq!(
            QueueError::RuntimeError {
                message: String::new()
            }
            .error_category(),
            0x7000
        );
        assert_eq!(
            QueueError::TaskFailed {
                task: "producer",
                reason: String::new()
            }
            .error_code(),
            0x7003
        );
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(
            consumer_failure().to_string(),
            "Consumer failed on queue ingest after 3 items: disk full"
        );
        assert_eq!(
            QueueError::TaskFailed {
                task: "consumer",
                reason: "task panicked".to_string()
            }
            .to_string(),
            "Task consumer failed: task panicked"
        );
    }

    #[test]
    fn test_source_is_preserved() {
        let error = consumer_failure();
        let source = error.source().expect("consumer failure has a source");
        assert_eq!(source.to_string(), "disk full");
    }

    #[test]
    fn test_stats_accessor() {
        let error = consumer_failure();
        let stats = error.stats().unwrap();
        assert_eq!(stats.in_flight(), 1);
        assert_eq!(stats.incomplete(), 3);
        assert!(error.is_consumer_failure());
        assert!(!error.is_producer_failure());

        assert!(QueueError::invalid_configuration("capacity", "zero")
            .stats()
            .is_none());
    }

    #[test]
    fn test_with_context_chaining() {
        let error = consumer_failure()
            .with_context("batch 7")
            .with_context("nightly import");
        match &error {
            QueueError::ConsumerFailed { queue, .. } => {
                assert_eq!(queue, "nightly import: batch 7: ingest");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        assert!(error.source().is_some());
    }

    #[test]
    fn test_anyhow_integration() {
        fn application_boundary() -> anyhow::Result<()> {
            Err(QueueError::invalid_configuration("capacity", "must be > 0").into_anyhow())
        }

        let error = application_boundary().unwrap_err();
        assert!(error.downcast_ref::<QueueError>().is_some());
    }
}
