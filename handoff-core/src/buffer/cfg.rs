//! Queue configuration types

use core::fmt;

use crate::{QueueError, QueueResult};

/// Default bound used by [`QueueCfg::default`]
pub const DEFAULT_CAPACITY: usize = 16;

/// Default queue name used in logs and errors
pub const DEFAULT_QUEUE_NAME: &str = "queue";

/// Configuration for one queue run
///
/// `capacity` is the maximum number of items held between the production and
/// consumption tasks. `name` only labels log events and errors.
///
/// # Examples
/// ```rust
/// use handoff_core::QueueCfg;
///
/// let cfg = QueueCfg::new(64).with_name("thumbnails");
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg.to_string(), "thumbnails(capacity=64)");
///
/// assert!(QueueCfg::new(0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueCfg {
    /// Maximum number of buffered items
    pub capacity: usize,
    /// Label carried in log events and errors
    pub name: String,
}

impl QueueCfg {
    /// Creates a configuration with the given bound and the default name
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            name: DEFAULT_QUEUE_NAME.to_string(),
        }
    }

    /// Sets the queue name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Validates the configuration
    ///
    /// Returns `InvalidConfiguration` if capacity is 0, which would otherwise
    /// deadlock the production task on its first item.
    pub fn validate(&self) -> QueueResult<()> {
        if self.capacity == 0 {
            return Err(QueueError::invalid_configuration(
                "capacity",
                format!("queue {} capacity must be > 0", self.name),
            ));
        }
        Ok(())
    }
}

impl Default for QueueCfg {
    /// Returns capacity 16 with the name `"queue"`
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Display for QueueCfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(capacity={})", self.name, self.capacity)
    }
}
