//! Buffer data model
//!
//! - [`QueueCfg`]: the bound and label of one queue
//! - [`BufferState`]: the FIFO, flags and counters shared by the two tasks
//! - [`QueueStats`]: a copyable snapshot of that state
//!
//! Waiting and waking belong to the runtime adapter, which wraps
//! [`BufferState`] in a mutex next to its notifier.

mod cfg;
mod state;
mod stats;

pub use cfg::{QueueCfg, DEFAULT_CAPACITY, DEFAULT_QUEUE_NAME};
pub use state::{BufferState, Popped, Pushed};
pub use stats::QueueStats;
