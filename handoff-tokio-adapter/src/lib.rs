//! Tokio Adapter for handoff
//!
//! Runs a bounded producer/consumer handoff on the Tokio runtime.
//!
//! # Architecture
//!
//! ```text
//!            TokioQueue::run
//!           /               \
//!   production task     consumption task      (tokio::spawn)
//!          |                  |
//!    Producer::next    Consumer::handle       (external callables)
//!           \               /
//!        TokioBuffer { Mutex<BufferState>, Notify }
//! ```
//!
//! - **Buffer Module**: `TokioBuffer`, the mutex-guarded FIFO plus its
//!   notify-all waiter set
//! - **Runtime Module**: `TokioQueue` orchestrator, `QueueMonitor` and the
//!   `queue()` entry point
//! - **Error Module**: conversions from tokio task/runtime errors
//!
//! Logging goes through `tracing` when the `tracing` feature is enabled.
//!
//! # Example
//!
//! ```rust
//! use handoff_core::BoxError;
//! use handoff_tokio_adapter::queue;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pages = 0..5u32;
//! let stats = queue(
//!     2,
//!     move || {
//!         let page = pages.next();
//!         async move { Ok::<_, BoxError>(page) }
//!     },
//!     |page: u32| async move {
//!         tokio::task::yield_now().await;
//!         println!("indexed page {page}");
//!         Ok::<_, BoxError>(())
//!     },
//! )
//! .await?;
//!
//! assert_eq!(stats.consumed, 5);
//! assert!(stats.high_water_mark <= 2);
//! # Ok(())
//! # }
//! ```

pub mod buffer;
mod consumer;
pub mod error;
mod producer;
pub mod runtime;

pub use buffer::TokioBuffer;
pub use error::TokioErrorSupport;
pub use runtime::{queue, QueueMonitor, TokioQueue};

pub use handoff_core::{
    BoxError, Consumer, Producer, QueueCfg, QueueError, QueueResult, QueueStats,
};
