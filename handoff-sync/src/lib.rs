//! # Handoff Sync API
//!
//! Blocking entry point for the handoff queue. Lets plain threads and
//! `fn main()` programs run a bounded producer/consumer handoff without
//! setting up an async runtime themselves.
//!
//! ## Architecture
//!
//! ```text
//! caller thread  →  block_on  →  Runtime ("handoff-sync-runtime")
//!                                   ↓
//!                               TokioQueue (async)
//!                                   ↓
//!                          spawn_blocking per call
//!                                   ↓
//!                      producer closure / consumer closure
//! ```
//!
//! The closures keep the same contract as their async counterparts: the
//! producer returns `Ok(None)` at end of stream and any `Err` ends the run.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut readings = (1..=5u32).map(|n| n * 10);
//! let stats = handoff_sync::queue_blocking(
//!     2,
//!     move || Ok::<_, std::io::Error>(readings.next()),
//!     |reading: u32| {
//!         std::thread::sleep(Duration::from_millis(1));
//!         println!("stored {reading}");
//!         Ok::<_, std::io::Error>(())
//!     },
//! )?;
//! assert_eq!(stats.consumed, 5);
//! # Ok(())
//! # }
//! ```
//!
//! ## Threading Model
//!
//! - **Caller thread**: blocked in `block_on` for the duration of a run
//! - **Runtime threads**: two workers plus the blocking pool, all named
//!   "handoff-sync-runtime"
//!
//! Calling into this crate from inside an async context panics, as does any
//! nested `block_on`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod consumer;
mod handle;
mod in_flight;
mod producer;

pub use handle::{queue_blocking, SyncQueue, RUNTIME_THREAD_NAME};

pub use handoff_core::{BoxError, QueueCfg, QueueError, QueueResult, QueueStats};
