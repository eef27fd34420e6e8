//! Handoff Core
//!
//! Runtime-agnostic building blocks for a bounded producer/consumer handoff:
//! one producer task fills a bounded FIFO, one consumer task drains it, and
//! the bound provides backpressure between them.
//!
//! This crate owns the data model and the contracts. Waiting, waking and task
//! spawning live in a runtime adapter (see `handoff-tokio-adapter`).
//!
//! # Contents
//!
//! - [`QueueCfg`]: capacity bound and queue name, validated before a run
//! - [`BufferState`]: FIFO, end-of-production and abort flags, accounting
//! - [`QueueStats`]: snapshot of the accounting
//! - [`Producer`] / [`Consumer`]: the two external capabilities
//! - [`QueueError`] / [`QueueResult`]: error taxonomy

#![warn(clippy::all)]

pub mod buffer;
mod error;
mod producer_consumer;

pub use buffer::{BufferState, Popped, Pushed, QueueCfg, QueueStats};
pub use error::{BoxError, QueueError, QueueResult};
pub use producer_consumer::{Consumer, Producer};
