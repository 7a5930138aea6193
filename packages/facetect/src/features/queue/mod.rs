//! Debounced update queue.
//!
//! Coalesces file-change notifications into at most one pending re-scan
//! per key. The queue is the engine's only asynchrony boundary: a
//! superseded pending task is discarded, never partially executed.

pub mod config;
mod update_queue;

pub use update_queue::{ExecutionMode, UpdateQueue};
