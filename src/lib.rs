//! Acknowledgment-gated sequenced delivery queue
//!
//! See [`queue`] for the queue itself and [`app`] for the relay binary
//! built on it.

pub mod app;
pub mod core;
pub mod queue;
