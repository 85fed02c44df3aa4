//! Application module
//!
//! The `seqqueue` binary: a line relay that forwards input through a
//! [`SequencedQueue`](crate::queue::SequencedQueue) with at-least-once
//! delivery.

pub mod cli;
pub mod error;
pub mod relay;
pub mod startup;
