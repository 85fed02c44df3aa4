//! Test modules for the queue system
//!
//! Scenario suites driving the coordinated queue through its public
//! handles, organised by functional area.

mod concurrent;
mod consumer;
mod edge_cases;
