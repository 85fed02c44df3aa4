//! Queue configuration

use serde::Deserialize;

/// Construction options for a queue
///
/// Deserialises from the `[queue]` table of the application config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueConfig {
    /// Label used in log records
    pub name: String,
    /// Sequence number assigned to the first pushed value
    pub initial_sequence: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: "queue".to_string(),
            initial_sequence: 0,
        }
    }
}

impl QueueConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_initial_sequence(mut self, seq: u64) -> Self {
        self.initial_sequence = seq;
        self
    }
}
