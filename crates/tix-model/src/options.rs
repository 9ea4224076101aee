//! Options controlling ticket resolution.

use serde::{Deserialize, Serialize};

/// Where a ticket's `current_status` comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSource {
    /// Status of the newest history event.
    #[default]
    History,
    /// The ticket's top-level `status` field only.
    Ticket,
    /// The top-level field when present, otherwise the history.
    PreferTicket,
}

/// Options for the batch transform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    pub status_source: StatusSource,
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status_source(mut self, status_source: StatusSource) -> Self {
        self.status_source = status_source;
        self
    }
}
