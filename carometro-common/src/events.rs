//! Roster event types and broadcast bus
//!
//! Events are broadcast to SSE clients so that every open page sees imports
//! and saved photos, not only the tab that triggered them.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::roster::ImportSummary;

/// Roster change notification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RosterEvent {
    /// The roster was replaced by a CSV import
    RosterImported {
        imported: usize,
        headers_skipped: usize,
        malformed_lines: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A photo was written and the matching records updated
    PhotoSaved {
        matricula: String,
        name: String,
        /// Public path of the saved photo
        path: String,
        /// Roster records that now point at `path`
        records_updated: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl RosterEvent {
    pub fn roster_imported(summary: &ImportSummary) -> Self {
        RosterEvent::RosterImported {
            imported: summary.imported,
            headers_skipped: summary.headers_skipped,
            malformed_lines: summary.malformed_lines,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Get event type as string for SSE `event:` field
    pub fn event_type(&self) -> &str {
        match self {
            RosterEvent::RosterImported { .. } => "RosterImported",
            RosterEvent::PhotoSaved { .. } => "PhotoSaved",
        }
    }
}

/// Broadcast channel for [`RosterEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<RosterEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// Slow subscribers lose the oldest events once `capacity` is exceeded.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<RosterEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// No open page is a normal state, not an error.
    pub fn emit_lossy(&self, event: RosterEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
