//! Event types for the genrefit batch pipeline
//!
//! Progress is delivered as broadcast events so a caller (CLI, UI bridge)
//! can render live feedback without the orchestrator knowing about it.
//! Events are serializable for forwarding over a wire if a front-end wants
//! them.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Batch pipeline events
///
/// All events carry the batch id so interleaved listeners can attribute
/// them, and a timestamp for display ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BatchEvent {
    /// A batch run began
    BatchStarted {
        batch_id: Uuid,
        /// Number of tracks submitted
        track_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A track's extraction+scoring pass began
    ///
    /// `fraction` is tracks-started / tracks-total, suitable for a progress
    /// bar.
    TrackStarted {
        batch_id: Uuid,
        /// Zero-based submission index
        index: usize,
        filename: String,
        fraction: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A track was scored successfully
    TrackCompleted {
        batch_id: Uuid,
        index: usize,
        filename: String,
        fraction: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A track failed extraction and was skipped
    ///
    /// The batch continues; this is informational, not fatal.
    TrackFailed {
        batch_id: Uuid,
        index: usize,
        filename: String,
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The batch finished (all tracks attempted)
    BatchCompleted {
        batch_id: Uuid,
        succeeded: usize,
        failed: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The batch was cancelled before all tracks were attempted
    ///
    /// Results accumulated before cancellation remain valid.
    BatchCancelled {
        batch_id: Uuid,
        /// Tracks attempted before cancellation
        attempted: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Broadcast bus for [`BatchEvent`]s
///
/// Thin wrapper over `tokio::sync::broadcast`. Emission is lossy by design:
/// a batch run must not fail because nobody is listening to its progress.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BatchEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// Old events are dropped once the buffer fills; progress events are
    /// ephemeral so this is acceptable.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<BatchEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: BatchEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
