//! Batch progress events
//!
//! The orchestrator publishes a `BatchEvent` after starting and after
//! finishing every job. Each event carries a full copy of the run snapshot, so
//! subscribers never need access to the orchestrator's state and can never
//! mutate it.

use crate::batch::BatchRun;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Progress event for one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BatchEvent {
    /// Run accepted; every job pending
    RunStarted { snapshot: BatchRun },

    /// Job `index` is now in flight
    JobStarted {
        index: usize,
        filename: String,
        snapshot: BatchRun,
    },

    /// Job `index` reached a terminal state
    JobFinished {
        index: usize,
        filename: String,
        /// `None` on success, the surfaced diagnostic on failure
        error: Option<String>,
        snapshot: BatchRun,
    },

    /// All jobs have an outcome; the orchestrator is idle again
    RunCompleted { snapshot: BatchRun },
}

impl BatchEvent {
    /// Snapshot carried by this event
    pub fn snapshot(&self) -> &BatchRun {
        match self {
            BatchEvent::RunStarted { snapshot }
            | BatchEvent::JobStarted { snapshot, .. }
            | BatchEvent::JobFinished { snapshot, .. }
            | BatchEvent::RunCompleted { snapshot } => snapshot,
        }
    }
}

/// Broadcast bus for batch progress
///
/// Any number of read-only subscribers. Subscribers that fall more than
/// `capacity` events behind lose the oldest events.
#[derive(Clone)]
pub struct BatchEventBus {
    tx: broadcast::Sender<BatchEvent>,
    capacity: usize,
}

impl BatchEventBus {
    /// Creates a new bus with the specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use callgrade_common::events::BatchEventBus;
    ///
    /// let bus = BatchEventBus::new(64);
    /// assert_eq!(bus.capacity(), 64);
    /// ```
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

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: BatchEvent,
    ) -> Result<usize, broadcast::error::SendError<BatchEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: BatchEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("No subscribers for batch event");
        }
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for BatchEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
