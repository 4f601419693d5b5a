//! Event types for the PhotoStream event system
//!
//! Provides shared event definitions and the EventBus used to fan gallery
//! changes out to SSE subscribers.

use crate::model::PhotoRecord;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Gallery event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
/// The serialized form carries a `type` tag so browser-side listeners can
/// dispatch without inspecting the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GalleryEvent {
    /// A photo was recorded in the collection
    ///
    /// Emitted after the record is in memory and the save attempt completed,
    /// whether or not analysis produced results.
    PhotoAdded {
        /// The recorded photo, including any analysis results
        photo: PhotoRecord,
        /// Whether analysis succeeded for this photo
        analyzed: bool,
        /// When the photo was recorded
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A delete request was processed
    ///
    /// Emitted for every delete request, including requests naming an id
    /// that was not present (`removed` is false in that case).
    PhotoDeleted {
        /// Id named by the delete request
        photo_id: Uuid,
        /// Whether a record was actually removed
        removed: bool,
        /// When the delete was processed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Analysis failed for an upload; the photo was still recorded
    AnalysisFailed {
        /// Id of the photo the failure belongs to
        photo_id: Uuid,
        /// File name of the upload, for display
        name: String,
        /// User-facing failure message (also stored on the record)
        message: String,
        /// When the failure was observed
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl GalleryEvent {
    /// Get event type as string for SSE event naming and filtering
    pub fn event_type(&self) -> &str {
        match self {
            GalleryEvent::PhotoAdded { .. } => "PhotoAdded",
            GalleryEvent::PhotoDeleted { .. } => "PhotoDeleted",
            GalleryEvent::AnalysisFailed { .. } => "AnalysisFailed",
        }
    }
}

/// Broadcast channel for gallery events
///
/// Cloning the bus is cheap; all clones share one underlying channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<GalleryEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use photostream_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Channel capacity this bus was created with
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<GalleryEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: GalleryEvent,
    ) -> Result<usize, broadcast::error::SendError<GalleryEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring whether anyone is listening
    ///
    /// Gallery mutations succeed with or without SSE subscribers, so the
    /// emitters use this form.
    ///
    /// # Examples
    ///
    /// ```
    /// use photostream_common::events::{EventBus, GalleryEvent};
    /// use uuid::Uuid;
    ///
    /// let event_bus = EventBus::new(100);
    ///
    /// event_bus.emit_lossy(GalleryEvent::PhotoDeleted {
    ///     photo_id: Uuid::new_v4(),
    ///     removed: true,
    ///     timestamp: chrono::Utc::now(),
    /// });
    /// ```
    pub fn emit_lossy(&self, event: GalleryEvent) {
        let _ = self.tx.send(event);
    }
}
