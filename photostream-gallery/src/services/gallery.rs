//! Gallery controller
//!
//! Owns the in-memory photo collection and coordinates the upload pipeline:
//! validate the payload, decode it, request analysis, record the photo, and
//! mirror the collection to disk. Analysis failure never rejects an upload;
//! the photo is recorded with an error note instead.

use photostream_common::datauri::DataUri;
use photostream_common::events::{EventBus, GalleryEvent};
use photostream_common::PhotoRecord;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{DeleteReceipt, UploadReceipt, UploadState};
use crate::services::{AnalysisClient, PhotoStore};

/// User-facing message when the declared type is not an image
pub const NOT_AN_IMAGE_MESSAGE: &str = "Please select an image file.";

/// User-facing message when the payload cannot be read
pub const UPLOAD_FAILED_MESSAGE: &str =
    "There was an error uploading your photo. Please try again.";

/// Message stored on a record whose analysis failed
pub const ANALYSIS_FAILED_MESSAGE: &str = "AI analysis failed or took too long.";

/// Errors that abort an upload before a photo is recorded
#[derive(Debug, Error)]
pub enum UploadError {
    /// Declared media type is not an image type
    #[error("Not an image (declared type: {declared:?})")]
    NotAnImage { declared: String },

    /// Payload could not be parsed or decoded
    #[error("Unreadable payload: {0}")]
    UnreadablePayload(String),
}

/// The photo gallery: in-memory collection plus its disk mirror
pub struct Gallery {
    photos: RwLock<Vec<PhotoRecord>>,
    store: PhotoStore,
    analysis: AnalysisClient,
    event_bus: EventBus,
}

impl Gallery {
    /// Open the gallery, loading the persisted collection
    pub async fn open(store: PhotoStore, analysis: AnalysisClient, event_bus: EventBus) -> Self {
        let photos = store.load().await;
        tracing::info!(count = photos.len(), "Photo collection loaded");

        Self {
            photos: RwLock::new(photos),
            store,
            analysis,
            event_bus,
        }
    }

    /// Snapshot of the collection, newest first
    pub async fn photos(&self) -> Vec<PhotoRecord> {
        self.photos.read().await.clone()
    }

    /// Run the upload pipeline for one image payload
    ///
    /// The returned receipt carries the recorded photo and whether analysis
    /// succeeded. Only validation and read failures produce an error; once
    /// the payload is readable the photo is always recorded.
    pub async fn upload(&self, name: &str, data_uri: &str) -> Result<UploadReceipt, UploadError> {
        let mut state = UploadState::Idle;

        // Declared media type is checked before the payload bytes are touched
        let payload = DataUri::parse(data_uri).map_err(|e| {
            tracing::warn!(upload = %name, error = %e, "Rejected unreadable upload payload");
            UploadError::UnreadablePayload(e.to_string())
        })?;

        if !payload.is_image() {
            tracing::warn!(
                upload = %name,
                declared = payload.mime(),
                "Rejected upload with non-image declared type"
            );
            return Err(UploadError::NotAnImage {
                declared: payload.mime().to_string(),
            });
        }

        log_transition(name, &mut state, UploadState::Uploading);

        // Decoding proves the payload is readable; the record keeps the
        // encoded form as its url
        let bytes = match payload.decode() {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(upload = %name, error = %e, "Upload payload failed to decode");
                log_transition(name, &mut state, UploadState::Idle);
                return Err(UploadError::UnreadablePayload(e.to_string()));
            }
        };
        tracing::debug!(upload = %name, bytes = bytes.len(), "Upload payload decoded");

        // Analysis is best effort; failure becomes an error note on the record
        let analysis = match self.analysis.analyze(&payload).await {
            Ok(analysis) => {
                log_transition(name, &mut state, UploadState::AnalyzingSucceeded);
                Some(analysis)
            }
            Err(e) => {
                tracing::warn!(upload = %name, error = %e, "Photo analysis failed");
                log_transition(name, &mut state, UploadState::AnalyzingFailed);
                None
            }
        };

        let mut photo = PhotoRecord::new(name, data_uri.to_string());
        match analysis {
            Some(analysis) => {
                photo.tags = analysis.tags;
                photo.suggested_date_taken = analysis.suggested_date_taken;
            }
            None => photo.ai_error = Some(ANALYSIS_FAILED_MESSAGE.to_string()),
        }
        let analyzed = photo.ai_error.is_none();

        {
            // Newest first. The mirror is written inside the guard so disk
            // order always matches memory order, and events go out in the
            // same order the collection changed.
            let mut photos = self.photos.write().await;
            photos.insert(0, photo.clone());

            if let Err(e) = self.store.save(&photos).await {
                tracing::warn!(
                    error = %e,
                    "Failed to persist photo collection; keeping in-memory state"
                );
            }

            if let Some(message) = &photo.ai_error {
                self.event_bus.emit_lossy(GalleryEvent::AnalysisFailed {
                    photo_id: photo.id,
                    name: photo.name.clone(),
                    message: message.clone(),
                    timestamp: chrono::Utc::now(),
                });
            }
            self.event_bus.emit_lossy(GalleryEvent::PhotoAdded {
                photo: photo.clone(),
                analyzed,
                timestamp: chrono::Utc::now(),
            });
        }

        log_transition(name, &mut state, UploadState::Recorded);
        log_transition(name, &mut state, UploadState::Idle);

        tracing::info!(photo_id = %photo.id, upload = %name, analyzed, "Photo recorded");

        Ok(UploadReceipt { photo, analyzed })
    }

    /// Remove the photo with the given id, if present
    ///
    /// Every delete request rewrites the mirror and emits a PhotoDeleted
    /// event, whether or not the id was found.
    pub async fn delete(&self, photo_id: Uuid) -> DeleteReceipt {
        let removed;
        {
            let mut photos = self.photos.write().await;
            let before = photos.len();
            photos.retain(|p| p.id != photo_id);
            removed = photos.len() != before;

            if let Err(e) = self.store.save(&photos).await {
                tracing::warn!(
                    error = %e,
                    "Failed to persist photo collection; keeping in-memory state"
                );
            }

            self.event_bus.emit_lossy(GalleryEvent::PhotoDeleted {
                photo_id,
                removed,
                timestamp: chrono::Utc::now(),
            });
        }

        if removed {
            tracing::info!(photo_id = %photo_id, "Photo deleted");
        } else {
            tracing::debug!(photo_id = %photo_id, "Delete requested for unknown photo id");
        }

        DeleteReceipt { photo_id, removed }
    }
}

fn log_transition(name: &str, state: &mut UploadState, next: UploadState) {
    tracing::debug!(upload = %name, from = ?*state, to = ?next, "Upload state transition");
    *state = next;
}
