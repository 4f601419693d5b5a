//! Photo collection API endpoints
//!
//! The photo payload travels as a data URI inside JSON, the same form the
//! browser produces with `FileReader.readAsDataURL`, so the record's stored
//! url is exactly what the client sent.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use photostream_common::PhotoRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::services::gallery::{NOT_AN_IMAGE_MESSAGE, UPLOAD_FAILED_MESSAGE};
use crate::services::UploadError;
use crate::AppState;

/// User notification attached to mutation responses
///
/// Mirrors what the UI shows as a toast: a short title, a sentence of
/// description, and a severity for styling.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: NoticeSeverity,
}

/// Notice severity for UI styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeSeverity {
    Success,
    Warning,
}

impl Notice {
    pub fn success(title: &str, description: String) -> Self {
        Self {
            title: title.to_string(),
            description,
            severity: NoticeSeverity::Success,
        }
    }

    pub fn warning(title: &str, description: String) -> Self {
        Self {
            title: title.to_string(),
            description,
            severity: NoticeSeverity::Warning,
        }
    }
}

/// POST /api/photos request body
#[derive(Debug, Deserialize)]
pub struct UploadPhotoRequest {
    /// Original file name
    pub name: String,
    /// Image payload as a data URI
    #[serde(rename = "dataUri")]
    pub data_uri: String,
}

/// GET /api/photos response
#[derive(Debug, Serialize)]
pub struct ListPhotosResponse {
    /// The collection, newest first
    pub photos: Vec<PhotoRecord>,
}

/// POST /api/photos response
#[derive(Debug, Serialize)]
pub struct UploadPhotoResponse {
    /// The recorded photo, including any analysis results
    pub photo: PhotoRecord,
    /// Whether analysis succeeded
    pub analyzed: bool,
    /// Notification for the UI
    pub notice: Notice,
}

/// DELETE /api/photos/:id response
#[derive(Debug, Serialize)]
pub struct DeletePhotoResponse {
    /// Whether a record was actually removed
    pub removed: bool,
    /// Notification for the UI
    pub notice: Notice,
}

/// GET /api/photos
///
/// List the photo collection, newest first
pub async fn list_photos(State(state): State<AppState>) -> Json<ListPhotosResponse> {
    let photos = state.gallery.photos().await;
    Json(ListPhotosResponse { photos })
}

/// POST /api/photos
///
/// Upload one photo. Returns 201 with the recorded photo; analysis failure
/// still records the photo and is reported via `analyzed` and the notice.
pub async fn upload_photo(
    State(state): State<AppState>,
    Json(request): Json<UploadPhotoRequest>,
) -> ApiResult<(StatusCode, Json<UploadPhotoResponse>)> {
    let receipt = state
        .gallery
        .upload(&request.name, &request.data_uri)
        .await
        .map_err(|e| match e {
            UploadError::NotAnImage { .. } => {
                ApiError::BadRequest(NOT_AN_IMAGE_MESSAGE.to_string())
            }
            UploadError::UnreadablePayload(_) => {
                ApiError::BadRequest(UPLOAD_FAILED_MESSAGE.to_string())
            }
        })?;

    if !receipt.analyzed {
        let mut last_error = state.last_error.write().await;
        *last_error = Some(format!("Analysis failed for upload {}", receipt.photo.name));
    }

    let notice = if receipt.analyzed {
        Notice::success(
            "Photo Uploaded",
            format!(
                "{} has been successfully uploaded and analyzed.",
                receipt.photo.name
            ),
        )
    } else {
        Notice::warning(
            "Photo Uploaded",
            format!(
                "{} has been successfully uploaded with analysis issues.",
                receipt.photo.name
            ),
        )
    };

    Ok((
        StatusCode::CREATED,
        Json(UploadPhotoResponse {
            analyzed: receipt.analyzed,
            photo: receipt.photo,
            notice,
        }),
    ))
}

/// DELETE /api/photos/:id
///
/// Remove a photo. Deleting an id that is not present still succeeds;
/// `removed` reports whether anything changed.
pub async fn delete_photo(
    State(state): State<AppState>,
    Path(photo_id): Path<Uuid>,
) -> Json<DeletePhotoResponse> {
    let receipt = state.gallery.delete(photo_id).await;

    Json(DeletePhotoResponse {
        removed: receipt.removed,
        notice: Notice::success(
            "Photo Deleted",
            "The photo has been removed from your gallery.".to_string(),
        ),
    })
}

/// Build photo collection routes
pub fn photo_routes() -> Router<AppState> {
    Router::new()
        .route("/api/photos", get(list_photos).post(upload_photo))
        .route("/api/photos/:id", delete(delete_photo))
}
