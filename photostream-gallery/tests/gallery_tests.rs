//! Integration tests for the gallery controller
//!
//! Tests cover the full upload pipeline against a local stub analysis
//! service: validation, decode, best-effort analysis, recording order,
//! persistence, and event emission. The stub binds an ephemeral loopback
//! port per test.

use axum::{routing::post, Json, Router};
use photostream_common::events::{EventBus, GalleryEvent};
use photostream_gallery::config::AnalysisSettings;
use photostream_gallery::services::{
    gallery::ANALYSIS_FAILED_MESSAGE, AnalysisClient, Gallery, PhotoStore, UploadError,
};
use serde_json::json;
use std::path::Path;
use std::time::Duration;

/// 1x1 transparent PNG, the smallest payload a browser would produce
const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

/// Spawn a stub analysis service, returning its endpoint URL
async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/analyze-photo", addr)
}

fn stub_success() -> Router {
    Router::new().route(
        "/analyze-photo",
        post(|| async {
            Json(json!({
                "tags": ["beach", "sunset"],
                "suggestedDateTaken": "2023-07-14"
            }))
        }),
    )
}

fn stub_failure() -> Router {
    Router::new().route(
        "/analyze-photo",
        post(|| async {
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "model unavailable",
            )
        }),
    )
}

fn stub_slow() -> Router {
    Router::new().route(
        "/analyze-photo",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "tags": ["too", "late"] }))
        }),
    )
}

async fn open_gallery(endpoint: &str, root: &Path, bus: EventBus) -> Gallery {
    let store = PhotoStore::new(root.join("photostream-photos.json"));
    let settings = AnalysisSettings {
        endpoint: endpoint.to_string(),
        timeout_seconds: 1,
    };
    let analysis = AnalysisClient::new(&settings).unwrap();
    Gallery::open(store, analysis, bus).await
}

// =============================================================================
// Upload pipeline
// =============================================================================

#[tokio::test]
async fn upload_records_photo_with_analysis_results() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = spawn_stub(stub_success()).await;
    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();
    let gallery = open_gallery(&endpoint, dir.path(), bus).await;

    let receipt = gallery.upload("beach.jpg", PNG_DATA_URI).await.unwrap();

    assert!(receipt.analyzed);
    assert_eq!(receipt.photo.name, "beach.jpg");
    assert_eq!(receipt.photo.url, PNG_DATA_URI);
    assert_eq!(receipt.photo.tags, vec!["beach", "sunset"]);
    assert_eq!(
        receipt.photo.suggested_date_taken.as_deref(),
        Some("2023-07-14")
    );
    assert!(receipt.photo.ai_error.is_none());

    let photos = gallery.photos().await;
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0], receipt.photo);

    // A successful upload emits exactly one PhotoAdded event
    let event = rx.try_recv().unwrap();
    match event {
        GalleryEvent::PhotoAdded {
            photo, analyzed, ..
        } => {
            assert_eq!(photo.id, receipt.photo.id);
            assert!(analyzed);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn upload_records_photo_when_analysis_fails() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = spawn_stub(stub_failure()).await;
    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();
    let gallery = open_gallery(&endpoint, dir.path(), bus).await;

    let receipt = gallery.upload("cat.png", PNG_DATA_URI).await.unwrap();

    assert!(!receipt.analyzed);
    assert_eq!(receipt.photo.ai_error.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
    assert!(receipt.photo.tags.is_empty());
    assert!(receipt.photo.suggested_date_taken.is_none());

    // The photo is in the collection despite the failure
    assert_eq!(gallery.photos().await.len(), 1);

    // AnalysisFailed precedes PhotoAdded
    match rx.try_recv().unwrap() {
        GalleryEvent::AnalysisFailed {
            photo_id, message, ..
        } => {
            assert_eq!(photo_id, receipt.photo.id);
            assert_eq!(message, ANALYSIS_FAILED_MESSAGE);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    match rx.try_recv().unwrap() {
        GalleryEvent::PhotoAdded { analyzed, .. } => assert!(!analyzed),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn upload_records_photo_when_analysis_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = spawn_stub(stub_slow()).await;
    let bus = EventBus::new(16);
    let gallery = open_gallery(&endpoint, dir.path(), bus).await;

    let receipt = gallery.upload("slow.jpg", PNG_DATA_URI).await.unwrap();

    assert!(!receipt.analyzed);
    assert_eq!(receipt.photo.ai_error.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
    assert_eq!(gallery.photos().await.len(), 1);
}

#[tokio::test]
async fn upload_rejects_non_image_declared_type() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = spawn_stub(stub_success()).await;
    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();
    let gallery = open_gallery(&endpoint, dir.path(), bus).await;

    let result = gallery
        .upload("notes.txt", "data:text/plain;base64,aGVsbG8=")
        .await;

    assert!(matches!(result, Err(UploadError::NotAnImage { .. })));
    // Rejection leaves no trace: no record, no document, no events
    assert!(gallery.photos().await.is_empty());
    assert!(!dir.path().join("photostream-photos.json").exists());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn upload_rejects_undecodable_payload() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = spawn_stub(stub_success()).await;
    let bus = EventBus::new(16);
    let gallery = open_gallery(&endpoint, dir.path(), bus).await;

    let result = gallery
        .upload("broken.png", "data:image/png;base64,@@@not-base64@@@")
        .await;

    assert!(matches!(result, Err(UploadError::UnreadablePayload(_))));
    assert!(gallery.photos().await.is_empty());
}

#[tokio::test]
async fn uploads_prepend_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = spawn_stub(stub_success()).await;
    let bus = EventBus::new(16);
    let gallery = open_gallery(&endpoint, dir.path(), bus).await;

    gallery.upload("first.jpg", PNG_DATA_URI).await.unwrap();
    gallery.upload("second.jpg", PNG_DATA_URI).await.unwrap();

    let photos = gallery.photos().await;
    assert_eq!(photos.len(), 2);
    assert_eq!(photos[0].name, "second.jpg");
    assert_eq!(photos[1].name, "first.jpg");

    // The persisted document has the same order
    let store = PhotoStore::new(dir.path().join("photostream-photos.json"));
    let persisted = store.load().await;
    assert_eq!(persisted, photos);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn delete_removes_record_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = spawn_stub(stub_success()).await;
    let bus = EventBus::new(16);
    let gallery = open_gallery(&endpoint, dir.path(), bus.clone()).await;

    let receipt = gallery.upload("gone.jpg", PNG_DATA_URI).await.unwrap();
    let mut rx = bus.subscribe();

    let delete_receipt = gallery.delete(receipt.photo.id).await;

    assert!(delete_receipt.removed);
    assert!(gallery.photos().await.is_empty());

    let store = PhotoStore::new(dir.path().join("photostream-photos.json"));
    assert!(store.load().await.is_empty());

    match rx.try_recv().unwrap() {
        GalleryEvent::PhotoDeleted {
            photo_id, removed, ..
        } => {
            assert_eq!(photo_id, receipt.photo.id);
            assert!(removed);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn delete_unknown_id_reports_nothing_removed() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = spawn_stub(stub_success()).await;
    let bus = EventBus::new(16);
    let gallery = open_gallery(&endpoint, dir.path(), bus.clone()).await;

    gallery.upload("kept.jpg", PNG_DATA_URI).await.unwrap();
    let mut rx = bus.subscribe();

    let receipt = gallery.delete(uuid::Uuid::new_v4()).await;

    assert!(!receipt.removed);
    assert_eq!(gallery.photos().await.len(), 1);

    match rx.try_recv().unwrap() {
        GalleryEvent::PhotoDeleted { removed, .. } => assert!(!removed),
        other => panic!("unexpected event: {other:?}"),
    }
}

// =============================================================================
// Persistence failure
// =============================================================================

#[tokio::test]
async fn mutations_survive_persistence_failure() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file sits where the store needs a parent directory,
    // so every save attempt fails
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let endpoint = spawn_stub(stub_success()).await;
    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();

    let store = PhotoStore::new(blocker.join("photostream-photos.json"));
    let settings = AnalysisSettings {
        endpoint,
        timeout_seconds: 1,
    };
    let analysis = AnalysisClient::new(&settings).unwrap();
    let gallery = Gallery::open(store, analysis, bus).await;

    // The save fails but the upload is still recorded in memory
    let receipt = gallery.upload("kept.jpg", PNG_DATA_URI).await.unwrap();
    assert!(receipt.analyzed);
    assert_eq!(gallery.photos().await.len(), 1);
    match rx.try_recv().unwrap() {
        GalleryEvent::PhotoAdded { photo, .. } => assert_eq!(photo.id, receipt.photo.id),
        other => panic!("unexpected event: {other:?}"),
    }

    // Delete likewise operates on the in-memory collection alone
    let delete_receipt = gallery.delete(receipt.photo.id).await;
    assert!(delete_receipt.removed);
    assert!(gallery.photos().await.is_empty());
    match rx.try_recv().unwrap() {
        GalleryEvent::PhotoDeleted { removed, .. } => assert!(removed),
        other => panic!("unexpected event: {other:?}"),
    }

    // The file blocking the store was never touched
    assert!(blocker.is_file());
}

// =============================================================================
// Restart behavior
// =============================================================================

#[tokio::test]
async fn open_loads_previously_persisted_collection() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = spawn_stub(stub_success()).await;

    let first_upload;
    {
        let bus = EventBus::new(16);
        let gallery = open_gallery(&endpoint, dir.path(), bus).await;
        first_upload = gallery.upload("survivor.jpg", PNG_DATA_URI).await.unwrap();
    }

    // A fresh gallery over the same root folder sees the same collection
    let bus = EventBus::new(16);
    let reopened = open_gallery(&endpoint, dir.path(), bus).await;
    let photos = reopened.photos().await;

    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0], first_upload.photo);
}
