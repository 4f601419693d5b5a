//! Upload workflow state machine
//!
//! Each upload progresses through defined states:
//! UPLOADING → (ANALYZING_SUCCEEDED | ANALYZING_FAILED) → RECORDED → IDLE
//!
//! Analysis failure is not a terminal state; the photo is recorded either
//! way. Only a payload that cannot be validated or read aborts the upload.

use photostream_common::PhotoRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upload workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadState {
    /// No upload in progress
    Idle,
    /// Payload validated, decode and analysis pending
    Uploading,
    /// Analysis produced tags (and possibly a capture date)
    AnalyzingSucceeded,
    /// Analysis failed; the photo will be recorded with an error note
    AnalyzingFailed,
    /// Record inserted and persistence attempted
    Recorded,
}

/// Outcome of a completed upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    /// The recorded photo, including any analysis results
    pub photo: PhotoRecord,
    /// Whether analysis succeeded
    pub analyzed: bool,
}

/// Outcome of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteReceipt {
    /// Id named by the request
    pub photo_id: Uuid,
    /// Whether a record was actually removed
    pub removed: bool,
}
