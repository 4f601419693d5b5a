//! Photo record model
//!
//! `PhotoRecord` is the unit of persistence and of every API response.
//! Field names serialize in camelCase; the on-disk document and the wire
//! format are the same serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One uploaded photo with its analysis outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Unique photo identifier
    pub id: Uuid,

    /// Image payload as a data URI (`data:<mime>;base64,...`)
    pub url: String,

    /// Original file name supplied by the uploader
    pub name: String,

    /// Time the upload was recorded
    pub upload_date: DateTime<Utc>,

    /// Descriptive tags from analysis (empty when analysis failed)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Capture date suggested by analysis, as provided (not normalized)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_date_taken: Option<String>,

    /// Analysis failure message; absent when analysis succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_error: Option<String>,
}

impl PhotoRecord {
    /// Create a fresh record with a new id and the current upload time.
    /// Analysis fields start empty and are filled in by the uploader.
    pub fn new(name: &str, url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            url,
            name: name.to_string(),
            upload_date: Utc::now(),
            tags: Vec::new(),
            suggested_date_taken: None,
            ai_error: None,
        }
    }
}
