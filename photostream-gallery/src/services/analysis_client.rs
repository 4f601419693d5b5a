//! Photo analysis service client
//!
//! Sends uploaded images to the external analysis service and returns its
//! tag and capture date suggestions. Failures here never abort an upload;
//! the gallery records the photo with an error note instead.

use photostream_common::DataUri;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AnalysisSettings;

const USER_AGENT: &str = "PhotoStream/0.1.0";

/// Analysis client errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Analysis request timed out")]
    Timeout,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Analysis request body
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    #[serde(rename = "photoDataUri")]
    photo_data_uri: &'a str,
}

/// Analysis results for one photo
///
/// `suggested_date_taken` is passed through as the service provides it;
/// the gallery does not normalize or validate the date format.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAnalysis {
    /// Descriptive tags for the photo
    #[serde(default)]
    pub tags: Vec<String>,

    /// Suggested capture date, if the service could infer one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_date_taken: Option<String>,
}

/// Photo analysis service client
pub struct AnalysisClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl AnalysisClient {
    pub fn new(settings: &AnalysisSettings) -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout())
            .build()
            .map_err(|e| AnalysisError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: settings.endpoint.clone(),
        })
    }

    /// Endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request analysis for one image payload
    pub async fn analyze(&self, payload: &DataUri) -> Result<PhotoAnalysis, AnalysisError> {
        let photo_data_uri = payload.to_string();

        tracing::debug!(
            mime = payload.mime(),
            endpoint = %self.endpoint,
            "Requesting photo analysis"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&AnalyzeRequest {
                photo_data_uri: &photo_data_uri,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisError::Timeout
                } else {
                    AnalysisError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::ApiError(status.as_u16(), error_text));
        }

        let analysis: PhotoAnalysis = response
            .json()
            .await
            .map_err(|e| AnalysisError::ParseError(e.to_string()))?;

        tracing::info!(
            tag_count = analysis.tags.len(),
            has_date = analysis.suggested_date_taken.is_some(),
            "Photo analysis succeeded"
        );

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AnalysisClient::new(&AnalysisSettings::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_keeps_configured_endpoint() {
        let settings = AnalysisSettings {
            endpoint: "http://127.0.0.1:4100/analyze".to_string(),
            timeout_seconds: 5,
        };
        let client = AnalysisClient::new(&settings).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:4100/analyze");
    }

    #[test]
    fn test_request_body_field_name() {
        let request = AnalyzeRequest {
            photo_data_uri: "data:image/png;base64,AA==",
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["photoDataUri"], "data:image/png;base64,AA==");
    }

    #[test]
    fn test_parse_analysis_with_date() {
        let json = r#"{"tags":["beach","sunset"],"suggestedDateTaken":"2023-07-14"}"#;
        let analysis: PhotoAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.tags, vec!["beach", "sunset"]);
        assert_eq!(analysis.suggested_date_taken.as_deref(), Some("2023-07-14"));
    }

    #[test]
    fn test_parse_analysis_without_date() {
        let json = r#"{"tags":["cat"]}"#;
        let analysis: PhotoAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.tags, vec!["cat"]);
        assert!(analysis.suggested_date_taken.is_none());
    }

    #[test]
    fn test_parse_analysis_with_missing_tags_defaults_empty() {
        let json = r#"{"suggestedDateTaken":"2021-01-01"}"#;
        let analysis: PhotoAnalysis = serde_json::from_str(json).unwrap();
        assert!(analysis.tags.is_empty());
    }
}
