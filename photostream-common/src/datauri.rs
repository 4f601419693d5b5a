//! Data URI parsing and encoding for image payloads
//!
//! Browsers hand us uploaded files as `data:<mime>;base64,<payload>` strings
//! (the output of `FileReader.readAsDataURL`). Parsing is split from decoding
//! so callers can check the declared media type before paying for the
//! base64 decode of a multi-megabyte image.

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

/// Errors from data URI parsing and decoding
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataUriError {
    /// Input does not start with the `data:` scheme
    #[error("Missing data: scheme")]
    MissingScheme,

    /// Input has no `;base64,` marker separating header from payload
    #[error("Missing ;base64, marker")]
    MissingBase64Marker,

    /// Payload is not valid base64
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// A syntactically valid `data:` URI with a base64 payload.
///
/// `parse` validates the header only; the payload stays in encoded form
/// until `decode` is called.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUri {
    mime: String,
    payload: String,
}

impl DataUri {
    /// Parse a `data:<mime>;base64,<payload>` string
    pub fn parse(input: &str) -> Result<Self, DataUriError> {
        let rest = input
            .strip_prefix("data:")
            .ok_or(DataUriError::MissingScheme)?;

        let marker = rest
            .find(";base64,")
            .ok_or(DataUriError::MissingBase64Marker)?;

        let mime = &rest[..marker];
        let payload = &rest[marker + ";base64,".len()..];

        Ok(Self {
            mime: mime.to_string(),
            payload: payload.to_string(),
        })
    }

    /// Build a data URI from a media type and raw bytes
    pub fn encode(mime: &str, data: &[u8]) -> Self {
        Self {
            mime: mime.to_string(),
            payload: general_purpose::STANDARD.encode(data),
        }
    }

    /// Declared media type from the URI header (may carry parameters,
    /// e.g. `image/svg+xml;charset=utf-8`)
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Whether the declared media type is an image type
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// Decode the base64 payload into raw bytes
    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        general_purpose::STANDARD
            .decode(&self.payload)
            .map_err(|e| DataUriError::InvalidBase64(e.to_string()))
    }
}

impl std::fmt::Display for DataUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, self.payload)
    }
}
