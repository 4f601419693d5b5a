//! Data models for photostream-gallery

pub mod upload;

pub use upload::{DeleteReceipt, UploadReceipt, UploadState};
