//! # PhotoStream Common Library
//!
//! Shared code for PhotoStream modules including:
//! - Photo record model (the persisted gallery entry)
//! - Event types (GalleryEvent enum) and the broadcast event bus
//! - Data URI parsing and encoding for image payloads
//! - Root folder resolution and configuration helpers

pub mod config;
pub mod datauri;
pub mod error;
pub mod events;
pub mod model;

pub use datauri::DataUri;
pub use error::{Error, Result};
pub use model::PhotoRecord;
