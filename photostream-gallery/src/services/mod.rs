//! Service modules for the gallery workflow

pub mod analysis_client;
pub mod gallery;
pub mod photo_store;

pub use analysis_client::{AnalysisClient, AnalysisError, PhotoAnalysis};
pub use gallery::{Gallery, UploadError};
pub use photo_store::{PhotoStore, StoreError};
