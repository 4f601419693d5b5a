//! HTTP API handlers for photostream-gallery

pub mod health;
pub mod photos;
pub mod sse;
pub mod ui;

pub use health::health_routes;
pub use photos::photo_routes;
pub use sse::event_stream;
pub use ui::ui_routes;
