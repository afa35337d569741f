//! Clipstream API service: registration, direct-to-CDN upload authorization,
//! and video metadata over axum.

pub mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
