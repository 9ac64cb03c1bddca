//! Mp3forge - Upload a video, download its audio as MP3
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod conversion;
pub mod history;
pub mod server;
