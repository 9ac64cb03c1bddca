//! MP4 to MP3 conversion.
//!
//! This module turns one uploaded container into one MP3 download:
//!
//! - Output name derivation (custom name or source name, `.mp3` appended)
//! - Staging the upload in a per-request temp workspace
//! - Delegating extraction to the configured [`AudioExtractor`]
//! - Optional copy of the result into a destination directory
//!
//! Every failure is folded into a [`ConversionResult`]; [`ConversionHandler::convert`]
//! never returns an error or leaves temp files behind.
//!
//! [`AudioExtractor`]: mp3forge_av::AudioExtractor

mod handler;
mod types;

pub use handler::{ConversionHandler, ConversionSettings};
pub use types::{ConversionRequest, ConversionResult, FailureKind};
