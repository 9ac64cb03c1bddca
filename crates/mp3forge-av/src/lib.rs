//! # mp3forge-av
//!
//! Audio extraction backends for mp3forge.
//!
//! This crate owns the boundary to the external conversion primitive:
//! - The [`AudioExtractor`] trait: container in, MP3 out, at a given bitrate
//! - [`FfmpegExtractor`], which shells out to the `ffmpeg` CLI
//! - [`PassthroughExtractor`], a byte-copy fallback that does not re-encode
//! - External tool detection
//! - Per-conversion temporary [`Workspace`]s
//!
//! ## Features
//!
//! - `ffmpeg` (default) - Extraction through the ffmpeg CLI
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use mp3forge_av::{AudioExtractor, Bitrate, FfmpegExtractor, Workspace};
//!
//! let workspace = Workspace::new("mp4")?;
//! std::fs::copy("/path/to/clip.mp4", workspace.input())?;
//!
//! FfmpegExtractor::new().extract(workspace.input(), workspace.output(), Bitrate::Kbps192)?;
//! let mp3 = std::fs::read(workspace.output())?;
//! # Ok::<(), mp3forge_av::Error>(())
//! ```

mod error;
pub mod actions;
pub mod extractor;
pub mod tools;
pub mod workspace;

// Re-exports
pub use actions::PassthroughExtractor;
#[cfg(feature = "ffmpeg")]
pub use actions::FfmpegExtractor;
pub use error::{Error, Result};
pub use extractor::{AudioExtractor, ExtractorBackend};
pub use mp3forge_common::Bitrate;
pub use tools::{check_configured_tool, check_tool, check_tools, require_tool, ToolInfo};
pub use workspace::Workspace;
