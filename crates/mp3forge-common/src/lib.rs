//! Mp3forge-Common: Shared types and utilities.
//!
//! This crate provides common functionality used across mp3forge:
//!
//! - **Bitrate**: The closed set of MP3 bitrates the converter accepts
//! - **Path Utilities**: Output file name derivation and container detection
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use mp3forge_common::{Bitrate, Error, Result};
//! use mp3forge_common::paths::output_file_name;
//!
//! let bitrate = Bitrate::try_from(192)?;
//! assert_eq!(bitrate.ffmpeg_arg(), "192k");
//!
//! assert_eq!(output_file_name("clip.mp4", Some("song")), "song.mp3");
//! # Ok::<(), Error>(())
//! ```

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
