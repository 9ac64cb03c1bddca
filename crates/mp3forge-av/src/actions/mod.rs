//! Audio extraction backends.
//!
//! - `ffmpeg`: re-encode the first audio stream with libmp3lame
//! - `passthrough`: copy the container unchanged under an `.mp3` name

#[cfg(feature = "ffmpeg")]
mod ffmpeg;

mod passthrough;

#[cfg(feature = "ffmpeg")]
pub use ffmpeg::FfmpegExtractor;

pub use passthrough::PassthroughExtractor;
