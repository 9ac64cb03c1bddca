//! The extraction boundary.

use crate::{Bitrate, Error, PassthroughExtractor, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Turns a container file into an MP3 file.
///
/// Implementations own no state between calls. On success `output` must be a
/// readable MP3 at the requested bitrate; on failure nothing is guaranteed
/// about `output`, and the caller is responsible for removing it.
pub trait AudioExtractor: Send + Sync {
    /// Short backend name used in logs and API responses.
    fn name(&self) -> &'static str;

    /// Extract the audio of `input` into `output` at `bitrate`.
    fn extract(&self, input: &Path, output: &Path, bitrate: Bitrate) -> Result<()>;
}

/// Which [`AudioExtractor`] to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorBackend {
    /// Re-encode with the ffmpeg CLI.
    #[default]
    Ffmpeg,
    /// Copy the input bytes unchanged. The result is not a real MP3.
    Passthrough,
}

impl ExtractorBackend {
    /// Build the extractor for this backend.
    ///
    /// `ffmpeg_path` overrides the PATH lookup of the ffmpeg binary.
    pub fn build(self, ffmpeg_path: Option<PathBuf>) -> Result<Arc<dyn AudioExtractor>> {
        match self {
            #[cfg(feature = "ffmpeg")]
            Self::Ffmpeg => Ok(Arc::new(
                crate::FfmpegExtractor::new().with_binary(ffmpeg_path),
            )),
            #[cfg(not(feature = "ffmpeg"))]
            Self::Ffmpeg => {
                let _ = ffmpeg_path;
                Err(Error::Unsupported(
                    "ffmpeg backend requires the `ffmpeg` feature".to_string(),
                ))
            }
            Self::Passthrough => Ok(Arc::new(PassthroughExtractor)),
        }
    }
}

impl fmt::Display for ExtractorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ffmpeg => write!(f, "ffmpeg"),
            Self::Passthrough => write!(f, "passthrough"),
        }
    }
}

impl FromStr for ExtractorBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ffmpeg" => Ok(Self::Ffmpeg),
            "passthrough" => Ok(Self::Passthrough),
            other => Err(Error::InvalidInput(format!(
                "unknown backend {:?} (expected ffmpeg or passthrough)",
                other
            ))),
        }
    }
}
