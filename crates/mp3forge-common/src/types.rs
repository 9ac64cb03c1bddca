//! Core value types shared by the converter, server and CLI.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target MP3 bitrate in kilobits per second.
///
/// Only the six bitrates offered by the upload form are representable.
/// Serialized as a bare integer (`192`), so configuration files and JSON
/// payloads use the kbps value directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Bitrate {
    Kbps64,
    Kbps96,
    Kbps128,
    Kbps192,
    Kbps256,
    Kbps320,
}

impl Bitrate {
    /// Every accepted bitrate, lowest first.
    pub const ALL: [Bitrate; 6] = [
        Bitrate::Kbps64,
        Bitrate::Kbps96,
        Bitrate::Kbps128,
        Bitrate::Kbps192,
        Bitrate::Kbps256,
        Bitrate::Kbps320,
    ];

    /// Bitrate in kilobits per second.
    pub fn kbps(self) -> u32 {
        match self {
            Self::Kbps64 => 64,
            Self::Kbps96 => 96,
            Self::Kbps128 => 128,
            Self::Kbps192 => 192,
            Self::Kbps256 => 256,
            Self::Kbps320 => 320,
        }
    }

    /// Bitrate in bits per second, as reported by ffprobe.
    pub fn bps(self) -> u64 {
        u64::from(self.kbps()) * 1000
    }

    /// Value for ffmpeg's `-b:a` option.
    pub fn ffmpeg_arg(self) -> String {
        format!("{}k", self.kbps())
    }
}

impl Default for Bitrate {
    fn default() -> Self {
        Self::Kbps192
    }
}

impl TryFrom<u32> for Bitrate {
    type Error = Error;

    fn try_from(kbps: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|b| b.kbps() == kbps)
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "unsupported bitrate {} kbps (expected one of 64, 96, 128, 192, 256, 320)",
                    kbps
                ))
            })
    }
}

impl From<Bitrate> for u32 {
    fn from(bitrate: Bitrate) -> Self {
        bitrate.kbps()
    }
}

impl FromStr for Bitrate {
    type Err = Error;

    /// Accepts `192`, `192k` and `192kbps` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let digits = lower
            .strip_suffix("kbps")
            .or_else(|| lower.strip_suffix('k'))
            .unwrap_or(&lower)
            .trim();

        let kbps: u32 = digits
            .parse()
            .map_err(|_| Error::invalid_input(format!("invalid bitrate: {:?}", s)))?;
        Self::try_from(kbps)
    }
}

impl fmt::Display for Bitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}kbps", self.kbps())
    }
}
