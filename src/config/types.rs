use mp3forge_av::ExtractorBackend;
use mp3forge_common::Bitrate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of conversions kept in the "recently converted" list.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub conversion: ConversionConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted upload, in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_max_upload_mb() -> usize {
    200
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConversionConfig {
    /// Extraction backend (`ffmpeg` or `passthrough`)
    #[serde(default)]
    pub backend: ExtractorBackend,

    /// Bitrate used when a request does not pick one
    #[serde(default)]
    pub default_bitrate: Bitrate,

    /// Directory that receives a copy of every converted file.
    /// Skipped with a warning when it does not exist.
    #[serde(default)]
    pub destination_dir: Option<PathBuf>,

    /// Root for per-conversion temp directories (system temp dir if unset)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}
