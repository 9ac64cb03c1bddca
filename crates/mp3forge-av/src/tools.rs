//! External tool detection.

use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Information about an external tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// First line of the version banner, if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// ffmpeg-family tools print their banner for `-version`, so that is the
/// argument used here.
///
/// # Example
///
/// ```no_run
/// use mp3forge_av::check_tool;
///
/// let info = check_tool("ffmpeg");
/// if info.available {
///     println!("ffmpeg version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str) -> ToolInfo {
    check_tool_with_arg(name, "-version")
}

/// Check if a tool is available using a custom version argument.
pub fn check_tool_with_arg(name: &str, version_arg: &str) -> ToolInfo {
    match which::which(name) {
        Ok(path) => check_tool_at(name, &path, version_arg),
        Err(_) => unavailable(name),
    }
}

/// Check a tool, preferring a configured executable over PATH lookup.
///
/// Resolves the executable the same way extraction does (see
/// [`get_tool_path`]), so the report matches what a conversion would run.
pub fn check_configured_tool(name: &str, config_path: Option<&Path>) -> ToolInfo {
    match get_tool_path(name, config_path) {
        Ok(path) => check_tool_at(name, &path, "-version"),
        Err(_) => unavailable(name),
    }
}

fn check_tool_at(name: &str, path: &Path, version_arg: &str) -> ToolInfo {
    match Command::new(path).arg(version_arg).output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string());

            ToolInfo {
                name: name.to_string(),
                available: true,
                version,
                path: Some(path.to_path_buf()),
            }
        }
        _ => unavailable(name),
    }
}

fn unavailable(name: &str) -> ToolInfo {
    ToolInfo {
        name: name.to_string(),
        available: false,
        version: None,
        path: None,
    }
}

/// Check the tools mp3forge can use.
///
/// ffmpeg performs the extraction and honours `ffmpeg_path` when it is
/// configured; ffprobe is optional and only used to inspect results.
pub fn check_tools(ffmpeg_path: Option<&Path>) -> Vec<ToolInfo> {
    vec![
        check_configured_tool("ffmpeg", ffmpeg_path),
        check_tool("ffprobe"),
    ]
}

/// Require that a tool is available, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(
            "Configured {} path {:?} does not exist, falling back to PATH",
            name,
            path
        );
    }

    require_tool(name)
}
