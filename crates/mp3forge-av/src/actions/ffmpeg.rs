//! MP3 extraction through the ffmpeg CLI.

use crate::tools::get_tool_path;
use crate::{AudioExtractor, Bitrate, Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

const TOOL: &str = "ffmpeg";

/// Number of trailing stderr lines kept in error messages.
const STDERR_TAIL_LINES: usize = 5;

/// Extracts the first audio stream of a container and encodes it with
/// libmp3lame at a constant bitrate.
#[derive(Debug, Clone)]
pub struct FfmpegExtractor {
    tool: String,
    binary: Option<PathBuf>,
}

impl FfmpegExtractor {
    /// Use `ffmpeg` from PATH.
    pub fn new() -> Self {
        Self {
            tool: TOOL.to_string(),
            binary: None,
        }
    }

    /// Prefer an explicit binary path over the PATH lookup.
    pub fn with_binary(mut self, binary: Option<PathBuf>) -> Self {
        self.binary = binary;
        self
    }

    /// Look the encoder up under a different executable name.
    pub fn with_tool_name(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    /// Arguments passed to ffmpeg for one extraction.
    pub fn build_args(input: &Path, output: &Path, bitrate: Bitrate) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-hide_banner",
            "-nostdin",
            "-loglevel",
            "error",
            "-y",
            "-i",
        ]
        .iter()
        .map(OsString::from)
        .collect();

        args.push(input.as_os_str().to_owned());

        // Drop video, take the first audio stream, constant bitrate MP3
        for arg in ["-vn", "-map", "0:a:0", "-c:a", "libmp3lame", "-b:a"] {
            args.push(OsString::from(arg));
        }
        args.push(OsString::from(bitrate.ffmpeg_arg()));
        args.push(output.as_os_str().to_owned());

        args
    }
}

impl Default for FfmpegExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioExtractor for FfmpegExtractor {
    fn name(&self) -> &'static str {
        TOOL
    }

    fn extract(&self, input: &Path, output: &Path, bitrate: Bitrate) -> Result<()> {
        if !input.exists() {
            return Err(Error::file_not_found(input));
        }

        let binary = get_tool_path(&self.tool, self.binary.as_deref())?;

        #[cfg(feature = "tracing")]
        tracing::info!("Extracting {} MP3 from {:?} with {:?}", bitrate, input, binary);

        let result = Command::new(&binary)
            .args(Self::build_args(input, output, bitrate))
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool_not_found(&self.tool)
                } else {
                    Error::Io(e)
                }
            })?;

        if !result.status.success() {
            // ffmpeg may leave a truncated file behind
            let _ = std::fs::remove_file(output);

            let stderr = String::from_utf8_lossy(&result.stderr);
            let message = stderr_tail(&stderr)
                .unwrap_or_else(|| format!("exited with {}", result.status));
            return Err(Error::tool_failed(&self.tool, message));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("ffmpeg finished writing {:?}", output);

        Ok(())
    }
}

fn stderr_tail(stderr: &str) -> Option<String> {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return None;
    }

    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    Some(lines[start..].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let args = FfmpegExtractor::build_args(
            Path::new("/tmp/in.mp4"),
            Path::new("/tmp/out.mp3"),
            Bitrate::Kbps256,
        );
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        let i = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[i + 1], "/tmp/in.mp4");

        let b = args.iter().position(|a| a == "-b:a").unwrap();
        assert_eq!(args[b + 1], "256k");

        assert!(args.contains(&"-vn".to_string()));
        assert!(args.contains(&"libmp3lame".to_string()));
        assert_eq!(args.last().unwrap(), "/tmp/out.mp3");
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"not a container").unwrap();

        let err = FfmpegExtractor::new()
            .with_tool_name("nonexistent_ffmpeg_12345")
            .extract(&input, &dir.path().join("out.mp3"), Bitrate::Kbps128)
            .unwrap_err();

        assert!(matches!(err, Error::ToolNotFound { .. }));
    }

    #[test]
    fn test_missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = FfmpegExtractor::new()
            .extract(
                &dir.path().join("missing.mp4"),
                &dir.path().join("out.mp3"),
                Bitrate::Kbps128,
            )
            .unwrap_err();

        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    /// Stand-in encoder that writes its own argument list to the output path.
    #[cfg(unix)]
    fn recording_encoder(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("recording-ffmpeg");
        std::fs::write(
            &path,
            "#!/bin/sh\nfor last; do :; done\nprintf '%s ' \"$@\" > \"$last\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_repeated_extraction_requests_same_bitrate() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = FfmpegExtractor::new().with_binary(Some(recording_encoder(dir.path())));
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"container").unwrap();

        for bitrate in Bitrate::ALL {
            let first = dir.path().join("first.mp3");
            let second = dir.path().join("second.mp3");
            encoder.extract(&input, &first, bitrate).unwrap();
            encoder.extract(&input, &second, bitrate).unwrap();

            let first_args = std::fs::read_to_string(&first).unwrap();
            let second_args = std::fs::read_to_string(&second).unwrap();
            let expected = format!("-c:a libmp3lame -b:a {} ", bitrate.ffmpeg_arg());
            assert!(first_args.contains(&expected), "{}", first_args);
            assert_eq!(
                first_args.replace("first.mp3", "out"),
                second_args.replace("second.mp3", "out")
            );
        }
    }

    #[test]
    #[ignore = "requires ffmpeg"]
    fn test_invalid_container_fails() {

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mp4");
        let output = dir.path().join("out.mp3");
        std::fs::write(&input, b"this is not an mp4 file").unwrap();

        let err = FfmpegExtractor::new()
            .extract(&input, &output, Bitrate::Kbps128)
            .unwrap_err();

        match err {
            Error::ToolFailed { tool, message } => {
                assert_eq!(tool, "ffmpeg");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!output.exists());
    }

    #[test]
    fn test_stderr_tail() {
        assert_eq!(stderr_tail(""), None);
        assert_eq!(stderr_tail("\n  \n"), None);

        let stderr = "a\nb\n\nc\nd\ne\nf\n";
        assert_eq!(stderr_tail(stderr).unwrap(), "b\nc\nd\ne\nf");
    }
}
