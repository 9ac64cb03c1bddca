//! Conversion tests against the real ffmpeg CLI.
//!
//! Ignored by default; run with `cargo test -- --ignored` on a host with
//! ffmpeg and ffprobe on PATH.

use mp3forge::conversion::{ConversionHandler, ConversionRequest, FailureKind};
use mp3forge_av::{Bitrate, FfmpegExtractor};
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use tempfile::tempdir;

fn tools_available() -> bool {
    which::which("ffmpeg").is_ok() && which::which("ffprobe").is_ok()
}

/// Write a two second MP4 with a sine tone and a solid video track.
fn make_test_mp4(path: &Path) {
    let status = Command::new("ffmpeg")
        .args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-y",
            "-f",
            "lavfi",
            "-i",
            "sine=frequency=440:duration=2",
            "-f",
            "lavfi",
            "-i",
            "color=c=blue:s=64x64:d=2",
            "-shortest",
            "-c:a",
            "aac",
            "-c:v",
            "mpeg4",
        ])
        .arg(path)
        .status()
        .unwrap();
    assert!(status.success(), "failed to generate test MP4");
}

/// Bitrate of the first audio stream, in bits per second.
fn probe_bitrate(path: &Path) -> u64 {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "a:0",
            "-show_entries",
            "stream=bit_rate,codec_name",
            "-of",
            "default=noprint_wrappers=1",
        ])
        .arg(path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("codec_name=mp3"), "not an MP3: {}", text);
    text.lines()
        .find_map(|l| l.strip_prefix("bit_rate="))
        .and_then(|v| v.trim().parse().ok())
        .unwrap()
}

#[test]
#[ignore = "requires ffmpeg and ffprobe"]
fn test_repeated_conversion_keeps_bitrate() {
    assert!(tools_available(), "ffmpeg and ffprobe must be on PATH");

    let dir = tempdir().unwrap();
    let input = dir.path().join("tone.mp4");
    make_test_mp4(&input);
    let source = std::fs::read(&input).unwrap();

    let handler = ConversionHandler::new(Arc::new(FfmpegExtractor::new()));

    for round in 0..2 {
        let result = handler.convert(ConversionRequest::new(
            source.clone(),
            "tone.mp4",
            Bitrate::Kbps128,
        ));
        assert!(result.succeeded, "round {}: {:?}", round, result.error_message);
        assert_eq!(result.output_name, "tone.mp3");

        let mp3 = dir.path().join(format!("round-{}.mp3", round));
        std::fs::write(&mp3, &result.output_bytes).unwrap();
        assert_eq!(probe_bitrate(&mp3), Bitrate::Kbps128.bps());
    }
}

#[test]
#[ignore = "requires ffmpeg and ffprobe"]
fn test_non_video_upload_fails_with_message() {
    assert!(tools_available(), "ffmpeg and ffprobe must be on PATH");

    let temp = tempdir().unwrap();
    let handler = ConversionHandler::with_settings(
        Arc::new(FfmpegExtractor::new()),
        mp3forge::conversion::ConversionSettings {
            temp_dir: Some(temp.path().to_path_buf()),
            destination_dir: None,
        },
    );

    let result = handler.convert(ConversionRequest::new(
        b"this is not a video".to_vec(),
        "notes.mp4",
        Bitrate::Kbps192,
    ));

    assert!(!result.succeeded);
    assert_eq!(result.failure, Some(FailureKind::Conversion));
    assert!(result
        .error_message
        .unwrap()
        .starts_with("ffmpeg could not convert this file"));
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}
