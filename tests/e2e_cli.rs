//! CLI end-to-end tests
//!
//! Tests for the mp3forge command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the mp3forge binary
#[allow(deprecated)]
fn mp3forge_cmd() -> Command {
    Command::cargo_bin("mp3forge").unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = mp3forge_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = mp3forge_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mp3forge"))
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("start"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = mp3forge_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "mp3forge {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_cli_check_tools_command() {
    let mut cmd = mp3forge_cmd();
    cmd.arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffmpeg"));
}

#[cfg(unix)]
#[test]
fn test_cli_check_tools_uses_configured_ffmpeg() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let binary = dir.path().join("custom-ffmpeg");
    fs::write(&binary, "#!/bin/sh\necho 'ffmpeg version 9.9-test'\n").unwrap();
    fs::set_permissions(&binary, fs::Permissions::from_mode(0o755)).unwrap();

    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!("[tools]\nffmpeg_path = {:?}\n", binary.to_string_lossy()),
    )
    .unwrap();

    let mut cmd = mp3forge_cmd();
    cmd.arg("--config")
        .arg(&config_path)
        .arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ ffmpeg (ffmpeg version 9.9-test)"))
        .stdout(predicate::str::contains("MP3 conversion is enabled"));
}

#[test]
fn test_cli_validate_defaults() {
    let dir = tempdir().unwrap();
    let mut cmd = mp3forge_cmd();
    cmd.current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Default bitrate: 192kbps"))
        .stdout(predicate::str::contains("History size: 10"));
}

#[test]
fn test_cli_validate_config_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[server]
port = 9000

[conversion]
default_bitrate = 320
backend = "passthrough"
"#,
    )
    .unwrap();

    let mut cmd = mp3forge_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains(":9000"))
        .stdout(predicate::str::contains("Backend: passthrough"));
}

#[test]
fn test_cli_validate_rejects_bad_bitrate() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[conversion]\ndefault_bitrate = 100\n").unwrap();

    let mut cmd = mp3forge_cmd();
    cmd.arg("validate").arg(&config_path).assert().failure();
}

#[test]
fn test_cli_convert_missing_input() {
    let dir = tempdir().unwrap();
    let mut cmd = mp3forge_cmd();
    cmd.current_dir(dir.path())
        .args(["convert", "does-not-exist.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_convert_rejects_unsupported_bitrate() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("clip.mp4");
    fs::write(&input, b"payload").unwrap();

    let mut cmd = mp3forge_cmd();
    cmd.current_dir(dir.path())
        .arg("convert")
        .arg(&input)
        .args(["--bitrate", "100"])
        .assert()
        .failure();
}

#[test]
fn test_cli_convert_passthrough() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let input = dir.path().join("holiday.mp4");
    fs::write(&input, b"fake mp4 payload").unwrap();

    let mut cmd = mp3forge_cmd();
    cmd.current_dir(dir.path())
        .arg("convert")
        .arg(&input)
        .args(["--backend", "passthrough", "--bitrate", "256"])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("holiday.mp3"))
        .stdout(predicate::str::contains("256kbps"));

    assert_eq!(
        fs::read(out.join("holiday.mp3")).unwrap(),
        b"fake mp4 payload"
    );
}

#[test]
fn test_cli_convert_custom_name() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("clip.mp4");
    fs::write(&input, b"payload").unwrap();

    let mut cmd = mp3forge_cmd();
    cmd.current_dir(dir.path())
        .arg("convert")
        .arg(&input)
        .args(["--backend", "passthrough", "--name", "renamed"])
        .assert()
        .success();

    assert!(dir.path().join("renamed.mp3").exists());
    assert!(!dir.path().join("clip.mp3").exists());
}
