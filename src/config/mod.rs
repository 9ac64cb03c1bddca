mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./mp3forge.toml",
        "~/.config/mp3forge/config.toml",
        "/etc/mp3forge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.server.max_upload_mb == 0 {
        anyhow::bail!("Upload limit (server.max_upload_mb) must be at least 1");
    }

    if config.history.capacity == 0 {
        anyhow::bail!("History capacity must be at least 1");
    }

    if let Some(ref dir) = config.conversion.destination_dir {
        if !dir.is_dir() {
            tracing::warn!(
                "Destination directory does not exist, converted files will only be offered for download: {:?}",
                dir
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mp3forge_av::ExtractorBackend;
    use mp3forge_common::Bitrate;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_upload_mb, 200);
        assert_eq!(config.conversion.backend, ExtractorBackend::Ffmpeg);
        assert_eq!(config.conversion.default_bitrate, Bitrate::Kbps192);
        assert_eq!(config.history.capacity, 10);
        assert!(config.conversion.destination_dir.is_none());
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
[server]
host = "127.0.0.1"
port = 9000
max_upload_mb = 50

[conversion]
backend = "passthrough"
default_bitrate = 320
destination_dir = "/srv/mp3"

[tools]
ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"

[history]
capacity = 25
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.max_upload_bytes(), 50 * 1024 * 1024);
        assert_eq!(config.conversion.backend, ExtractorBackend::Passthrough);
        assert_eq!(config.conversion.default_bitrate, Bitrate::Kbps320);
        assert_eq!(
            config.conversion.destination_dir.as_deref(),
            Some(Path::new("/srv/mp3"))
        );
        assert_eq!(
            config.tools.ffmpeg_path.as_deref(),
            Some(Path::new("/opt/ffmpeg/bin/ffmpeg"))
        );
        assert_eq!(config.history.capacity, 25);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let file = write_config("[server]\nport = 3000\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.history.capacity, 10);
    }

    #[test]
    fn test_rejects_unsupported_bitrate() {
        let file = write_config("[conversion]\ndefault_bitrate = 100\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_rejects_unknown_backend() {
        let file = write_config("[conversion]\nbackend = \"moviepy\"\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_rejects_zero_port() {
        let file = write_config("[server]\nport = 0\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn test_rejects_zero_history_capacity() {
        let file = write_config("[history]\ncapacity = 0\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_destination_is_only_a_warning() {
        let file = write_config("[conversion]\ndestination_dir = \"/nonexistent/mp3forge/out\"\n");
        assert!(load_config(file.path()).is_ok());
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let result = load_config_or_default(Some(Path::new("/nonexistent/mp3forge.toml")));
        assert!(result.is_err());
    }
}
