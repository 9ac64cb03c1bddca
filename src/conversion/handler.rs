//! Conversion request handling.

use super::types::{ConversionRequest, ConversionResult, FailureKind};
use crate::config::Config;
use mp3forge_av::{AudioExtractor, Workspace};
use mp3forge_common::paths::staging_extension;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Filesystem settings for the handler.
#[derive(Debug, Clone, Default)]
pub struct ConversionSettings {
    /// Root for per-request temp workspaces (system temp dir if `None`).
    pub temp_dir: Option<PathBuf>,
    /// Directory that receives a copy of every successful conversion.
    pub destination_dir: Option<PathBuf>,
}

impl From<&Config> for ConversionSettings {
    fn from(config: &Config) -> Self {
        Self {
            temp_dir: config.conversion.temp_dir.clone(),
            destination_dir: config.conversion.destination_dir.clone(),
        }
    }
}

/// Converts uploads with one injected [`AudioExtractor`].
pub struct ConversionHandler {
    extractor: Arc<dyn AudioExtractor>,
    settings: ConversionSettings,
}

impl ConversionHandler {
    pub fn new(extractor: Arc<dyn AudioExtractor>) -> Self {
        Self::with_settings(extractor, ConversionSettings::default())
    }

    pub fn with_settings(extractor: Arc<dyn AudioExtractor>, settings: ConversionSettings) -> Self {
        Self {
            extractor,
            settings,
        }
    }

    /// Build the handler described by `config`.
    pub fn from_config(config: &Config) -> mp3forge_av::Result<Self> {
        let extractor = config
            .conversion
            .backend
            .build(config.tools.ffmpeg_path.clone())?;
        Ok(Self::with_settings(extractor, ConversionSettings::from(config)))
    }

    /// Name of the injected extractor.
    pub fn backend_name(&self) -> &'static str {
        self.extractor.name()
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Convert one upload.
    ///
    /// Blocks until the extractor finishes. Temp files are removed before
    /// this returns, on success and failure alike.
    pub fn convert(&self, request: ConversionRequest) -> ConversionResult {
        let output_name = request.output_name();
        let conversion_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "convert",
            id = %conversion_id,
            source = %request.source_name,
            bitrate = %request.bitrate,
            backend = self.extractor.name(),
        );
        let _enter = span.enter();

        if request.source_bytes.is_empty() {
            warn!("Rejected empty upload");
            return ConversionResult::failure(
                output_name,
                request.bitrate,
                FailureKind::InvalidRequest,
                "Uploaded file is empty",
            );
        }

        info!(
            "Converting {} bytes to {}",
            request.source_bytes.len(),
            output_name
        );

        match self.run(&request, &output_name) {
            Ok((bytes, saved_to)) => {
                info!("Conversion finished: {} ({} bytes)", output_name, bytes.len());
                ConversionResult::success(bytes, output_name, request.bitrate, saved_to)
            }
            Err(e) => {
                let kind = FailureKind::from(&e);
                warn!("Conversion failed ({}): {}", kind, e);
                ConversionResult::failure(output_name, request.bitrate, kind, describe(&e))
            }
        }
    }

    fn run(
        &self,
        request: &ConversionRequest,
        output_name: &str,
    ) -> mp3forge_av::Result<(Vec<u8>, Option<PathBuf>)> {
        let extension = staging_extension(&request.source_name);
        let workspace = match self.settings.temp_dir {
            Some(ref root) => Workspace::new_in(root, &extension)?,
            None => Workspace::new(&extension)?,
        };
        debug!("Staging upload in {:?}", workspace.temp_dir());

        workspace.write_input(&request.source_bytes)?;
        self.extractor
            .extract(workspace.input(), workspace.output(), request.bitrate)?;
        let bytes = workspace.read_output()?;

        let saved_to = self
            .settings
            .destination_dir
            .as_deref()
            .and_then(|dir| save_copy(&workspace, dir, output_name));

        Ok((bytes, saved_to))
    }
}

/// Copy the output into `dir`. Failures only cost the copy, not the download.
fn save_copy(workspace: &Workspace, dir: &Path, output_name: &str) -> Option<PathBuf> {
    if !dir.is_dir() {
        warn!("Destination directory does not exist, skipping copy: {:?}", dir);
        return None;
    }

    match workspace.copy_output_to(&dir.join(output_name)) {
        Ok(path) => {
            info!("Saved copy to {:?}", path);
            Some(path)
        }
        Err(e) => {
            warn!("Failed to save copy to {:?}: {}", dir, e);
            None
        }
    }
}

/// User-facing message for an extraction error.
fn describe(err: &mp3forge_av::Error) -> String {
    use mp3forge_av::Error;

    match err {
        Error::ToolNotFound { tool } => format!(
            "{} is not installed or not on PATH; install it or set tools.ffmpeg_path",
            tool
        ),
        Error::ToolFailed { tool, message } => {
            format!("{} could not convert this file: {}", tool, message)
        }
        other => other.to_string(),
    }
}
