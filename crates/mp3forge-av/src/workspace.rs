//! Per-conversion scratch space.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const INPUT_STEM: &str = "input";
const OUTPUT_NAME: &str = "output.mp3";

/// Temporary directory owning one conversion's input and output files.
///
/// Every workspace gets its own uniquely named directory, so concurrent
/// conversions never share paths. Dropping the workspace removes the
/// directory together with both files, whichever way the conversion ended.
///
/// # Example
///
/// ```no_run
/// use mp3forge_av::Workspace;
///
/// let workspace = Workspace::new("mp4")?;
/// workspace.write_input(b"...container bytes...")?;
/// // Run an extractor from workspace.input() to workspace.output()
/// let mp3 = workspace.read_output()?;
/// # Ok::<(), mp3forge_av::Error>(())
/// ```
pub struct Workspace {
    temp_dir: TempDir,
    input_path: PathBuf,
    output_path: PathBuf,
}

impl Workspace {
    /// Create a workspace in the system temp directory.
    pub fn new(input_extension: &str) -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("mp3forge-")
            .tempdir()
            .map_err(|e| Error::Workspace(e.to_string()))?;
        Self::from_temp_dir(temp_dir, input_extension)
    }

    /// Create a workspace below `root`, creating `root` if needed.
    pub fn new_in(root: &Path, input_extension: &str) -> Result<Self> {
        std::fs::create_dir_all(root).map_err(|e| {
            Error::Workspace(format!("Failed to create temp root {:?}: {}", root, e))
        })?;

        let temp_dir = tempfile::Builder::new()
            .prefix("mp3forge-")
            .tempdir_in(root)
            .map_err(|e| Error::Workspace(e.to_string()))?;
        Self::from_temp_dir(temp_dir, input_extension)
    }

    fn from_temp_dir(temp_dir: TempDir, input_extension: &str) -> Result<Self> {
        let extension = input_extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(Error::InvalidInput(format!(
                "Invalid input extension: {:?}",
                input_extension
            )));
        }

        let input_path = temp_dir.path().join(format!("{}.{}", INPUT_STEM, extension));
        let output_path = temp_dir.path().join(OUTPUT_NAME);

        Ok(Self {
            temp_dir,
            input_path,
            output_path,
        })
    }

    /// Get the input file path.
    pub fn input(&self) -> &Path {
        &self.input_path
    }

    /// Get the output file path.
    pub fn output(&self) -> &Path {
        &self.output_path
    }

    /// Get the temp directory path.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Stage the source container.
    pub fn write_input(&self, bytes: &[u8]) -> Result<()> {
        std::fs::write(&self.input_path, bytes)?;
        Ok(())
    }

    /// Read the finished MP3.
    ///
    /// A missing or empty output means the extractor did not produce audio,
    /// even if it reported success.
    pub fn read_output(&self) -> Result<Vec<u8>> {
        if !self.output_path.exists() {
            return Err(Error::MissingOutput(
                "extractor reported success but produced no output file".to_string(),
            ));
        }

        let bytes = std::fs::read(&self.output_path)?;
        if bytes.is_empty() {
            return Err(Error::MissingOutput(
                "extractor produced an empty output file".to_string(),
            ));
        }
        Ok(bytes)
    }

    /// Copy the output to `destination`.
    ///
    /// The copy is staged in a uniquely named temp file next to the
    /// destination and persisted into place, so concurrent copies to the same
    /// name never share a staging file and a failed copy never leaves a
    /// truncated file under the final name.
    pub fn copy_output_to(&self, destination: &Path) -> Result<PathBuf> {
        if !self.output_path.exists() {
            return Err(Error::Workspace(format!(
                "Output file does not exist: {:?}",
                self.output_path
            )));
        }

        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = tempfile::Builder::new()
            .prefix(".mp3forge-")
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(|e| {
                Error::Workspace(format!("Failed to stage copy in {:?}: {}", dir, e))
            })?;

        let mut source = std::fs::File::open(&self.output_path)?;
        std::io::copy(&mut source, staged.as_file_mut()).map_err(|e| {
            Error::Workspace(format!(
                "Failed to copy output to {:?}: {}",
                destination, e
            ))
        })?;

        // Dropping `staged` on error removes the partial file.
        staged.persist(destination).map_err(|e| {
            Error::Workspace(format!(
                "Failed to move output to {:?}: {}",
                destination, e.error
            ))
        })?;

        Ok(destination.to_path_buf())
    }

    /// Remove the workspace now instead of at drop.
    pub fn cleanup(self) -> Result<()> {
        self.temp_dir
            .close()
            .map_err(|e| Error::Workspace(format!("Failed to remove workspace: {}", e)))
    }
}
