//! Byte-copy fallback for hosts without an encoder.

use crate::{AudioExtractor, Bitrate, Error, Result};
use std::path::Path;

/// Copies the input file to the output path without decoding it.
///
/// This exists for hosts where no encoder can be installed. The output keeps
/// the source container format and ignores the requested bitrate, so most
/// players will only accept it if they sniff the content. It is never chosen
/// implicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughExtractor;

impl AudioExtractor for PassthroughExtractor {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn extract(&self, input: &Path, output: &Path, bitrate: Bitrate) -> Result<()> {
        if !input.exists() {
            return Err(Error::file_not_found(input));
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(
            "Passthrough backend copying {:?} without re-encoding (requested {})",
            input,
            bitrate
        );
        #[cfg(not(feature = "tracing"))]
        let _ = bitrate;

        std::fs::copy(input, output)?;
        Ok(())
    }
}
