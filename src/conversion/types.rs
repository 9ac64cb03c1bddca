use bytes::Bytes;
use mp3forge_common::paths::output_file_name;
use mp3forge_common::Bitrate;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// One upload to convert.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub source_bytes: Bytes,
    pub source_name: String,
    pub bitrate: Bitrate,
    pub custom_base_name: Option<String>,
}

impl ConversionRequest {
    pub fn new(source_bytes: impl Into<Bytes>, source_name: impl Into<String>, bitrate: Bitrate) -> Self {
        Self {
            source_bytes: source_bytes.into(),
            source_name: source_name.into(),
            bitrate,
            custom_base_name: None,
        }
    }

    pub fn with_custom_name(mut self, name: Option<String>) -> Self {
        self.custom_base_name = name;
        self
    }

    /// File name the MP3 is offered under.
    pub fn output_name(&self) -> String {
        output_file_name(&self.source_name, self.custom_base_name.as_deref())
    }
}

/// Why a conversion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The request itself was unusable (empty upload, bad bitrate).
    InvalidRequest,
    /// The conversion primitive is missing; needs operator action.
    Setup,
    /// The primitive ran and rejected the input.
    Conversion,
    /// Staging or reading temp files failed.
    Filesystem,
}

impl FailureKind {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Setup => "setup_error",
            Self::Conversion => "conversion_error",
            Self::Filesystem => "filesystem_error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<&mp3forge_av::Error> for FailureKind {
    fn from(err: &mp3forge_av::Error) -> Self {
        use mp3forge_av::Error;

        match err {
            Error::ToolNotFound { .. } | Error::Unsupported(_) => Self::Setup,
            Error::ToolFailed { .. }
            | Error::FileNotFound { .. }
            | Error::InvalidInput(_)
            | Error::MissingOutput(_) => Self::Conversion,
            Error::Io(_) | Error::Workspace(_) => Self::Filesystem,
        }
    }
}

/// Outcome of one conversion.
///
/// `succeeded` and `error_message` are mutually exclusive: a successful
/// result never carries a message, a failed one always carries a non-empty
/// message and a [`FailureKind`].
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub output_bytes: Bytes,
    pub output_name: String,
    pub bitrate: Bitrate,
    pub succeeded: bool,
    pub error_message: Option<String>,
    pub failure: Option<FailureKind>,
    /// Where the destination copy was written, if one was made.
    pub saved_to: Option<PathBuf>,
}

impl ConversionResult {
    pub fn success(
        output_bytes: impl Into<Bytes>,
        output_name: String,
        bitrate: Bitrate,
        saved_to: Option<PathBuf>,
    ) -> Self {
        Self {
            output_bytes: output_bytes.into(),
            output_name,
            bitrate,
            succeeded: true,
            error_message: None,
            failure: None,
            saved_to,
        }
    }

    pub fn failure(
        output_name: String,
        bitrate: Bitrate,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = format!("conversion failed ({})", kind);
        }

        Self {
            output_bytes: Bytes::new(),
            output_name,
            bitrate,
            succeeded: false,
            error_message: Some(message),
            failure: Some(kind),
            saved_to: None,
        }
    }
}
