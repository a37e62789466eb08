//! Error types module
//!
//! Every way an upload can end without a stored file is a variant of [`UploadError`].
//! Transport failures come from the multipart layer, validation failures from the
//! [`ValidationPolicy`](crate::ValidationPolicy), and persistence failures from storage.
//!
//! Errors self-describe how they are presented through [`ErrorMetadata`], so the HTTP
//! layer never has to match on variants to pick a message or a log level.

use std::fmt;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for transport problems caused by the client or network
    Warn,
    /// Error level - for unexpected server-side failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "INVALID_TYPE")
    fn error_code(&self) -> &'static str;

    /// Whether the client can fix the problem by resubmitting the form
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;

    /// Whether the page stops after the message instead of rendering the form below it
    fn halts_render(&self) -> bool;
}

/// Transport-level upload failures.
///
/// The numeric codes follow the conventional upload error numbering so that log lines
/// stay comparable with other upload front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The request body exceeded the server-wide body limit
    IniSize,
    /// The file was only partially received
    Partial,
    /// No file was submitted
    NoFile,
    /// Temporary storage for the received bytes is unavailable
    NoTmpDir,
    /// Writing the received bytes to temporary storage failed
    CantWrite,
}

impl TransportError {
    pub fn code(&self) -> u8 {
        match self {
            TransportError::IniSize => 1,
            TransportError::Partial => 3,
            TransportError::NoFile => 4,
            TransportError::NoTmpDir => 6,
            TransportError::CantWrite => 7,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TransportError::IniSize => "the upload exceeds the server's request size limit",
            TransportError::Partial => "the file was only partially uploaded",
            TransportError::NoFile => "no file was uploaded",
            TransportError::NoTmpDir => "temporary upload storage is unavailable",
            TransportError::CantWrite => "the upload could not be written to temporary storage",
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.description(), self.code())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Transport error: {0}")]
    Transport(TransportError),

    #[error("Invalid file type: extension '{extension}' with content type '{content_type}'")]
    InvalidType {
        extension: String,
        content_type: String,
        /// Human label of the accepted types, e.g. "CSV"
        accepted: String,
    },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("Failed to create upload directory: {0}")]
    DirectoryCreateFailed(String),

    #[error("Failed to write uploaded file: {0}")]
    WriteFailed(String),
}

impl UploadError {
    /// Get the error type name for log fields
    pub fn error_type(&self) -> &'static str {
        match self {
            UploadError::Transport(_) => "Transport",
            UploadError::InvalidType { .. } => "InvalidType",
            UploadError::TooLarge { .. } => "TooLarge",
            UploadError::DirectoryCreateFailed(_) => "DirectoryCreateFailed",
            UploadError::WriteFailed(_) => "WriteFailed",
        }
    }
}

/// Formats a byte limit the way the upload form advertises it ("10MB").
fn format_limit(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            UploadError::Transport(_) => "TRANSPORT_ERROR",
            UploadError::InvalidType { .. } => "INVALID_TYPE",
            UploadError::TooLarge { .. } => "FILE_TOO_LARGE",
            UploadError::DirectoryCreateFailed(_) => "DIRECTORY_CREATE_FAILED",
            UploadError::WriteFailed(_) => "WRITE_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            UploadError::InvalidType { .. } | UploadError::TooLarge { .. }
        )
    }

    fn client_message(&self) -> String {
        match self {
            UploadError::Transport(err) => err.to_string(),
            UploadError::InvalidType { accepted, .. } => {
                format!("Please select a valid {} file.", accepted)
            }
            UploadError::TooLarge { max, .. } => format!(
                "File size is larger than the allowed limit of {}.",
                format_limit(*max)
            ),
            UploadError::DirectoryCreateFailed(_) | UploadError::WriteFailed(_) => {
                "There was a problem uploading your file. Please try again.".to_string()
            }
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::InvalidType { .. } | UploadError::TooLarge { .. } => LogLevel::Debug,
            UploadError::Transport(_) => LogLevel::Warn,
            UploadError::DirectoryCreateFailed(_) | UploadError::WriteFailed(_) => {
                LogLevel::Error
            }
        }
    }

    fn halts_render(&self) -> bool {
        matches!(
            self,
            UploadError::InvalidType { .. } | UploadError::TooLarge { .. }
        )
    }
}
