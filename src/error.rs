use std::io;
use std::path::PathBuf;

use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// A type-erased error, used at the injected-hook boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Multipart Error
#[derive(Debug, Error)]
pub enum Error {
    /// File too large
    #[error("file is too large, limit to `{0}`")]
    FileTooLarge(usize),

    /// Files too many
    #[error("files is too many, limit to `{0}`")]
    FilesTooMany(usize),

    /// Field too large
    #[error("field is too large, limit to `{0}`")]
    FieldTooLarge(usize),

    /// Field name is too long
    #[error("field name is too long, limit to `{0}`")]
    FieldNameTooLong(usize),

    /// Fields too many
    #[error("fields is too many, limit to `{0}`")]
    FieldsTooMany(usize),

    /// Parts too many
    #[error("parts is too many, limit to `{0}`")]
    PartsTooMany(usize),

    /// Content type absent from the allow-list
    #[error("content type `{0}` is not allowed")]
    InvalidContentType(String),

    /// File extension absent from the allow-list
    #[error("file extension `{0}` is not allowed")]
    InvalidExtension(String),

    /// The injected validator rejected a file
    #[error("file validation failed: {0}")]
    ValidationFailed(String),

    /// The request is not one the adapter can consume
    #[error("unsupported request shape: {0}")]
    UnsupportedRequest(&'static str),

    /// IO Error
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Parser-level error from the wrapped multipart library
    #[error("multipart parse error: {0}")]
    Parse(multer::Error),

    /// Failure inside an injected handler
    #[error("internal error: {0}")]
    Internal(BoxError),
}

impl Error {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileTooLarge(_) => "FILE_SIZE_LIMIT",
            Self::FilesTooMany(_) => "FILE_COUNT_LIMIT",
            Self::FieldTooLarge(_) => "FIELD_SIZE_LIMIT",
            Self::FieldNameTooLong(_) => "FIELD_NAME_LIMIT",
            Self::FieldsTooMany(_) => "FIELD_COUNT_LIMIT",
            Self::PartsTooMany(_) => "PART_COUNT_LIMIT",
            Self::InvalidContentType(_) => "INVALID_MIME_TYPE",
            Self::InvalidExtension(_) => "INVALID_EXTENSION",
            Self::ValidationFailed(_) => "VALIDATION_FAILED",
            Self::UnsupportedRequest(_) => "UNSUPPORTED_REQUEST",
            Self::Io(_) => "FILESYSTEM_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status this error maps to: 413 for limits, 415 for
    /// type/extension rejections, 422 for validation failures, 400 for
    /// parse errors and unsupported shapes, 500 otherwise.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::FileTooLarge(_)
            | Self::FilesTooMany(_)
            | Self::FieldTooLarge(_)
            | Self::FieldNameTooLong(_)
            | Self::FieldsTooMany(_)
            | Self::PartsTooMany(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InvalidContentType(_) | Self::InvalidExtension(_) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            Self::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UnsupportedRequest(_) | Self::Parse(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wire payload for the HTTP layer.
    pub fn response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code(),
            message: self.to_string(),
            details: None,
        }
    }
}

impl From<multer::Error> for Error {
    fn from(err: multer::Error) -> Self {
        // The session enforces its own limits, but the wrapped parser can
        // still signal size violations when constraints are set on it.
        match err {
            multer::Error::FieldSizeExceeded { limit, .. } => Self::FieldTooLarge(limit as usize),
            multer::Error::StreamSizeExceeded { limit, .. } => Self::FileTooLarge(limit as usize),
            err => Self::Parse(err),
        }
    }
}

/// Error payload surfaced to the HTTP layer.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional extra context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Attaches extra context to the payload.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details.replace(details.into());
        self
    }
}

/// Route discovery Error
#[derive(Debug, Error)]
pub enum RouteError {
    /// The configured root is missing or not a directory
    #[error("route root `{}` is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// A file outside the configured root was handed to the transformer
    #[error("file `{}` is outside of root `{}`", .file.display(), .root.display())]
    OutsideRoot {
        /// The offending file.
        file: PathBuf,
        /// The configured root.
        root: PathBuf,
    },

    /// Directory walk failure
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// IO Error
    #[error(transparent)]
    Io(#[from] io::Error),
}
