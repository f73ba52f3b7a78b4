//! Error types for SetView.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Set resolution failed: {0}")]
    Resolution(String),

    #[error("Member fetch failed: {0}")]
    Fetch(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid set reference: {0}")]
    InvalidReference(String),

    #[error("Invalid type string: {0}")]
    InvalidTypeString(String),

    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable identifier for the error kind, used in [`ErrorReport`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Resolution(_) => ErrorKind::Resolution,
            Self::Fetch(_) => ErrorKind::Fetch,
            Self::MalformedResponse(_) | Self::InvalidTypeString(_) | Self::Json(_) => {
                ErrorKind::MalformedResponse
            }
            Self::InvalidReference(_) => ErrorKind::InvalidReference,
            Self::Lifecycle(_) => ErrorKind::Lifecycle,
            Self::Render(_) => ErrorKind::Render,
            Self::Config(_) | Self::Io(_) => ErrorKind::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Error categories visible to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Resolution,
    Fetch,
    MalformedResponse,
    InvalidReference,
    Lifecycle,
    Render,
    Config,
}

/// Error descriptor delivered to the renderer when a start fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for ErrorReport {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_carries_kind_and_message() {
        let err = Error::Fetch("workspace unavailable".into());
        let report = ErrorReport::from(&err);
        assert_eq!(report.kind, ErrorKind::Fetch);
        assert_eq!(report.message, "Member fetch failed: workspace unavailable");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "fetch");
    }

    #[test]
    fn test_type_string_errors_report_as_malformed() {
        let err = Error::InvalidTypeString("Reads".into());
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }
}
