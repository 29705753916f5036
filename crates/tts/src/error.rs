use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TtsError>;

/// Failures of a synthesis call, as reported to clients
///
/// Messages are fixed or built from validation and status-line text only.
/// Upstream bodies and parse details are logged where they occur and never
/// carried in a variant.
#[derive(Debug, Error)]
pub enum TtsError {
    /// Client-correctable request problem
    #[error("{0}")]
    InvalidInput(String),

    /// Provider unreachable, timed out, or answered with a non-success status
    #[error("Voice generation failed: {summary}")]
    UpstreamError { status: Option<u16>, summary: String },

    /// Provider answered with a shape that carries no recognizable audio
    #[error("Unexpected response format from voice API")]
    UnexpectedFormat,

    /// Provider answered with zero bytes of audio
    #[error("Failed to process voice generation request")]
    EmptyAudio,

    /// Anything else that went wrong while handling the request
    #[error("Internal server error during voice generation")]
    InternalError,
}

impl TtsError {
    /// Upstream answered with a non-success status
    pub fn upstream_status(status: http::StatusCode) -> Self {
        let summary = match status.canonical_reason() {
            Some(reason) => format!("{} {reason}", status.as_u16()),
            None => status.as_u16().to_string(),
        };

        Self::UpstreamError {
            status: Some(status.as_u16()),
            summary,
        }
    }

    /// Upstream could not be reached or did not answer in time
    pub fn upstream_transport(err: &reqwest::Error) -> Self {
        let summary = if err.is_timeout() {
            "upstream timed out"
        } else if err.is_connect() {
            "upstream unreachable"
        } else {
            "upstream transport error"
        };

        Self::UpstreamError {
            status: err.status().map(|s| s.as_u16()),
            summary: summary.to_string(),
        }
    }

    /// HTTP status code returned to the client
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamError { .. } | Self::UnexpectedFormat | Self::EmptyAudio | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable error kind
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::UpstreamError { .. } => "upstream_error",
            Self::UnexpectedFormat => "unexpected_format",
            Self::EmptyAudio => "empty_audio",
            Self::InternalError => "internal_error",
        }
    }
}

/// Error body returned to clients
#[derive(Debug, Serialize)]
struct ErrorResponse<'a> {
    error: String,
    kind: &'a str,
}

impl IntoResponse for TtsError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            kind: self.kind(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
