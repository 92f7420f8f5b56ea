//! Error types and their client-facing responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::models::ReportResponse;

/// Failure of the single outbound delivery attempt.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Timeout, connection failure, or any other transport error
    #[error("sink unreachable: {0}")]
    SinkUnreachable(#[source] reqwest::Error),

    /// Sink answered with a non-success status
    #[error("sink rejected message with status {status}")]
    SinkRejected { status: u16 },
}

/// Errors that terminate a `/report` request.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("rate limited")]
    RateLimited,

    #[error("payload too large")]
    PayloadTooLarge,

    /// Body absent, not JSON, or not an object
    #[error("invalid body")]
    InvalidBody,

    #[error("invalid brainrots")]
    InvalidBrainrots,

    #[error(transparent)]
    Forward(#[from] ForwardError),

    /// Anything unexpected. The detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InvalidBody | Self::InvalidBrainrots => StatusCode::BAD_REQUEST,
            Self::Forward(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable message code returned in the `msg` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::PayloadTooLarge => "payload_too_large",
            Self::InvalidBody => "invalid_body",
            Self::InvalidBrainrots => "invalid_brainrots",
            Self::Forward(_) => "discord_error",
            Self::Internal(_) => "server_error",
        }
    }

    /// Short label for the rejection metric.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Forward(ForwardError::SinkUnreachable(_)) => "sink_unreachable",
            Self::Forward(ForwardError::SinkRejected { .. }) => "sink_rejected",
            other => other.code(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            Self::Forward(ForwardError::SinkRejected { status }) => {
                tracing::warn!(status, "sink rejected report");
            }
            Self::Forward(ForwardError::SinkUnreachable(err)) => {
                tracing::warn!(error = %err, "sink unreachable");
            }
            Self::Internal(detail) => {
                tracing::error!(detail = %detail, "relay error");
            }
            _ => {}
        }

        let sink_status = match &self {
            Self::Forward(ForwardError::SinkRejected { status }) => Some(*status),
            _ => None,
        };
        let body = ReportResponse::failure(self.code(), sink_status);
        (self.status_code(), Json(body)).into_response()
    }
}
