use adapter::FreshdeskError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::PayloadError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to add note: {0}")]
    UpstreamFailure(String),

    #[error("An internal server error occurred")]
    Internal { details: String },
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UpstreamFailure(_) | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<PayloadError> for ApiError {
    fn from(e: PayloadError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<FreshdeskError> for ApiError {
    fn from(e: FreshdeskError) -> Self {
        match e {
            FreshdeskError::Rejected { body, .. } => ApiError::UpstreamFailure(body),
            other => ApiError::Internal {
                details: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Internal { details } => error!("An error occurred: {}", details),
            ApiError::UpstreamFailure(_) => error!("{}", self),
            _ => warn!(%status, "{}", self),
        }

        let details = match &self {
            ApiError::Internal { details } => Some(details.clone()),
            _ => None,
        };

        let body = ErrorBody {
            error: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
