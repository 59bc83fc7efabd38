use crate::models::ErrorBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tooling::ToolError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Invalid header '{0}': value is not visible ASCII")]
    InvalidHeader(String),

    /// Configured credentials are never sent to a caller-chosen host.
    #[error("Header '{0}' requires both credential headers on the same request")]
    BaseUrlWithoutCredentials(String),
}

impl ApiError {
    /// Returns the appropriate HTTP status code for this error
    pub fn http_status_code(&self) -> u16 {
        match self {
            ApiError::Tool(err) => match err {
                ToolError::Validation { .. } => 400,    // Bad Request
                ToolError::NotFound(_) => 404,          // Not Found
                ToolError::Upstream { .. } => 502,      // Bad Gateway
                ToolError::Decode(_) => 502,            // Bad Gateway (garbage from upstream)
                ToolError::Transport(_) => 504,         // Gateway Timeout / unreachable
                ToolError::InvalidContext(_) => 500,    // Misconfigured runtime
                ToolError::DuplicateTool(_) => 500,     // Startup bug
            },
            ApiError::InvalidHeader(_) | ApiError::BaseUrlWithoutCredentials(_) => 400,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Tool(err) => err.kind(),
            ApiError::InvalidHeader(_) | ApiError::BaseUrlWithoutCredentials(_) => "validation",
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Tool(err) => err.is_retryable(),
            ApiError::InvalidHeader(_) | ApiError::BaseUrlWithoutCredentials(_) => false,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
            kind: self.kind().to_string(),
            retryable: self.is_retryable(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_body())).into_response()
    }
}
