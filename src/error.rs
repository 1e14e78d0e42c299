use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Request-level failure taxonomy. Every variant is caught at the handler
/// boundary and converted to an HTTP status plus JSON error body; nothing
/// here takes down the process.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("City not found")]
    NotFound,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::BadRequest(message) => json!({ "error": message }),
            ApiError::NotFound => json!({ "error": "City not found" }),
            ApiError::Upstream(err) => {
                tracing::error!("Upstream failure: {}", err);
                json!({
                    "error": "Failed to fetch weather data",
                    "details": err.to_string(),
                })
            }
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {}", err);
                json!({
                    "error": "Internal server error",
                    "details": err.to_string(),
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("Missing city name").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Upstream(UpstreamError::Provider {
                provider: "weatherapi",
                reason: "boom".to_string(),
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_is_stable() {
        assert_eq!(ApiError::NotFound.to_string(), "City not found");
    }
}
