/// Error handling module
///
/// Provides unified error responses. Internal reasons are logged, never sent.
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AuthError;
use crate::repository::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized(reason) => {
                tracing::debug!(reason = %reason, "Credential rejected");
                ApiError::Unauthorized
            }
            AuthError::ProviderUnavailable(details) => {
                tracing::error!(error = %details, "Session provider unavailable");
                ApiError::Internal {
                    reason: "session provider unavailable".to_string(),
                }
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Record store query failed");
        ApiError::Internal {
            reason: "record store unavailable".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            ApiError::Unauthorized => "Unauthorized",
            ApiError::Internal { .. } => "Internal server error",
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error.to_string(),
        })
    }
}
