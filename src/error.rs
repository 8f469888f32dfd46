use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::APIResponse;

/// Per-request failures. The message is what the client sees; storage causes
/// are logged where they happen and never leave the process.
#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("ValidationError: {message}")]
    ValidationError { status: StatusCode, message: &'static str },
    #[error("StorageError: {message}")]
    StorageError { message: &'static str },
}

impl ApiError {
    pub fn malformed_body() -> Self {
        ApiError::ValidationError {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "request failed",
        }
    }

    pub fn empty_id() -> Self {
        ApiError::ValidationError {
            status: StatusCode::BAD_REQUEST,
            message: "id cannot be empty",
        }
    }

    pub fn invalid_id() -> Self {
        ApiError::ValidationError {
            status: StatusCode::BAD_REQUEST,
            message: "id must be a number",
        }
    }

    pub fn storage(message: &'static str) -> Self {
        ApiError::StorageError { message }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ValidationError { status, .. } => *status,
            ApiError::StorageError { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApiError::ValidationError { message, .. } | ApiError::StorageError { message } => *message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(APIResponse::new_from_msg(self.message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::malformed_body().status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::empty_id().status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::invalid_id().status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::storage("could not get books").status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_display() {
        assert_eq!(ApiError::empty_id().to_string(), "ValidationError: id cannot be empty");
        assert_eq!(
            ApiError::storage("could not delete book").to_string(),
            "StorageError: could not delete book"
        );
    }
}
