use crate::errors::AppError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// HTTP error body: `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Errors of the write pipeline: everything that is not an access
    /// problem collapses into 400.
    pub fn write(err: AppError) -> Self {
        match err {
            AppError::NotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            AppError::Unauthenticated(_) => Self::new(StatusCode::UNAUTHORIZED, err.to_string()),
            other => Self::new(StatusCode::BAD_REQUEST, other.to_string()),
        }
    }

    /// Errors of read-only endpoints: storage failures are server errors.
    pub fn read(err: AppError) -> Self {
        match err {
            AppError::NotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            AppError::Unauthenticated(_) => Self::new(StatusCode::UNAUTHORIZED, err.to_string()),
            AppError::InvalidPunchType(_) | AppError::Validation(_) => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            other => Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_errors_collapse_to_bad_request() {
        assert_eq!(ApiError::write(AppError::NoStoreAssigned).status, StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::write(AppError::Db(rusqlite::Error::QueryReturnedNoRows)).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::write(AppError::NotFound).status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn read_storage_errors_are_server_errors() {
        assert_eq!(
            ApiError::read(AppError::Db(rusqlite::Error::QueryReturnedNoRows)).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::read(AppError::Unauthenticated("x".into())).status,
            StatusCode::UNAUTHORIZED
        );
    }
}
