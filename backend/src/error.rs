use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;

/// Structured error response returned by all endpoints on failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `PARSE_ERROR`, `STORAGE_ERROR`, `IMAGE_ERROR`, `INTERNAL_ERROR`.
    pub code: &'static str,
    /// Human-readable error description.
    pub message: String,
}

/// Application-level error type.
///
/// Each variant carries a fixed HTTP status: validation failures are 400,
/// missing assets and records are 404, everything else is a 500 with the
/// cause in the message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// The uploaded tabular file could not be parsed.
    #[error("error parsing file: {0}")]
    Parse(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Parse(_) => "PARSE_ERROR",
            ApiError::Storage(StorageError::NotFound(_)) => "NOT_FOUND",
            ApiError::Storage(StorageError::InvalidKey(_)) => "VALIDATION_ERROR",
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Image(_) => "IMAGE_ERROR",
            ApiError::Serialize(_) | ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Storage(StorageError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("internal error: {}", self);
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            code: self.code(),
            message: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::Validation("file must be PNG or JPG".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::NotFound("certificate not found".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_not_found_maps_to_404() {
        let err = ApiError::Storage(StorageError::NotFound("docs/x.json".into()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn invalid_key_maps_to_bad_request() {
        let err = ApiError::Storage(StorageError::InvalidKey("../etc/passwd".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn parse_maps_to_internal() {
        let err = ApiError::Parse("bad header".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "PARSE_ERROR");
    }
}
