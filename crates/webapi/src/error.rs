//! API error type and HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Application error types surfaced to API clients
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request (bad body, bad path, duplicate resource)
    BadRequest(String),
    /// Missing or invalid credentials
    Unauthorized(String),
    /// Authenticated but not allowed (non-admin on admin routes)
    Forbidden(String),
    /// Resource does not exist or is not visible to the caller
    NotFound(String),
    /// A settings candidate violated a constraint
    Validation(String),
    /// Download links requested before any signing configuration exists
    LinksNotConfigured,
    /// An upstream service (qBittorrent, Jackett) failed or is absent
    ServiceUnavailable(String),
    /// Everything else
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "not found: {}", msg),
            ApiError::Validation(msg) => write!(f, "validation failed: {}", msg),
            ApiError::LinksNotConfigured => write!(f, "download links are not configured"),
            ApiError::ServiceUnavailable(msg) => write!(f, "service unavailable: {}", msg),
            ApiError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::LinksNotConfigured => (
                StatusCode::CONFLICT,
                "download links are not configured; save the signing settings first".to_string(),
            ),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<links::LinkError> for ApiError {
    fn from(err: links::LinkError) -> Self {
        match err {
            links::LinkError::Validation(msg) => ApiError::Validation(msg),
            links::LinkError::InvalidPath(msg) => ApiError::BadRequest(msg),
            links::LinkError::NotConfigured => ApiError::LinksNotConfigured,
            links::LinkError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<store::StoreError> for ApiError {
    fn from(err: store::StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<qbit_rs::Error> for ApiError {
    fn from(err: qbit_rs::Error) -> Self {
        ApiError::ServiceUnavailable(format!("qBittorrent unavailable: {}", err))
    }
}

impl From<jackett::JackettError> for ApiError {
    fn from(err: jackett::JackettError) -> Self {
        ApiError::ServiceUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::LinksNotConfigured, StatusCode::CONFLICT),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_link_error_conversion() {
        let err: ApiError = links::LinkError::NotConfigured.into();
        assert!(matches!(err, ApiError::LinksNotConfigured));

        let err: ApiError = links::LinkError::InvalidPath("bad".into()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = links::LinkError::Validation("short".into()).into();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
