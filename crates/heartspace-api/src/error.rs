//! API error types and JSON error response formatting.
//!
//! Every failure leaves the server as `{ "error": code, "message": text }`
//! with a status matching the variant.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error};

use heartspace_chat::ChatError;
use heartspace_core::error::HeartspaceError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "not_found").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400 - malformed parameters.
    #[error("{0}")]
    BadRequest(String),
    /// 401 - missing, unknown, or expired bearer token; bad credentials.
    #[error("{0}")]
    Unauthorized(String),
    /// 403 - the resource belongs to someone else.
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    /// 409 - duplicate account, mood already tracked, reply still pending.
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    /// 422 - well-formed request whose content fails validation.
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    TooManyRequests(String),
    #[error("{0}")]
    Internal(String),
    /// 503 - a component is switched off.
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::UnprocessableEntity(_) => "unprocessable_entity",
            ApiError::TooManyRequests(_) => "too_many_requests",
            ApiError::Internal(_) => "internal_error",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<HeartspaceError> for ApiError {
    fn from(err: HeartspaceError) -> Self {
        if err.is_user_correctable() {
            debug!(error = %err, "Request rejected");
        }
        match err {
            HeartspaceError::Validation(msg) => ApiError::UnprocessableEntity(msg),
            HeartspaceError::NotFound(msg) => ApiError::NotFound(msg),
            HeartspaceError::Conflict(msg) => ApiError::Conflict(msg),
            HeartspaceError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            HeartspaceError::Forbidden(msg) => ApiError::Forbidden(msg),
            HeartspaceError::Media(msg) => ApiError::BadRequest(msg),
            err @ HeartspaceError::PayloadTooLarge { .. } => {
                ApiError::PayloadTooLarge(err.to_string())
            }
            other => {
                error!(error = %other, "Request failed");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Disabled => ApiError::ServiceUnavailable(err.to_string()),
            ChatError::EmptyMessage | ChatError::MessageTooLong(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            ChatError::SessionNotFound(_) => ApiError::NotFound(err.to_string()),
            ChatError::TurnPending(_) => ApiError::Conflict(err.to_string()),
            ChatError::Internal(_) => {
                error!(error = %err, "HeartBot failure");
                ApiError::Internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_heartspace_error_status_mapping() {
        let cases: Vec<(HeartspaceError, StatusCode)> = vec![
            (HeartspaceError::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (HeartspaceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (HeartspaceError::Conflict("x".into()), StatusCode::CONFLICT),
            (HeartspaceError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (HeartspaceError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (HeartspaceError::Media("x".into()), StatusCode::BAD_REQUEST),
            (
                HeartspaceError::PayloadTooLarge { size: 2, limit: 1 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (HeartspaceError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (HeartspaceError::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_chat_error_status_mapping() {
        let id = Uuid::new_v4();
        assert_eq!(
            ApiError::from(ChatError::TurnPending(id)).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(ChatError::SessionNotFound(id)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ChatError::EmptyMessage).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(ChatError::Disabled).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_error_message_keeps_detail() {
        let err = ApiError::from(HeartspaceError::Conflict("mood already tracked".into()));
        assert_eq!(err.code(), "conflict");
        assert_eq!(err.to_string(), "mood already tracked");
    }
}
