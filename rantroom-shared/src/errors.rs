use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::clients::gateway::GatewayError;
use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{range}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Auth/session errors
/// - E2xxx: Feed/profile/content errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    BadRequest,
    GatewayUnavailable,

    // Auth (E1xxx)
    InvalidCredentials,
    EmailAlreadyExists,
    TokenExpired,
    TokenInvalid,
    PasswordTooWeak,

    // Feed/profile/content (E2xxx)
    ProfileNotFound,
    RantNotFound,
    CommentNotFound,
    RantEmpty,
    RantTooLong,
    CommentEmpty,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::BadRequest => "E0006",
            Self::GatewayUnavailable => "E0007",

            // Auth
            Self::InvalidCredentials => "E1001",
            Self::EmailAlreadyExists => "E1002",
            Self::TokenExpired => "E1003",
            Self::TokenInvalid => "E1004",
            Self::PasswordTooWeak => "E1005",

            // Feed/profile/content
            Self::ProfileNotFound => "E2001",
            Self::RantNotFound => "E2002",
            Self::CommentNotFound => "E2003",
            Self::RantEmpty => "E2004",
            Self::RantTooLong => "E2005",
            Self::CommentEmpty => "E2006",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::GatewayUnavailable => StatusCode::BAD_GATEWAY,
            Self::ValidationError | Self::BadRequest | Self::PasswordTooWeak
            | Self::RantEmpty | Self::RantTooLong | Self::CommentEmpty => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::ProfileNotFound | Self::RantNotFound
            | Self::CommentNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::InvalidCredentials | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::EmailAlreadyExists => StatusCode::CONFLICT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Gateway(err) => {
                tracing::error!(error = %err, "gateway call failed");
                match err.status() {
                    Some(401) => (
                        StatusCode::UNAUTHORIZED,
                        ApiErrorResponse::new("E0004", "gateway rejected the session"),
                    ),
                    Some(403) => (
                        StatusCode::FORBIDDEN,
                        ApiErrorResponse::new("E0005", "gateway refused the operation"),
                    ),
                    Some(404) | Some(406) => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "resource not found"),
                    ),
                    _ => (
                        StatusCode::BAD_GATEWAY,
                        ApiErrorResponse::new("E0007", "gateway unavailable"),
                    ),
                }
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("E0002", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_string(err: AppError) -> String {
        let response = err.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn known_error_envelope() {
        let json = body_string(AppError::new(ErrorCode::RantNotFound, "rant not found")).await;
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "E2002");
        assert_eq!(value["error"]["message"], "rant not found");
    }

    #[tokio::test]
    async fn details_are_carried() {
        let err = AppError::with_details(
            ErrorCode::Unauthorized,
            "sign in required",
            serde_json::json!({"redirect": "/auth"}),
        );
        let json = body_string(err).await;
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["error"]["details"]["redirect"], "/auth");
    }

    #[tokio::test]
    async fn status_codes() {
        assert_eq!(
            AppError::new(ErrorCode::RantTooLong, "too long").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::new(ErrorCode::ProfileNotFound, "gone").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::new(ErrorCode::EmailAlreadyExists, "taken").into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::unauthorized("nope").into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn gateway_status_mapping() {
        let not_found = AppError::from(GatewayError::Status { status: 404, body: String::new() });
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let denied = AppError::from(GatewayError::Status { status: 403, body: String::new() });
        assert_eq!(denied.into_response().status(), StatusCode::FORBIDDEN);

        let down = AppError::from(GatewayError::Status { status: 500, body: String::new() });
        assert_eq!(down.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
