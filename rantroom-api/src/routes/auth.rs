use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use rantroom_shared::clients::gateway::GatewayError;
use rantroom_shared::errors::{AppError, AppResult, ErrorCode};
use rantroom_shared::middleware::OptionalAuthUser;
use rantroom_shared::types::auth::{AuthUser, Session};
use rantroom_shared::types::ApiResponse;

use crate::models::CurrentIdentity;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    pub password: String,
}

fn validate_credentials(req: &CredentialsRequest) -> AppResult<()> {
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;
    if req.password.chars().count() < 6 {
        return Err(AppError::new(
            ErrorCode::PasswordTooWeak,
            "password must be at least 6 characters",
        ));
    }
    Ok(())
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> AppResult<Json<ApiResponse<Session>>> {
    validate_credentials(&req)?;

    let session = state
        .gateway
        .auth()
        .sign_up(&req.email, &req.password)
        .await
        .map_err(signup_error)?;

    tracing::info!(user_id = %session.user.id, "user signed up");

    Ok(Json(ApiResponse::ok(session)))
}

fn signup_error(err: GatewayError) -> AppError {
    match &err {
        GatewayError::Status { status, body } if matches!(status, 400 | 409 | 422) => {
            if body.contains("already") {
                AppError::new(ErrorCode::EmailAlreadyExists, "email already registered")
            } else {
                AppError::new(ErrorCode::BadRequest, "sign up rejected")
            }
        }
        _ => err.into(),
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> AppResult<Json<ApiResponse<Session>>> {
    validate_credentials(&req)?;

    let session = state
        .gateway
        .auth()
        .sign_in(&req.email, &req.password)
        .await
        .map_err(login_error)?;

    tracing::info!(user_id = %session.user.id, "user logged in");

    Ok(Json(ApiResponse::ok(session)))
}

fn login_error(err: GatewayError) -> AppError {
    match err.status() {
        Some(400) | Some(401) => {
            AppError::new(ErrorCode::InvalidCredentials, "invalid email or password")
        }
        _ => err.into(),
    }
}

pub async fn logout(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.gateway.auth().sign_out(&user.access_token).await?;

    tracing::info!(user_id = %user.id, "user signed out");

    Ok(Json(ApiResponse::ok_with_message((), "signed out")))
}

/// Resolve the identity for the current page load, or null when signed out.
pub async fn session(OptionalAuthUser(user): OptionalAuthUser) -> Json<ApiResponse<Option<CurrentIdentity>>> {
    let identity = user.map(|u| CurrentIdentity { id: u.id, email: u.email });
    Json(ApiResponse::ok(identity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_router, test_state, unreachable_state};
    use axum::routing::post;
    use axum::Router;
    use uuid::Uuid;

    fn creds(email: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn code_of(err: AppError) -> ErrorCode {
        match err {
            AppError::Known { code, .. } => code,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_email_is_rejected_before_any_gateway_call() {
        // The gateway address is unroutable: reaching it would error with a
        // transport failure, not a validation code.
        let state = unreachable_state();
        let err = signup(State(state), Json(creds("not-an-email", "secret1")))
            .await
            .unwrap_err();
        assert_eq!(code_of(err), ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn short_password_is_rejected_before_any_gateway_call() {
        let state = unreachable_state();
        let err = login(State(state), Json(creds("a@b.com", "12345")))
            .await
            .unwrap_err();
        assert_eq!(code_of(err), ErrorCode::PasswordTooWeak);
    }

    #[tokio::test]
    async fn signup_returns_the_gateway_session() {
        let user_id = Uuid::new_v4();
        let router = Router::new().route(
            "/auth/v1/signup",
            post(move || async move {
                axum::Json(serde_json::json!({
                    "access_token": "jwt-here",
                    "token_type": "bearer",
                    "expires_in": 3600,
                    "user": { "id": user_id, "email": "a@b.com" }
                }))
            }),
        );
        let state = test_state(&spawn_router(router).await);

        let resp = signup(State(state), Json(creds("a@b.com", "secret1")))
            .await
            .unwrap();
        assert_eq!(resp.0.data.user.id, user_id);
        assert_eq!(resp.0.data.access_token, "jwt-here");
    }

    #[tokio::test]
    async fn duplicate_email_maps_to_conflict() {
        let router = Router::new().route(
            "/auth/v1/signup",
            post(|| async {
                (axum::http::StatusCode::BAD_REQUEST, "user already registered")
            }),
        );
        let state = test_state(&spawn_router(router).await);

        let err = signup(State(state), Json(creds("a@b.com", "secret1")))
            .await
            .unwrap_err();
        assert_eq!(code_of(err), ErrorCode::EmailAlreadyExists);
    }

    #[tokio::test]
    async fn wrong_password_maps_to_invalid_credentials() {
        let router = Router::new().route(
            "/auth/v1/token",
            post(|| async {
                (axum::http::StatusCode::BAD_REQUEST, "invalid login credentials")
            }),
        );
        let state = test_state(&spawn_router(router).await);

        let err = login(State(state), Json(creds("a@b.com", "secret1")))
            .await
            .unwrap_err();
        assert_eq!(code_of(err), ErrorCode::InvalidCredentials);
    }

    #[tokio::test]
    async fn session_is_null_when_signed_out() {
        let resp = session(OptionalAuthUser(None)).await;
        assert!(resp.0.data.is_none());

        let resp = session(OptionalAuthUser(Some(AuthUser {
            id: Uuid::from_u128(5),
            email: Some("a@b.com".into()),
            access_token: "t".into(),
        })))
        .await;
        assert_eq!(resp.0.data.unwrap().id, Uuid::from_u128(5));
    }
}
