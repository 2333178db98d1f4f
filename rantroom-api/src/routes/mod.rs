use rantroom_shared::errors::{AppError, AppResult, ErrorCode};
use rantroom_shared::types::auth::AuthUser;

pub mod auth;
pub mod comments;
pub mod feed;
pub mod health;
pub mod profile;
pub mod rants;

/// Gate a write action on a signed-in identity; the rejection carries the
/// auth view to redirect to.
pub(crate) fn require_author(user: Option<AuthUser>) -> AppResult<AuthUser> {
    user.ok_or_else(|| {
        AppError::with_details(
            ErrorCode::Unauthorized,
            "sign in required",
            serde_json::json!({ "redirect": "/auth" }),
        )
    })
}
