use rantroom_shared::errors::{AppError, AppResult, ErrorCode};

/// Upper bound on rant content length, in characters.
pub const RANT_MAX_CHARS: usize = 500;

/// Content rules for a rant, checked before any gateway call.
pub fn validate_rant(content: &str) -> AppResult<()> {
    if content.trim().is_empty() {
        return Err(AppError::new(ErrorCode::RantEmpty, "rant cannot be empty"));
    }
    if content.chars().count() > RANT_MAX_CHARS {
        return Err(AppError::new(
            ErrorCode::RantTooLong,
            format!("rant cannot be longer than {RANT_MAX_CHARS} characters"),
        ));
    }
    Ok(())
}

/// Comments only require non-empty content.
pub fn validate_comment(content: &str) -> AppResult<()> {
    if content.trim().is_empty() {
        return Err(AppError::new(ErrorCode::CommentEmpty, "comment cannot be empty"));
    }
    Ok(())
}
