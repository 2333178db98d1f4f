use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use rantroom_shared::errors::{AppError, AppResult, ErrorCode};
use rantroom_shared::middleware::OptionalAuthUser;
use rantroom_shared::types::auth::AuthUser;
use rantroom_shared::types::ApiResponse;

use crate::models::{ComposerContext, Deleted, LikeRow, LikeState, NewLike, NewRant, ProfileRow, RantRow, RantView};
use crate::services::feed::{self, AuthorCache};
use crate::services::content;
use crate::AppState;

use super::require_author;

async fn current_profile(state: &AppState, user: &AuthUser) -> AppResult<Option<ProfileRow>> {
    let profile = state
        .gateway
        .from("profiles")
        .select("*")
        .eq("id", user.id)
        .fetch_maybe()
        .await?;
    Ok(profile)
}

// --- GET /create ---

pub async fn composer_context(
    OptionalAuthUser(user): OptionalAuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ComposerContext>>> {
    let user = require_author(user)?;

    let profile = current_profile(&state, &user)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    Ok(Json(ApiResponse::ok(ComposerContext {
        profile,
        max_length: content::RANT_MAX_CHARS,
    })))
}

// --- POST /create ---

#[derive(Debug, Deserialize)]
pub struct ComposeRequest {
    pub content: String,
}

pub async fn compose(
    OptionalAuthUser(user): OptionalAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ComposeRequest>,
) -> AppResult<Json<ApiResponse<RantView>>> {
    let user = require_author(user)?;
    content::validate_rant(&req.content)?;

    let row: RantRow = state
        .gateway
        .from("rants")
        .authorized(&user.access_token)
        .insert(&NewRant {
            author_id: user.id,
            content: &req.content,
        })
        .await?;

    // Attribute the new rant to the author's current profile row.
    let authors = AuthorCache::seeded(current_profile(&state, &user).await?.into_iter().collect());
    let view = feed::view_of(row, &authors, &HashSet::new());

    tracing::info!(rant_id = %view.id, user_id = %user.id, "rant posted");

    Ok(Json(ApiResponse::ok_with_message(view, "your rant has been posted")))
}

// --- DELETE /rants/:id ---

pub async fn delete_rant(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    // Scoped to both the row id and the acting identity; the gateway's row
    // rules are the real enforcement.
    let deleted: Vec<RantRow> = state
        .gateway
        .from("rants")
        .eq("id", id)
        .eq("author_id", user.id)
        .authorized(&user.access_token)
        .delete()
        .await?;

    if deleted.is_empty() {
        return Err(AppError::new(ErrorCode::RantNotFound, "rant not found"));
    }

    tracing::info!(rant_id = %id, user_id = %user.id, "rant deleted");

    Ok(Json(ApiResponse::ok_with_message(Deleted { id }, "rant deleted")))
}

// --- POST /rants/:id/like ---

pub async fn toggle_like(
    user: AuthUser,
    State(state): State<AppState>,
    Path(rant_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<LikeState>>> {
    let rant: RantRow = state
        .gateway
        .from("rants")
        .select("*")
        .eq("id", rant_id)
        .fetch_maybe()
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RantNotFound, "rant not found"))?;

    let existing: Option<LikeRow> = state
        .gateway
        .from("likes")
        .select("*")
        .eq("rant_id", rant_id)
        .eq("user_id", user.id)
        .authorized(&user.access_token)
        .fetch_maybe()
        .await?;

    let liked = if existing.is_some() {
        let _: Vec<LikeRow> = state
            .gateway
            .from("likes")
            .eq("rant_id", rant_id)
            .eq("user_id", user.id)
            .authorized(&user.access_token)
            .delete()
            .await?;
        false
    } else {
        let _: LikeRow = state
            .gateway
            .from("likes")
            .authorized(&user.access_token)
            .insert(&NewLike {
                rant_id,
                user_id: user.id,
            })
            .await?;
        true
    };

    // Reconcile the displayed count from the gateway row.
    let likes_count = state
        .gateway
        .from("rants")
        .select("*")
        .eq("id", rant_id)
        .fetch_maybe::<RantRow>()
        .await?
        .map(|r| r.likes_count)
        .unwrap_or(rant.likes_count);

    tracing::debug!(rant_id = %rant_id, user_id = %user.id, liked, "like toggled");

    Ok(Json(ApiResponse::ok(LikeState { liked, likes_count })))
}
