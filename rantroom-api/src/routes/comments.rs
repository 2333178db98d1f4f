use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use rantroom_shared::clients::gateway::Order;
use rantroom_shared::errors::{AppError, AppResult, ErrorCode};
use rantroom_shared::middleware::OptionalAuthUser;
use rantroom_shared::types::auth::AuthUser;
use rantroom_shared::types::ApiResponse;

use crate::models::{CommentPosted, CommentRow, CommentView, Deleted, NewComment, ProfileRow, RantRow};
use crate::services::content;
use crate::services::feed::AuthorCache;
use crate::AppState;

use super::require_author;

fn view_of(row: CommentRow, authors: &AuthorCache) -> CommentView {
    let user = authors.author(row.author_id);
    CommentView {
        id: row.id,
        rant_id: row.rant_id,
        content: row.content,
        created_at: row.created_at,
        user,
    }
}

// --- GET /rants/:id/comments ---

pub async fn list_comments(
    State(state): State<AppState>,
    Path(rant_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<CommentView>>>> {
    let rows: Vec<CommentRow> = state
        .gateway
        .from("comments")
        .select("*")
        .eq("rant_id", rant_id)
        .order("created_at", Order::Descending)
        .fetch()
        .await?;

    let mut author_ids: Vec<Uuid> = rows.iter().map(|c| c.author_id).collect();
    author_ids.sort();
    author_ids.dedup();
    let authors = AuthorCache::load(&state.gateway, &author_ids).await?;

    let comments = rows.into_iter().map(|row| view_of(row, &authors)).collect();

    Ok(Json(ApiResponse::ok(comments)))
}

// --- POST /rants/:id/comments ---

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub content: String,
}

pub async fn add_comment(
    OptionalAuthUser(user): OptionalAuthUser,
    State(state): State<AppState>,
    Path(rant_id): Path<Uuid>,
    Json(req): Json<AddCommentRequest>,
) -> AppResult<Json<ApiResponse<CommentPosted>>> {
    let user = require_author(user)?;
    content::validate_comment(&req.content)?;

    let rant: RantRow = state
        .gateway
        .from("rants")
        .select("*")
        .eq("id", rant_id)
        .fetch_maybe()
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RantNotFound, "rant not found"))?;

    let row: CommentRow = state
        .gateway
        .from("comments")
        .authorized(&user.access_token)
        .insert(&NewComment {
            rant_id,
            author_id: user.id,
            content: &req.content,
        })
        .await?;

    let profile: Option<ProfileRow> = state
        .gateway
        .from("profiles")
        .select("*")
        .eq("id", user.id)
        .fetch_maybe()
        .await?;
    let authors = AuthorCache::seeded(profile.into_iter().collect());

    // Reconcile the displayed count from the gateway row.
    let comments_count = state
        .gateway
        .from("rants")
        .select("*")
        .eq("id", rant_id)
        .fetch_maybe::<RantRow>()
        .await?
        .map(|r| r.comments_count)
        .unwrap_or(rant.comments_count);

    tracing::info!(comment_id = %row.id, rant_id = %rant_id, user_id = %user.id, "comment posted");

    Ok(Json(ApiResponse::ok(CommentPosted {
        comment: view_of(row, &authors),
        comments_count,
    })))
}

// --- DELETE /comments/:id ---

pub async fn delete_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    let deleted: Vec<CommentRow> = state
        .gateway
        .from("comments")
        .eq("id", id)
        .eq("author_id", user.id)
        .authorized(&user.access_token)
        .delete()
        .await?;

    if deleted.is_empty() {
        return Err(AppError::new(ErrorCode::CommentNotFound, "comment not found"));
    }

    tracing::info!(comment_id = %id, user_id = %user.id, "comment deleted");

    Ok(Json(ApiResponse::ok_with_message(Deleted { id }, "comment deleted")))
}
