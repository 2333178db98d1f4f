use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use rantroom_shared::clients::gateway::Order;
use rantroom_shared::errors::{AppError, AppResult, ErrorCode};
use rantroom_shared::middleware::OptionalAuthUser;
use rantroom_shared::types::auth::AuthUser;
use rantroom_shared::types::pagination::PaginationParams;
use rantroom_shared::types::ApiResponse;

use crate::models::{LikeRow, ProfilePage, ProfileRow, RantRow};
use crate::services::feed::{self, AuthorCache};
use crate::AppState;

/// Upper bound on the liked-rants list shown on a profile.
const LIKED_LIMIT: u64 = 50;

// --- GET /profile ---

pub async fn own_profile(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<ProfilePage>>> {
    let page = profile_page(&state, Some(&user), user.id, &params).await?;
    Ok(Json(ApiResponse::ok(page)))
}

// --- GET /user/:user_id ---

pub async fn user_profile(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<ProfilePage>>> {
    let page = profile_page(&state, viewer.as_ref(), user_id, &params).await?;
    Ok(Json(ApiResponse::ok(page)))
}

async fn profile_page(
    state: &AppState,
    viewer: Option<&AuthUser>,
    target: Uuid,
    params: &PaginationParams,
) -> AppResult<ProfilePage> {
    let profile: ProfileRow = state
        .gateway
        .from("profiles")
        .select("*")
        .eq("id", target)
        .fetch_maybe()
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    let (from, to) = params.window();
    let rows: Vec<RantRow> = state
        .gateway
        .from("rants")
        .select("*")
        .eq("author_id", target)
        .order("created_at", Order::Descending)
        .range(from, to)
        .fetch()
        .await?;
    let has_more = rows.len() as u64 == params.limit();

    // Every rant in this list is authored by the profile itself.
    let authors = AuthorCache::seeded(vec![profile.clone()]);

    let like_rows: Vec<LikeRow> = state
        .gateway
        .from("likes")
        .select("*")
        .eq("user_id", target)
        .order("created_at", Order::Descending)
        .range(0, LIKED_LIMIT - 1)
        .fetch()
        .await?;
    let liked_rant_ids: Vec<Uuid> = like_rows.iter().map(|l| l.rant_id).collect();
    let liked_rows: Vec<RantRow> = if liked_rant_ids.is_empty() {
        Vec::new()
    } else {
        state
            .gateway
            .from("rants")
            .select("*")
            .in_list("id", &liked_rant_ids)
            .order("created_at", Order::Descending)
            .fetch()
            .await?
    };

    let mut liked_author_ids: Vec<Uuid> = liked_rows.iter().map(|r| r.author_id).collect();
    liked_author_ids.sort();
    liked_author_ids.dedup();
    let liked_authors = AuthorCache::load(&state.gateway, &liked_author_ids).await?;

    let mut all_ids: Vec<Uuid> = rows
        .iter()
        .map(|r| r.id)
        .chain(liked_rows.iter().map(|r| r.id))
        .collect();
    all_ids.sort();
    all_ids.dedup();
    let viewer_liked = match viewer {
        Some(v) => feed::liked_ids(&state.gateway, v, &all_ids).await?,
        None => HashSet::new(),
    };

    let rants = rows
        .into_iter()
        .map(|r| feed::view_of(r, &authors, &viewer_liked))
        .collect();
    let liked = liked_rows
        .into_iter()
        .map(|r| feed::view_of(r, &liked_authors, &viewer_liked))
        .collect();

    Ok(ProfilePage {
        profile,
        rants,
        has_more,
        liked,
    })
}
