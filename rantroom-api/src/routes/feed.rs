use axum::extract::{Query, State};
use axum::Json;

use rantroom_shared::errors::AppResult;
use rantroom_shared::middleware::OptionalAuthUser;
use rantroom_shared::types::pagination::PaginationParams;
use rantroom_shared::types::ApiResponse;

use crate::models::FeedPage;
use crate::services::feed;
use crate::AppState;

/// GET / - one window of the reverse-chronological feed.
pub async fn feed_page(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<FeedPage>>> {
    let page = params.page.max(1);
    let per_page = params.limit();

    let load = feed::load_page(&state.gateway, viewer.as_ref(), page, per_page).await?;

    Ok(Json(ApiResponse::ok(FeedPage {
        rants: load.rants,
        page,
        per_page,
        has_more: load.has_more,
    })))
}
