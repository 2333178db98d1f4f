use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Gateway rows ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RantRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub likes_count: i64,
    pub comments_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: Uuid,
    pub rant_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeRow {
    pub rant_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// --- Insert payloads ---

#[derive(Debug, Serialize)]
pub struct NewRant<'a> {
    pub author_id: Uuid,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NewComment<'a> {
    pub rant_id: Uuid,
    pub author_id: Uuid,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NewLike {
    pub rant_id: Uuid,
    pub user_id: Uuid,
}

// --- View models ---

/// Author fields as rendered on a card; resolved from the current profile
/// row at fetch time, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct RantAuthor {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RantView {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user: RantAuthor,
    pub likes_count: i64,
    pub comments_count: i64,
    pub user_has_liked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub rant_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user: RantAuthor,
}

#[derive(Debug, Serialize)]
pub struct FeedPage {
    pub rants: Vec<RantView>,
    pub page: u64,
    pub per_page: u64,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub profile: ProfileRow,
    pub rants: Vec<RantView>,
    pub has_more: bool,
    pub liked: Vec<RantView>,
}

#[derive(Debug, Serialize)]
pub struct ComposerContext {
    pub profile: ProfileRow,
    pub max_length: usize,
}

#[derive(Debug, Serialize)]
pub struct LikeState {
    pub liked: bool,
    pub likes_count: i64,
}

#[derive(Debug, Serialize)]
pub struct CommentPosted {
    pub comment: CommentView,
    pub comments_count: i64,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: Uuid,
}

/// The identity resolved for the current request, or null when signed out.
#[derive(Debug, Serialize)]
pub struct CurrentIdentity {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
