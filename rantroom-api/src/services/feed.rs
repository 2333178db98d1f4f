use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use tokio::sync::Mutex;
use uuid::Uuid;

use rantroom_shared::clients::gateway::{GatewayClient, GatewayError, Order};
use rantroom_shared::types::auth::AuthUser;

use crate::models::{LikeRow, ProfileRow, RantAuthor, RantRow, RantView};

/// Display name rendered when an author's profile row cannot be resolved.
pub const ANONYMOUS: &str = "Anonymous";

/// Author rows for one fetch cycle, keyed by author id.
///
/// Built fresh per page fetch from a single batched lookup and discarded
/// with it; never reused across fetches.
pub struct AuthorCache {
    authors: HashMap<Uuid, ProfileRow>,
}

impl AuthorCache {
    pub async fn load(gateway: &GatewayClient, ids: &[Uuid]) -> Result<Self, GatewayError> {
        if ids.is_empty() {
            return Ok(Self { authors: HashMap::new() });
        }
        let rows: Vec<ProfileRow> = gateway
            .from("profiles")
            .select("*")
            .in_list("id", ids)
            .fetch()
            .await?;
        Ok(Self::seeded(rows))
    }

    pub fn seeded(rows: Vec<ProfileRow>) -> Self {
        Self {
            authors: rows.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn author(&self, id: Uuid) -> RantAuthor {
        match self.authors.get(&id) {
            Some(profile) => RantAuthor {
                id,
                name: profile.display_name.clone(),
                avatar_url: profile.avatar_url.clone(),
            },
            None => RantAuthor {
                id,
                name: ANONYMOUS.to_string(),
                avatar_url: None,
            },
        }
    }
}

/// The rant ids among `rant_ids` that `viewer` has liked, in one batched
/// lookup.
pub async fn liked_ids(
    gateway: &GatewayClient,
    viewer: &AuthUser,
    rant_ids: &[Uuid],
) -> Result<HashSet<Uuid>, GatewayError> {
    if rant_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let rows: Vec<LikeRow> = gateway
        .from("likes")
        .select("*")
        .eq("user_id", viewer.id)
        .in_list("rant_id", rant_ids)
        .authorized(&viewer.access_token)
        .fetch()
        .await?;
    Ok(rows.into_iter().map(|l| l.rant_id).collect())
}

pub fn view_of(row: RantRow, authors: &AuthorCache, liked: &HashSet<Uuid>) -> RantView {
    let user = authors.author(row.author_id);
    RantView {
        id: row.id,
        content: row.content,
        created_at: row.created_at,
        user,
        likes_count: row.likes_count,
        comments_count: row.comments_count,
        user_has_liked: liked.contains(&row.id),
    }
}

pub struct PageLoad {
    pub rants: Vec<RantView>,
    pub has_more: bool,
}

/// One-shot fetch of a feed window.
///
/// Fetches the rows `[(page-1)*page_size, page*page_size - 1]` of `rants`
/// newest-first, resolves the page's distinct authors in one batched
/// lookup, merges the viewer's like flags, and reports whether a further
/// page may exist (a short page means end-of-list).
pub async fn load_page(
    gateway: &GatewayClient,
    viewer: Option<&AuthUser>,
    page: u64,
    page_size: u64,
) -> Result<PageLoad, GatewayError> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let from = (page - 1) * page_size;
    let to = page * page_size - 1;

    let rows: Vec<RantRow> = gateway
        .from("rants")
        .select("*")
        .order("created_at", Order::Descending)
        .range(from, to)
        .fetch()
        .await?;

    let has_more = rows.len() as u64 == page_size;

    let mut author_ids: Vec<Uuid> = rows.iter().map(|r| r.author_id).collect();
    author_ids.sort();
    author_ids.dedup();
    let authors = AuthorCache::load(gateway, &author_ids).await?;

    let rant_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let liked = match viewer {
        Some(v) => liked_ids(gateway, v, &rant_ids).await?,
        None => HashSet::new(),
    };

    let rants = rows
        .into_iter()
        .map(|row| view_of(row, &authors, &liked))
        .collect();

    Ok(PageLoad { rants, has_more })
}

/// Outcome of a `FeedLoader::load_next` call.
#[derive(Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Appended this many rows.
    Loaded(usize),
    /// Ignored: a previous load is still pending.
    Pending,
    /// Ignored: end-of-list was already reached.
    End,
}

struct FeedState {
    rants: Vec<RantView>,
    next_page: u64,
    has_more: bool,
}

/// The accumulating feed list.
///
/// Pages are appended in fetch order; a short page halts further loading.
/// `load_next` while a load is pending is ignored, as is any load after
/// end-of-list.
pub struct FeedLoader {
    gateway: GatewayClient,
    viewer: Option<AuthUser>,
    page_size: u64,
    pending: AtomicBool,
    state: Mutex<FeedState>,
}

impl FeedLoader {
    pub fn new(gateway: GatewayClient, viewer: Option<AuthUser>, page_size: u64) -> Self {
        Self {
            gateway,
            viewer,
            page_size: page_size.max(1),
            pending: AtomicBool::new(false),
            state: Mutex::new(FeedState {
                rants: Vec::new(),
                next_page: 1,
                has_more: true,
            }),
        }
    }

    pub async fn load_next(&self) -> Result<LoadOutcome, GatewayError> {
        if self.pending.swap(true, AtomicOrdering::SeqCst) {
            return Ok(LoadOutcome::Pending);
        }

        let (page, has_more) = {
            let state = self.state.lock().await;
            (state.next_page, state.has_more)
        };
        if !has_more {
            self.pending.store(false, AtomicOrdering::SeqCst);
            return Ok(LoadOutcome::End);
        }

        let result = load_page(&self.gateway, self.viewer.as_ref(), page, self.page_size).await;
        let outcome = match result {
            Ok(load) => {
                let mut state = self.state.lock().await;
                let appended = load.rants.len();
                state.rants.extend(load.rants);
                state.next_page += 1;
                state.has_more = load.has_more;
                Ok(LoadOutcome::Loaded(appended))
            }
            Err(e) => Err(e),
        };
        self.pending.store(false, AtomicOrdering::SeqCst);
        outcome
    }

    /// Optimistic head insert of a freshly composed rant.
    pub async fn prepend(&self, view: RantView) {
        self.state.lock().await.rants.insert(0, view);
    }

    /// Drop exactly this id after a confirmed delete.
    pub async fn remove(&self, id: Uuid) {
        self.state.lock().await.rants.retain(|r| r.id != id);
    }

    /// Patch one row after a confirmed like toggle.
    pub async fn set_liked(&self, id: Uuid, liked: bool, likes_count: i64) {
        let mut state = self.state.lock().await;
        if let Some(rant) = state.rants.iter_mut().find(|r| r.id == id) {
            rant.user_has_liked = liked;
            rant.likes_count = likes_count;
        }
    }

    pub async fn rants(&self) -> Vec<RantView> {
        self.state.lock().await.rants.clone()
    }

    pub async fn has_more(&self) -> bool {
        self.state.lock().await.has_more
    }
}
