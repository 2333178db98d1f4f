use axum::Router;
use chrono::Utc;
use uuid::Uuid;

use rantroom_shared::clients::gateway::GatewayClient;
use rantroom_shared::middleware::SessionVerifier;
use rantroom_shared::types::auth::AuthUser;

use crate::config::AppConfig;
use crate::models::{ProfileRow, RantRow};
use crate::AppState;

/// Serve `router` as a stand-in gateway on an ephemeral port.
pub async fn spawn_router(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn test_state(gateway_url: &str) -> AppState {
    AppState {
        config: AppConfig {
            port: 0,
            gateway_url: gateway_url.to_string(),
            gateway_anon_key: "anon".into(),
            gateway_jwt_secret: "test-secret".into(),
        },
        gateway: GatewayClient::new(gateway_url, "anon"),
        verifier: SessionVerifier::new("test-secret"),
    }
}

/// A state whose gateway address refuses connections; any handler that
/// reaches the gateway errors with a transport failure instead of the
/// expected validation code.
pub fn unreachable_state() -> AppState {
    test_state("http://127.0.0.1:9")
}

pub fn auth_user(id: Uuid) -> AuthUser {
    AuthUser {
        id,
        email: Some("someone@example.com".into()),
        access_token: "user-token".into(),
    }
}

pub fn profile_row(id: Uuid, name: &str) -> ProfileRow {
    ProfileRow {
        id,
        display_name: name.to_string(),
        avatar_url: None,
        created_at: Utc::now(),
    }
}

pub fn rant_row(id: Uuid, author_id: Uuid, content: &str) -> RantRow {
    RantRow {
        id,
        author_id,
        content: content.to_string(),
        created_at: Utc::now(),
        likes_count: 0,
        comments_count: 0,
    }
}
