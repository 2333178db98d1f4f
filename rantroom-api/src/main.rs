use axum::extract::FromRef;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod test_support;

use config::AppConfig;
use rantroom_shared::clients::gateway::GatewayClient;
use rantroom_shared::middleware::SessionVerifier;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: AppConfig,
    pub gateway: GatewayClient,
    pub verifier: SessionVerifier,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rantroom_shared::middleware::init_tracing("rantroom-api");

    let config = AppConfig::load()?;
    let port = config.port;

    let gateway = GatewayClient::new(&config.gateway_url, &config.gateway_anon_key);
    let verifier = SessionVerifier::new(&config.gateway_jwt_secret);

    let state = AppState { config, gateway, verifier };

    let app = Router::new()
        .route("/", get(routes::feed::feed_page))
        .route("/health", get(routes::health::health_check))
        .route("/auth/signup", post(routes::auth::signup))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/session", get(routes::auth::session))
        .route("/create", get(routes::rants::composer_context).post(routes::rants::compose))
        .route("/rants/:id", delete(routes::rants::delete_rant))
        .route("/rants/:id/like", post(routes::rants::toggle_like))
        .route(
            "/rants/:id/comments",
            get(routes::comments::list_comments).post(routes::comments::add_comment),
        )
        .route("/comments/:id", delete(routes::comments::delete_comment))
        .route("/profile", get(routes::profile::own_profile))
        .route("/user/:user_id", get(routes::profile::user_profile))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "rantroom-api starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
