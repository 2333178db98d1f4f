use axum::Json;
use rantroom_shared::types::api::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("rantroom-api", env!("CARGO_PKG_VERSION")))
}
