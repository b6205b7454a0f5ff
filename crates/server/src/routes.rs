//! HTTP surface: handlers, router and the cross-origin policy.

use axum::{
    Json, Router,
    extract::State,
    http::HeaderValue,
    routing::{get, post},
};
use catalog::SignRecord;
use serde_json::{Value, json};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ServerError;
use crate::orchestrator::{ResponseEnvelope, ZodiacRequest};
use crate::state::AppState;

/// Build the full router with tracing and CORS applied.
pub fn build_router(state: AppState) -> Result<Router, ServerError> {
    let cors = cors_layer(state.settings.origin_headers()?);

    Ok(Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/signs", get(signs_handler))
        .route(
            "/get-zodiac",
            post(get_zodiac_handler).options(preflight_handler),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

/// Only the listed origins are answered. Methods and headers are mirrored
/// because credentials rule out wildcards.
pub fn cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "The Cultural Zodiac oracle is listening" }))
}

pub async fn health_handler() -> &'static str {
    "Healthy"
}

pub async fn signs_handler(State(state): State<AppState>) -> Json<Vec<SignRecord>> {
    Json(state.orchestrator.catalog().signs().to_vec())
}

/// Plain `OPTIONS` requests that are not CORS preflights land here.
pub async fn preflight_handler() -> Json<Value> {
    Json(json!({ "message": "CORS preflight success" }))
}

pub async fn get_zodiac_handler(
    State(state): State<AppState>,
    Json(request): Json<ZodiacRequest>,
) -> Json<ResponseEnvelope> {
    info!(inputs = request.inputs.len(), "Received zodiac request");
    Json(state.orchestrator.get_zodiac(&request.inputs).await)
}
