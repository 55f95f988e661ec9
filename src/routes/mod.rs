use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::PartyStore,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{
        providers::{CatalogClient, GameSearch, TextOracle},
        IntersectionEngine, RecommendationService,
    },
};

pub mod games;
pub mod parties;
pub mod recommendations;

/// Shared handles for request handlers
#[derive(Clone)]
pub struct AppState {
    pub party_store: Arc<dyn PartyStore>,
    pub intersection: Arc<IntersectionEngine>,
    pub recommendations: Arc<RecommendationService>,
    pub game_search: Arc<dyn GameSearch>,
}

impl AppState {
    /// Wires both pipelines on top of the given collaborators
    pub fn new(
        party_store: Arc<dyn PartyStore>,
        catalog: Arc<dyn CatalogClient>,
        game_search: Arc<dyn GameSearch>,
        oracle: Arc<dyn TextOracle>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            intersection: Arc::new(IntersectionEngine::new(
                Arc::clone(&party_store),
                catalog,
                fetch_timeout,
            )),
            recommendations: Arc::new(RecommendationService::new(
                Arc::clone(&game_search),
                oracle,
            )),
            party_store,
            game_search,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/parties", post(parties::create_party))
        .route("/parties/:party_id", get(parties::get_party))
        .route("/parties/:party_id/members", post(parties::add_member))
        .route("/parties/:party_id/common-games", get(parties::common_games))
        .route("/recommendations/:title", get(recommendations::recommend))
        .route("/games/:slug", get(games::game_details))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
