use crate::api::handlers::{auth, catalog, health, providers, search};
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Unauthenticated top-level routes.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics_handler))
        .route("/login", post(auth::login))
        .route("/providers", get(providers::list_providers))
        .route("/medical-issues", get(catalog::list_medical_issues))
        .route("/search", post(search::search))
        .route("/search/advanced", post(search::advanced_search))
        .route(
            "/emergency-resources",
            get(catalog::list_emergency_resources),
        )
        .route(
            "/emergency-resources/:resource_id",
            get(catalog::get_emergency_resource),
        )
}
