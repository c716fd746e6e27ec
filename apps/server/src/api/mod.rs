//! HTTP surface: router assembly, handlers, extractors and middleware

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;

use crate::{auth::auth_middleware, metrics::track_http_metrics, state::AppState, Error};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    response::IntoResponse,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_request_body_size;
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .merge(routes::public_routes())
        .nest("/civilians", routes::civilian_routes())
        .nest("/provider", routes::provider_routes())
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .layer(from_fn(track_http_metrics))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn not_found() -> impl IntoResponse {
    Error::NotFound("Not found".to_string())
}
