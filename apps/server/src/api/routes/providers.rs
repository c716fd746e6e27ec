use crate::api::handlers::{auth, contacts, providers};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Routes nested under `/provider`.
pub fn provider_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::provider_signup))
        .route("/login", post(auth::provider_login))
        .route("/logout", post(auth::provider_logout))
        .route(
            "/profile/:provider_id",
            get(providers::get_profile)
                .patch(providers::update_profile)
                .delete(providers::delete_profile),
        )
        .route("/contacts", get(contacts::inbox))
        .route("/contacts/stats", get(contacts::inbox_stats))
        .route(
            "/contacts/:contact_id",
            get(contacts::get_received)
                .patch(contacts::update_received)
                .delete(contacts::delete_received),
        )
}
