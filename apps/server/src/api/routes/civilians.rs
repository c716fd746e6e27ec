use crate::api::handlers::{auth, contacts, favorites, patients};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

/// Routes nested under `/civilians`.
pub fn civilian_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::patient_signup))
        .route("/login", post(auth::patient_login))
        .route(
            "/profile/:patient_id",
            get(patients::get_profile)
                .patch(patients::update_profile)
                .delete(patients::delete_profile),
        )
        .route(
            "/favorites",
            get(favorites::list_favorites).post(favorites::add_favorite),
        )
        .route("/favorites/:favorite_id", delete(favorites::remove_favorite))
        .route(
            "/contacts",
            get(contacts::list_sent).post(contacts::send_contact),
        )
        .route("/contacts/:contact_id", get(contacts::get_sent))
}
