use crate::{
    api::extract::ValidatedJson, auth::PatientPrincipal, models::NewFavorite, state::AppState,
    Result,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// GET /civilians/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    principal: PatientPrincipal,
) -> Result<Response> {
    let favorites = state
        .favorite_service
        .list(principal.patient_id())
        .await?;
    Ok((StatusCode::OK, Json(json!({ "favorites": favorites }))).into_response())
}

/// POST /civilians/favorites
pub async fn add_favorite(
    State(state): State<AppState>,
    principal: PatientPrincipal,
    ValidatedJson(request): ValidatedJson<NewFavorite>,
) -> Result<Response> {
    let favorite = state
        .favorite_service
        .add(principal.patient_id(), request.provider_id)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "favorite": favorite }))).into_response())
}

/// DELETE /civilians/favorites/:favorite_id
pub async fn remove_favorite(
    State(state): State<AppState>,
    principal: PatientPrincipal,
    Path(favorite_id): Path<i32>,
) -> Result<Response> {
    state
        .favorite_service
        .remove(principal.patient_id(), favorite_id)
        .await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Provider removed from favorites" })),
    )
        .into_response())
}
