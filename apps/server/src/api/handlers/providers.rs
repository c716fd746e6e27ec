//! Provider profile and directory handlers

use crate::{
    api::extract::ValidatedJson, auth::ProviderPrincipal, models::ProviderProfilePatch,
    state::AppState, Result,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Public provider profile.
///
/// GET /provider/profile/:provider_id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(provider_id): Path<i32>,
) -> Result<Response> {
    let profile = state.profile_service.provider(provider_id).await?;
    Ok((StatusCode::OK, Json(json!({ "provider": profile }))).into_response())
}

/// PATCH /provider/profile/:provider_id
pub async fn update_profile(
    State(state): State<AppState>,
    principal: ProviderPrincipal,
    Path(provider_id): Path<i32>,
    ValidatedJson(patch): ValidatedJson<ProviderProfilePatch>,
) -> Result<Response> {
    principal.ensure_self(provider_id)?;
    let profile = state
        .profile_service
        .update_provider(provider_id, &patch)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "provider": profile }))).into_response())
}

/// DELETE /provider/profile/:provider_id
pub async fn delete_profile(
    State(state): State<AppState>,
    principal: ProviderPrincipal,
    Path(provider_id): Path<i32>,
) -> Result<Response> {
    principal.ensure_self(provider_id)?;
    state.profile_service.delete_provider(provider_id).await?;
    Ok((StatusCode::OK, Json(json!({ "deleted": provider_id }))).into_response())
}

/// GET /providers
pub async fn list_providers(State(state): State<AppState>) -> Result<Response> {
    let providers = state.search_service.directory().await?;
    Ok((StatusCode::OK, Json(json!({ "providers": providers }))).into_response())
}
