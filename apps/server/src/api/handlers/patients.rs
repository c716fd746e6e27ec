//! Patient profile handlers

use crate::{
    api::extract::ValidatedJson, auth::PatientPrincipal, models::PatientProfilePatch,
    state::AppState, Result,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// GET /civilians/profile/:patient_id
pub async fn get_profile(
    State(state): State<AppState>,
    principal: PatientPrincipal,
    Path(patient_id): Path<i32>,
) -> Result<Response> {
    principal.ensure_self(patient_id)?;
    let profile = state.profile_service.patient(patient_id).await?;
    Ok((StatusCode::OK, Json(json!({ "patient": profile }))).into_response())
}

/// PATCH /civilians/profile/:patient_id
pub async fn update_profile(
    State(state): State<AppState>,
    principal: PatientPrincipal,
    Path(patient_id): Path<i32>,
    ValidatedJson(patch): ValidatedJson<PatientProfilePatch>,
) -> Result<Response> {
    principal.ensure_self(patient_id)?;
    let profile = state
        .profile_service
        .update_patient(patient_id, &patch)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "patient": profile }))).into_response())
}

/// DELETE /civilians/profile/:patient_id
pub async fn delete_profile(
    State(state): State<AppState>,
    principal: PatientPrincipal,
    Path(patient_id): Path<i32>,
) -> Result<Response> {
    principal.ensure_self(patient_id)?;
    state.profile_service.delete_patient(patient_id).await?;
    Ok((StatusCode::OK, Json(json!({ "deleted": patient_id }))).into_response())
}
