//! Contact request handlers for both sides of the conversation

use crate::{
    api::extract::ValidatedJson,
    auth::{PatientPrincipal, ProviderPrincipal},
    models::{ContactPatch, NewContact},
    state::AppState,
    Result,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// POST /civilians/contacts
pub async fn send_contact(
    State(state): State<AppState>,
    principal: PatientPrincipal,
    ValidatedJson(request): ValidatedJson<NewContact>,
) -> Result<Response> {
    let contact = state
        .contact_service
        .send(principal.patient_id(), request)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "contact": contact }))).into_response())
}

/// GET /civilians/contacts
pub async fn list_sent(
    State(state): State<AppState>,
    principal: PatientPrincipal,
) -> Result<Response> {
    let contacts = state
        .contact_service
        .sent_by(principal.patient_id())
        .await?;
    Ok((StatusCode::OK, Json(json!({ "contacts": contacts }))).into_response())
}

/// GET /civilians/contacts/:contact_id
pub async fn get_sent(
    State(state): State<AppState>,
    principal: PatientPrincipal,
    Path(contact_id): Path<i32>,
) -> Result<Response> {
    let contact = state
        .contact_service
        .get_for_patient(principal.patient_id(), contact_id)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "contact": contact }))).into_response())
}

/// GET /provider/contacts
pub async fn inbox(
    State(state): State<AppState>,
    principal: ProviderPrincipal,
) -> Result<Response> {
    let inbox = state
        .contact_service
        .inbox(principal.provider_id())
        .await?;
    Ok((StatusCode::OK, Json(inbox)).into_response())
}

/// GET /provider/contacts/stats
pub async fn inbox_stats(
    State(state): State<AppState>,
    principal: ProviderPrincipal,
) -> Result<Response> {
    let stats = state
        .contact_service
        .stats(principal.provider_id())
        .await?;
    Ok((StatusCode::OK, Json(json!({ "stats": stats }))).into_response())
}

/// GET /provider/contacts/:contact_id
pub async fn get_received(
    State(state): State<AppState>,
    principal: ProviderPrincipal,
    Path(contact_id): Path<i32>,
) -> Result<Response> {
    let contact = state
        .contact_service
        .get_for_provider(principal.provider_id(), contact_id)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "contact": contact }))).into_response())
}

/// PATCH /provider/contacts/:contact_id
pub async fn update_received(
    State(state): State<AppState>,
    principal: ProviderPrincipal,
    Path(contact_id): Path<i32>,
    ValidatedJson(patch): ValidatedJson<ContactPatch>,
) -> Result<Response> {
    let contact = state
        .contact_service
        .respond(principal.provider_id(), contact_id, &patch)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "contact": contact }))).into_response())
}

/// DELETE /provider/contacts/:contact_id
pub async fn delete_received(
    State(state): State<AppState>,
    principal: ProviderPrincipal,
    Path(contact_id): Path<i32>,
) -> Result<Response> {
    state
        .contact_service
        .delete(principal.provider_id(), contact_id)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "deleted": contact_id }))).into_response())
}
