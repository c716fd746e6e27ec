//! Signup, login and logout handlers

use crate::{
    api::extract::ValidatedJson,
    auth::ProviderPrincipal,
    models::{LoginRequest, PatientSignup, ProviderSignup, Role},
    state::AppState,
    Result,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Unified login for both roles.
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Response> {
    let auth = state.account_service.login(request, None).await?;
    Ok((StatusCode::OK, Json(auth)).into_response())
}

/// POST /civilians/signup
pub async fn patient_signup(
    State(state): State<AppState>,
    ValidatedJson(signup): ValidatedJson<PatientSignup>,
) -> Result<Response> {
    let auth = state.account_service.register_patient(signup).await?;
    Ok((StatusCode::CREATED, Json(auth)).into_response())
}

/// POST /civilians/login
pub async fn patient_login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Response> {
    let auth = state
        .account_service
        .login(request, Some(Role::Patient))
        .await?;
    Ok((StatusCode::OK, Json(auth)).into_response())
}

/// POST /provider/signup
pub async fn provider_signup(
    State(state): State<AppState>,
    ValidatedJson(signup): ValidatedJson<ProviderSignup>,
) -> Result<Response> {
    let auth = state.account_service.register_provider(signup).await?;
    Ok((StatusCode::CREATED, Json(auth)).into_response())
}

/// POST /provider/login
pub async fn provider_login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Response> {
    let auth = state
        .account_service
        .login(request, Some(Role::Provider))
        .await?;
    Ok((StatusCode::OK, Json(auth)).into_response())
}

/// Tokens are stateless; the client discards its copy.
///
/// POST /provider/logout
pub async fn provider_logout(principal: ProviderPrincipal) -> Result<Response> {
    tracing::debug!(provider_id = principal.provider_id(), "Provider logged out");
    Ok((StatusCode::OK, Json(json!({ "message": "Logged out" }))).into_response())
}
