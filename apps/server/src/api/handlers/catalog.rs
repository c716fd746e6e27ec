use crate::{state::AppState, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    pub issue: Option<String>,
}

/// GET /medical-issues
pub async fn list_medical_issues(State(state): State<AppState>) -> Result<Response> {
    let issues = state.catalog_service.medical_issues().await?;
    Ok((StatusCode::OK, Json(json!({ "medicalIssues": issues }))).into_response())
}

/// GET /emergency-resources
pub async fn list_emergency_resources(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> Result<Response> {
    let resources = state
        .catalog_service
        .emergency_resources(query.issue.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(json!({ "emergencyResources": resources }))).into_response())
}

/// GET /emergency-resources/:resource_id
pub async fn get_emergency_resource(
    State(state): State<AppState>,
    Path(resource_id): Path<i32>,
) -> Result<Response> {
    let resource = state.catalog_service.emergency_resource(resource_id).await?;
    Ok((StatusCode::OK, Json(json!({ "emergencyResource": resource }))).into_response())
}
