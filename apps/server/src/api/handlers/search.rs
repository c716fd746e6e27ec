use crate::{
    api::extract::ValidatedJson,
    models::{AdvancedSearchRequest, SearchRequest},
    state::AppState,
    Result,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// POST /search
pub async fn search(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SearchRequest>,
) -> Result<Response> {
    let results = state.search_service.by_issue(&request.issue_name).await?;
    Ok((StatusCode::OK, Json(results)).into_response())
}

/// POST /search/advanced
pub async fn advanced_search(
    State(state): State<AppState>,
    ValidatedJson(filters): ValidatedJson<AdvancedSearchRequest>,
) -> Result<Response> {
    let results = state.search_service.advanced(&filters).await?;
    Ok((StatusCode::OK, Json(results)).into_response())
}
