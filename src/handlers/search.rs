// src/handlers/search.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{RequireRole, Staff},
    models::search::{SearchQuery, SearchResults},
};

// GET /api/search
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "Search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Resultados agrupados por tipo", body = SearchResults),
        (status = 400, description = "Termo curto demais")
    ),
    security(("api_jwt" = []))
)]
pub async fn global_search(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let results = app_state.search_service.search(&query).await?;
    Ok((StatusCode::OK, Json(results)))
}
