// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{Managers, RequireRole},
    },
    models::{
        dashboard::{DashboardStats, RecentActivityQuery},
        notification::AuditLog,
    },
};

// GET /api/dashboard/stats
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores conforme o perfil do usuário", body = DashboardStats),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.dashboard_service.stats(&principal).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/dashboard/recent-activity
#[utoipa::path(
    get,
    path = "/api/dashboard/recent-activity",
    tag = "Dashboard",
    params(RecentActivityQuery),
    responses(
        (status = 200, description = "Últimos eventos de auditoria", body = Vec<AuditLog>),
        (status = 403, description = "Apenas gerência")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_recent_activity(
    State(app_state): State<AppState>,
    _manager: RequireRole<Managers>,
    Query(query): Query<RecentActivityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let activity = app_state.dashboard_service.recent_activity(query.limit).await?;
    Ok((StatusCode::OK, Json(activity)))
}
