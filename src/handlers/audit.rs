// src/handlers/audit.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::AppError, pagination::PageResponse},
    config::AppState,
    middleware::rbac::{AdminOnly, RequireRole},
    models::notification::{AuditLog, AuditQuery},
};

// GET /api/audit-logs
#[utoipa::path(
    get,
    path = "/api/audit-logs",
    tag = "Audit",
    params(AuditQuery),
    responses(
        (status = 200, description = "Trilha de auditoria", body = PageResponse<AuditLog>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_audit_logs(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let logs = app_state.audit_service.list(&query).await?;
    Ok((StatusCode::OK, Json(logs)))
}
