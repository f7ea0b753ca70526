// src/handlers/internal_complaint.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::PageResponse},
    config::AppState,
    middleware::rbac::{Managers, RequireRole, Staff},
    models::complaint::{
        AssignComplaintPayload, CreateInternalComplaintPayload, InternalComplaint, InternalComplaintQuery,
        InternalStatusPayload,
    },
};

// POST /api/internal-complaints
#[utoipa::path(
    post,
    path = "/api/internal-complaints",
    tag = "Internal complaints",
    request_body = CreateInternalComplaintPayload,
    responses(
        (status = 201, description = "Reclamação interna aberta", body = InternalComplaint),
        (status = 403, description = "Apenas funcionários")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_internal_complaint(
    State(app_state): State<AppState>,
    staff: RequireRole<Staff>,
    Json(payload): Json<CreateInternalComplaintPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let complaint = app_state
        .internal_complaint_service
        .create(&staff.0, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(complaint)))
}

// GET /api/internal-complaints
#[utoipa::path(
    get,
    path = "/api/internal-complaints",
    tag = "Internal complaints",
    params(InternalComplaintQuery),
    responses((status = 200, description = "Reclamações internas", body = PageResponse<InternalComplaint>)),
    security(("api_jwt" = []))
)]
pub async fn list_internal_complaints(
    State(app_state): State<AppState>,
    staff: RequireRole<Staff>,
    Query(query): Query<InternalComplaintQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.internal_complaint_service.list(&staff.0, &query).await?;
    Ok((StatusCode::OK, Json(page)))
}

// GET /api/internal-complaints/{id}
#[utoipa::path(
    get,
    path = "/api/internal-complaints/{id}",
    tag = "Internal complaints",
    params(("id" = Uuid, Path, description = "ID da reclamação interna")),
    responses(
        (status = 200, description = "Reclamação interna", body = InternalComplaint),
        (status = 403, description = "Sem acesso"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_internal_complaint(
    State(app_state): State<AppState>,
    staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let complaint = app_state.internal_complaint_service.get(&staff.0, id).await?;
    Ok((StatusCode::OK, Json(complaint)))
}

// PUT /api/internal-complaints/{id}/assign
#[utoipa::path(
    put,
    path = "/api/internal-complaints/{id}/assign",
    tag = "Internal complaints",
    params(("id" = Uuid, Path, description = "ID da reclamação interna")),
    request_body = AssignComplaintPayload,
    responses(
        (status = 200, description = "Atribuída", body = InternalComplaint),
        (status = 409, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_internal_complaint(
    State(app_state): State<AppState>,
    manager: RequireRole<Managers>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignComplaintPayload>,
) -> Result<impl IntoResponse, AppError> {
    let complaint = app_state
        .internal_complaint_service
        .assign(&manager.0, id, payload.employee_id)
        .await?;
    Ok((StatusCode::OK, Json(complaint)))
}

// PUT /api/internal-complaints/{id}/status
#[utoipa::path(
    put,
    path = "/api/internal-complaints/{id}/status",
    tag = "Internal complaints",
    params(("id" = Uuid, Path, description = "ID da reclamação interna")),
    request_body = InternalStatusPayload,
    responses(
        (status = 200, description = "Status alterado", body = InternalComplaint),
        (status = 400, description = "Notas obrigatórias ou status inválido"),
        (status = 409, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_internal_status(
    State(app_state): State<AppState>,
    staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InternalStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let complaint = app_state
        .internal_complaint_service
        .set_status(&staff.0, id, &payload)
        .await?;
    Ok((StatusCode::OK, Json(complaint)))
}
