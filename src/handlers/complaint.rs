// src/handlers/complaint.rs

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
    middleware::{
        auth::AuthenticatedUser,
        rbac::{AdminOnly, Managers, RequireRole},
    },
    models::complaint::{
        AssignComplaintPayload, CategoryWithSubCategories, Complaint, ComplaintCategory, ComplaintComment,
        ComplaintQuery, ComplaintSubCategory, CreateCategoryPayload, CreateCommentPayload,
        CreateComplaintPayload, ResolveComplaintPayload, ScheduleComplaintPayload, UpdatePriorityPayload,
    },
};

// =============================================================================
//  ÁREA 1: CATEGORIAS
// =============================================================================

// GET /api/complaints/categories
#[utoipa::path(
    get,
    path = "/api/complaints/categories",
    tag = "Complaints",
    responses((status = 200, description = "Categorias com subcategorias", body = Vec<CategoryWithSubCategories>)),
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.complaint_service.list_categories().await?;
    Ok((StatusCode::OK, Json(categories)))
}

// POST /api/complaints/categories
#[utoipa::path(
    post,
    path = "/api/complaints/categories",
    tag = "Complaints",
    request_body = CreateCategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = ComplaintCategory),
        (status = 409, description = "Categoria já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    admin: RequireRole<AdminOnly>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state.complaint_service.create_category(&admin.0, &payload).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

// POST /api/complaints/categories/{id}/subcategories
#[utoipa::path(
    post,
    path = "/api/complaints/categories/{id}/subcategories",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    request_body = CreateCategoryPayload,
    responses(
        (status = 201, description = "Subcategoria criada", body = ComplaintSubCategory),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sub_category(
    State(app_state): State<AppState>,
    admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let sub = app_state
        .complaint_service
        .create_sub_category(&admin.0, id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(sub)))
}

// =============================================================================
//  ÁREA 2: RECLAMAÇÕES
// =============================================================================

// POST /api/complaints
#[utoipa::path(
    post,
    path = "/api/complaints",
    tag = "Complaints",
    request_body = CreateComplaintPayload,
    responses(
        (status = 201, description = "Reclamação aberta", body = Complaint),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Unidade de outra pessoa")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_complaint(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(payload): Json<CreateComplaintPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let complaint = app_state.complaint_service.create(&principal, &payload).await?;

    Ok((StatusCode::CREATED, Json(complaint)))
}

// GET /api/complaints
#[utoipa::path(
    get,
    path = "/api/complaints",
    tag = "Complaints",
    params(ComplaintQuery),
    responses((status = 200, description = "Reclamações visíveis ao usuário", body = PageResponse<Complaint>)),
    security(("api_jwt" = []))
)]
pub async fn list_complaints(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(query): Query<ComplaintQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.complaint_service.list(&principal, &query).await?;
    Ok((StatusCode::OK, Json(page)))
}

// GET /api/complaints/{id}
#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    responses(
        (status = 200, description = "Reclamação", body = Complaint),
        (status = 403, description = "Sem acesso"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_complaint(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let complaint = app_state.complaint_service.get(&principal, id).await?;
    Ok((StatusCode::OK, Json(complaint)))
}

// =============================================================================
//  ÁREA 3: CICLO DE VIDA
// =============================================================================

// PUT /api/complaints/{id}/assign
#[utoipa::path(
    put,
    path = "/api/complaints/{id}/assign",
    tag = "Complaint lifecycle",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    request_body = AssignComplaintPayload,
    responses(
        (status = 200, description = "Atribuída", body = Complaint),
        (status = 404, description = "Reclamação ou funcionário não encontrado"),
        (status = 409, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_complaint(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignComplaintPayload>,
) -> Result<impl IntoResponse, AppError> {
    let complaint = app_state
        .complaint_service
        .assign(&principal, id, payload.employee_id)
        .await?;
    Ok((StatusCode::OK, Json(complaint)))
}

// PUT /api/complaints/{id}/schedule
#[utoipa::path(
    put,
    path = "/api/complaints/{id}/schedule",
    tag = "Complaint lifecycle",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    request_body = ScheduleComplaintPayload,
    responses(
        (status = 200, description = "Visita agendada", body = Complaint),
        (status = 400, description = "Data no passado"),
        (status = 409, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn schedule_complaint(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScheduleComplaintPayload>,
) -> Result<impl IntoResponse, AppError> {
    let complaint = app_state
        .complaint_service
        .schedule(&principal, id, payload.scheduled_at)
        .await?;
    Ok((StatusCode::OK, Json(complaint)))
}

// PUT /api/complaints/{id}/start
#[utoipa::path(
    put,
    path = "/api/complaints/{id}/start",
    tag = "Complaint lifecycle",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    responses(
        (status = 200, description = "Em andamento", body = Complaint),
        (status = 409, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn start_complaint(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let complaint = app_state.complaint_service.start(&principal, id).await?;
    Ok((StatusCode::OK, Json(complaint)))
}

// PUT /api/complaints/{id}/resolve
#[utoipa::path(
    put,
    path = "/api/complaints/{id}/resolve",
    tag = "Complaint lifecycle",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    request_body = ResolveComplaintPayload,
    responses(
        (status = 200, description = "Resolvida", body = Complaint),
        (status = 400, description = "Notas obrigatórias"),
        (status = 409, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn resolve_complaint(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResolveComplaintPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let complaint = app_state
        .complaint_service
        .resolve(&principal, id, &payload.resolution_notes)
        .await?;
    Ok((StatusCode::OK, Json(complaint)))
}

// PUT /api/complaints/{id}/close
#[utoipa::path(
    put,
    path = "/api/complaints/{id}/close",
    tag = "Complaint lifecycle",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    responses(
        (status = 200, description = "Fechada", body = Complaint),
        (status = 409, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn close_complaint(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let complaint = app_state.complaint_service.close(&principal, id).await?;
    Ok((StatusCode::OK, Json(complaint)))
}

// PUT /api/complaints/{id}/reopen
#[utoipa::path(
    put,
    path = "/api/complaints/{id}/reopen",
    tag = "Complaint lifecycle",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    responses(
        (status = 200, description = "Reaberta", body = Complaint),
        (status = 409, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn reopen_complaint(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let complaint = app_state.complaint_service.reopen(&principal, id).await?;
    Ok((StatusCode::OK, Json(complaint)))
}

// PUT /api/complaints/{id}/priority
#[utoipa::path(
    put,
    path = "/api/complaints/{id}/priority",
    tag = "Complaint lifecycle",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    request_body = UpdatePriorityPayload,
    responses(
        (status = 200, description = "Prioridade alterada", body = Complaint),
        (status = 409, description = "Reclamação fechada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_priority(
    State(app_state): State<AppState>,
    manager: RequireRole<Managers>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePriorityPayload>,
) -> Result<impl IntoResponse, AppError> {
    let complaint = app_state
        .complaint_service
        .set_priority(&manager.0, id, payload.priority)
        .await?;
    Ok((StatusCode::OK, Json(complaint)))
}

// =============================================================================
//  ÁREA 4: COMENTÁRIOS
// =============================================================================

// GET /api/complaints/{id}/comments
#[utoipa::path(
    get,
    path = "/api/complaints/{id}/comments",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    responses((status = 200, description = "Comentários", body = Vec<ComplaintComment>)),
    security(("api_jwt" = []))
)]
pub async fn list_comments(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let comments = app_state.complaint_service.list_comments(&principal, id).await?;
    Ok((StatusCode::OK, Json(comments)))
}

// POST /api/complaints/{id}/comments
#[utoipa::path(
    post,
    path = "/api/complaints/{id}/comments",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    request_body = CreateCommentPayload,
    responses(
        (status = 201, description = "Comentário adicionado", body = ComplaintComment),
        (status = 403, description = "Sem acesso")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_comment(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateCommentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let comment = app_state.complaint_service.add_comment(&principal, id, &payload).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
