// src/handlers/employee.rs

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
        rbac::{AdminOnly, Managers, RequireRole, Staff},
    },
    models::employee::{
        ApplyLeavePayload, CreateEmployeePayload, Employee, EmployeeLeave, EmployeeQuery, LeaveQuery,
        ReviewLeavePayload, UpdateEmployeePayload,
    },
};

// =============================================================================
//  ÁREA 1: FUNCIONÁRIOS
// =============================================================================

// GET /api/employees
#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Employees",
    params(EmployeeQuery),
    responses((status = 200, description = "Página de funcionários", body = PageResponse<Employee>)),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Query(query): Query<EmployeeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.employee_service.list(&query).await?;
    Ok((StatusCode::OK, Json(page)))
}

// POST /api/employees
#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Employees",
    request_body = CreateEmployeePayload,
    responses(
        (status = 201, description = "Funcionário criado", body = Employee),
        (status = 403, description = "Perfil não permitido para o ator"),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(payload): Json<CreateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let employee = app_state.employee_service.create(&principal, &payload).await?;

    Ok((StatusCode::CREATED, Json(employee)))
}

// GET /api/employees/{id}
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário", body = Employee),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let employee = app_state.employee_service.get(id).await?;
    Ok((StatusCode::OK, Json(employee)))
}

// PUT /api/employees/{id}
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    request_body = UpdateEmployeePayload,
    responses(
        (status = 200, description = "Funcionário atualizado", body = Employee),
        (status = 403, description = "Sem permissão para estes campos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let employee = app_state.employee_service.update(&staff.0, id, &payload).await?;

    Ok((StatusCode::OK, Json(employee)))
}

// DELETE /api/employees/{id}
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 204, description = "Funcionário desativado"),
        (status = 409, description = "Não é possível desativar a própria conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_employee(
    State(app_state): State<AppState>,
    admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.employee_service.delete(&admin.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: FÉRIAS
// =============================================================================

// POST /api/leaves
#[utoipa::path(
    post,
    path = "/api/leaves",
    tag = "Leaves",
    request_body = ApplyLeavePayload,
    responses(
        (status = 201, description = "Pedido registrado", body = EmployeeLeave),
        (status = 400, description = "Datas inválidas"),
        (status = 409, description = "Conflito com outro pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn apply_leave(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(payload): Json<ApplyLeavePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let leave = app_state.employee_service.apply_leave(&principal, &payload).await?;

    Ok((StatusCode::CREATED, Json(leave)))
}

// GET /api/leaves
#[utoipa::path(
    get,
    path = "/api/leaves",
    tag = "Leaves",
    params(LeaveQuery),
    responses((status = 200, description = "Página de pedidos de férias", body = PageResponse<EmployeeLeave>)),
    security(("api_jwt" = []))
)]
pub async fn list_leaves(
    State(app_state): State<AppState>,
    staff: RequireRole<Staff>,
    Query(query): Query<LeaveQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.employee_service.list_leaves(&staff.0, &query).await?;
    Ok((StatusCode::OK, Json(page)))
}

// PUT /api/leaves/{id}/review
#[utoipa::path(
    put,
    path = "/api/leaves/{id}/review",
    tag = "Leaves",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = ReviewLeavePayload,
    responses(
        (status = 200, description = "Pedido avaliado", body = EmployeeLeave),
        (status = 403, description = "Não é possível avaliar o próprio pedido"),
        (status = 409, description = "Pedido já avaliado")
    ),
    security(("api_jwt" = []))
)]
pub async fn review_leave(
    State(app_state): State<AppState>,
    manager: RequireRole<Managers>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewLeavePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let leave = app_state.employee_service.review_leave(&manager.0, id, &payload).await?;

    Ok((StatusCode::OK, Json(leave)))
}

// DELETE /api/leaves/{id}
#[utoipa::path(
    delete,
    path = "/api/leaves/{id}",
    tag = "Leaves",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido cancelado", body = EmployeeLeave),
        (status = 409, description = "Só pedidos pendentes podem ser cancelados")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_leave(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let leave = app_state.employee_service.cancel_leave(&principal, id).await?;
    Ok((StatusCode::OK, Json(leave)))
}
