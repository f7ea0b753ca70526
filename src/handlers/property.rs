// src/handlers/property.rs

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
    models::property::{
        CreateCustomerPayload, CreateTenantPayload, CreateUnitPayload, Customer, PropertyHistory,
        ResidentQuery, Tenant, Unit, UnitDetail, UnitQuery, UpdateCustomerPayload, UpdateTenantPayload,
        UpdateUnitPayload,
    },
};

// =============================================================================
//  ÁREA 1: UNIDADES
// =============================================================================

// GET /api/units
#[utoipa::path(
    get,
    path = "/api/units",
    tag = "Units",
    params(UnitQuery),
    responses(
        (status = 200, description = "Página de unidades", body = PageResponse<Unit>),
        (status = 403, description = "Apenas funcionários")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_units(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Query(query): Query<UnitQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.property_service.list_units(&query).await?;
    Ok((StatusCode::OK, Json(page)))
}

// POST /api/units
#[utoipa::path(
    post,
    path = "/api/units",
    tag = "Units",
    request_body = CreateUnitPayload,
    responses(
        (status = 201, description = "Unidade criada", body = Unit),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Número de unidade já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_unit(
    State(app_state): State<AppState>,
    manager: RequireRole<Managers>,
    Json(payload): Json<CreateUnitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let unit = app_state.property_service.create_unit(&manager.0, &payload).await?;

    Ok((StatusCode::CREATED, Json(unit)))
}

// GET /api/units/{id}
#[utoipa::path(
    get,
    path = "/api/units/{id}",
    tag = "Units",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses(
        (status = 200, description = "Unidade com proprietário e inquilino ativos", body = UnitDetail),
        (status = 403, description = "Sem acesso à unidade"),
        (status = 404, description = "Unidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_unit(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.property_service.get_unit(&principal, id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// PUT /api/units/{id}
#[utoipa::path(
    put,
    path = "/api/units/{id}",
    tag = "Units",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    request_body = UpdateUnitPayload,
    responses(
        (status = 200, description = "Unidade atualizada", body = Unit),
        (status = 404, description = "Unidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_unit(
    State(app_state): State<AppState>,
    manager: RequireRole<Managers>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUnitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let unit = app_state.property_service.update_unit(&manager.0, id, &payload).await?;

    Ok((StatusCode::OK, Json(unit)))
}

// DELETE /api/units/{id}
#[utoipa::path(
    delete,
    path = "/api/units/{id}",
    tag = "Units",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses(
        (status = 204, description = "Unidade desativada"),
        (status = 409, description = "Unidade ainda tem moradores ativos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_unit(
    State(app_state): State<AppState>,
    admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.property_service.delete_unit(&admin.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/units/{id}/history
#[utoipa::path(
    get,
    path = "/api/units/{id}/history",
    tag = "Units",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses(
        (status = 200, description = "Histórico do imóvel", body = Vec<PropertyHistory>),
        (status = 403, description = "Sem acesso ao histórico")
    ),
    security(("api_jwt" = []))
)]
pub async fn unit_history(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let history = app_state.property_service.unit_history(&principal, id).await?;
    Ok((StatusCode::OK, Json(history)))
}

// =============================================================================
//  ÁREA 2: PROPRIETÁRIOS
// =============================================================================

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    params(ResidentQuery),
    responses((status = 200, description = "Página de proprietários", body = PageResponse<Customer>)),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Query(query): Query<ResidentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.property_service.list_customers(&query).await?;
    Ok((StatusCode::OK, Json(page)))
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Proprietário cadastrado", body = Customer),
        (status = 404, description = "Unidade não encontrada"),
        (status = 409, description = "Unidade já tem proprietário ou e-mail em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    manager: RequireRole<Managers>,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state.property_service.create_customer(&manager.0, &payload).await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// GET /api/customers/{id}
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do proprietário")),
    responses(
        (status = 200, description = "Proprietário", body = Customer),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.property_service.get_customer(&principal, id).await?;
    Ok((StatusCode::OK, Json(customer)))
}

// PUT /api/customers/{id}
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do proprietário")),
    request_body = UpdateCustomerPayload,
    responses(
        (status = 200, description = "Proprietário atualizado", body = Customer),
        (status = 403, description = "Sem permissão para estes campos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state
        .property_service
        .update_customer(&principal, id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}

// DELETE /api/customers/{id}
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do proprietário")),
    responses((status = 204, description = "Proprietário desativado")),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    manager: RequireRole<Managers>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.property_service.delete_customer(&manager.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 3: INQUILINOS
// =============================================================================

// GET /api/tenants
#[utoipa::path(
    get,
    path = "/api/tenants",
    tag = "Tenants",
    params(ResidentQuery),
    responses(
        (status = 200, description = "Página de inquilinos", body = PageResponse<Tenant>),
        (status = 403, description = "Inquilinos não listam inquilinos")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_tenants(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(query): Query<ResidentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.property_service.list_tenants(&principal, &query).await?;
    Ok((StatusCode::OK, Json(page)))
}

// POST /api/tenants
#[utoipa::path(
    post,
    path = "/api/tenants",
    tag = "Tenants",
    request_body = CreateTenantPayload,
    responses(
        (status = 201, description = "Inquilino cadastrado", body = Tenant),
        (status = 400, description = "Datas do contrato inválidas"),
        (status = 409, description = "Unidade já tem inquilino ativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tenant(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(payload): Json<CreateTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tenant = app_state.property_service.create_tenant(&principal, &payload).await?;

    Ok((StatusCode::CREATED, Json(tenant)))
}

// GET /api/tenants/{id}
#[utoipa::path(
    get,
    path = "/api/tenants/{id}",
    tag = "Tenants",
    params(("id" = Uuid, Path, description = "ID do inquilino")),
    responses(
        (status = 200, description = "Inquilino", body = Tenant),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_tenant(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = app_state.property_service.get_tenant(&principal, id).await?;
    Ok((StatusCode::OK, Json(tenant)))
}

// PUT /api/tenants/{id}
#[utoipa::path(
    put,
    path = "/api/tenants/{id}",
    tag = "Tenants",
    params(("id" = Uuid, Path, description = "ID do inquilino")),
    request_body = UpdateTenantPayload,
    responses(
        (status = 200, description = "Inquilino atualizado", body = Tenant),
        (status = 403, description = "Sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_tenant(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tenant = app_state
        .property_service
        .update_tenant(&principal, id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(tenant)))
}

// DELETE /api/tenants/{id}
#[utoipa::path(
    delete,
    path = "/api/tenants/{id}",
    tag = "Tenants",
    params(("id" = Uuid, Path, description = "ID do inquilino")),
    responses((status = 204, description = "Inquilino desativado")),
    security(("api_jwt" = []))
)]
pub async fn delete_tenant(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.property_service.delete_tenant(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
