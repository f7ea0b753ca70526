// src/handlers/vehicle.rs

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
    middleware::auth::AuthenticatedUser,
    models::vehicle::{CreateVehiclePayload, UpdateVehiclePayload, Vehicle, VehicleQuery},
};

// GET /api/vehicles
#[utoipa::path(
    get,
    path = "/api/vehicles",
    tag = "Vehicles",
    params(VehicleQuery),
    responses(
        (status = 200, description = "Veículos visíveis ao usuário", body = PageResponse<Vehicle>),
        (status = 403, description = "Conta sem unidade vinculada")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_vehicles(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(query): Query<VehicleQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.vehicle_service.list(&principal, &query).await?;
    Ok((StatusCode::OK, Json(page)))
}

// POST /api/vehicles
#[utoipa::path(
    post,
    path = "/api/vehicles",
    tag = "Vehicles",
    request_body = CreateVehiclePayload,
    responses(
        (status = 201, description = "Veículo cadastrado", body = Vehicle),
        (status = 400, description = "Dono ou unidade inválidos"),
        (status = 409, description = "Placa já cadastrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_vehicle(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(payload): Json<CreateVehiclePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let vehicle = app_state.vehicle_service.create(&principal, &payload).await?;

    Ok((StatusCode::CREATED, Json(vehicle)))
}

// GET /api/vehicles/{id}
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Veículo", body = Vehicle),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_vehicle(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.get(&principal, id).await?;
    Ok((StatusCode::OK, Json(vehicle)))
}

// PUT /api/vehicles/{id}
#[utoipa::path(
    put,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    request_body = UpdateVehiclePayload,
    responses(
        (status = 200, description = "Veículo atualizado", body = Vehicle),
        (status = 409, description = "Placa já cadastrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_vehicle(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVehiclePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let vehicle = app_state.vehicle_service.update(&principal, id, &payload).await?;

    Ok((StatusCode::OK, Json(vehicle)))
}

// DELETE /api/vehicles/{id}
#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 204, description = "Veículo removido"),
        (status = 403, description = "Sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_vehicle(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.vehicle_service.delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
