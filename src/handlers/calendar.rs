// src/handlers/calendar.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::calendar::{CalendarEvent, CalendarQuery},
};

// GET /api/calendar
#[utoipa::path(
    get,
    path = "/api/calendar",
    tag = "Calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Visitas agendadas e férias no período", body = Vec<CalendarEvent>),
        (status = 400, description = "Período inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(query): Query<CalendarQuery>,
) -> Result<impl IntoResponse, AppError> {
    let events = app_state.calendar_service.events(&principal, &query).await?;
    Ok((StatusCode::OK, Json(events)))
}
