// src/models/search.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::complaint::ComplaintStatus;

pub const MIN_QUERY_LEN: usize = 2;
pub const DEFAULT_SEARCH_LIMIT: i64 = 10;
pub const MAX_SEARCH_LIMIT: i64 = 50;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    #[param(example = "A-12")]
    pub q: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitHit {
    pub id: Uuid,
    pub unit_number: String,
    pub tower: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonHit {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub unit_id: Uuid,
    pub unit_number: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintHit {
    pub id: Uuid,
    pub ticket_number: i64,
    pub title: String,
    pub status: ComplaintStatus,
    pub unit_number: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleHit {
    pub id: Uuid,
    pub registration_number: String,
    pub unit_number: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub units: Vec<UnitHit>,
    pub customers: Vec<PersonHit>,
    pub tenants: Vec<PersonHit>,
    pub complaints: Vec<ComplaintHit>,
    pub vehicles: Vec<VehicleHit>,
}
