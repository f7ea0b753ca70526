// src/models/dashboard.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    #[schema(example = "Open")]
    pub label: String,
    #[schema(example = 12)]
    pub count: i64,
}

/// Visão da administração / funcionários.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffDashboard {
    pub units_by_particulars: Vec<StatusCount>,
    pub active_customers: i64,
    pub active_tenants: i64,
    pub active_employees: i64,
    pub complaints_by_status: Vec<StatusCount>,
    pub complaints_by_priority: Vec<StatusCount>,
    pub pending_leaves: i64,
    pub pending_kyc_documents: i64,
    pub open_internal_complaints: i64,
    /// Só preenchido para funcionários sem perfil administrativo
    pub my_open_assignments: Option<i64>,
}

/// Visão do morador (proprietário ou inquilino).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResidentDashboard {
    pub complaints_by_status: Vec<StatusCount>,
    pub total_complaints: i64,
    pub unread_notifications: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum DashboardStats {
    Staff(StaffDashboard),
    Resident(ResidentDashboard),
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RecentActivityQuery {
    pub limit: Option<i64>,
}
