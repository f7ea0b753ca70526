// src/models/complaint.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::PrincipalKind;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "complaint_status")]
pub enum ComplaintStatus {
    Open,
    Assigned,
    Scheduled,
    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 6] = [
        ComplaintStatus::Open,
        ComplaintStatus::Assigned,
        ComplaintStatus::Scheduled,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Open => "Open",
            ComplaintStatus::Assigned => "Assigned",
            ComplaintStatus::Scheduled => "Scheduled",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Resolved => "Resolved",
            ComplaintStatus::Closed => "Closed",
        }
    }

    /// Aplica a ação; `None` quando a transição não existe.
    pub fn apply(self, action: ComplaintAction) -> Option<ComplaintStatus> {
        if action.allowed_from().contains(&self) {
            Some(action.target())
        } else {
            None
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == ComplaintStatus::Closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "complaint_priority")]
pub enum ComplaintPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl ComplaintPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintPriority::Low => "Low",
            ComplaintPriority::Normal => "Normal",
            ComplaintPriority::High => "High",
            ComplaintPriority::Urgent => "Urgent",
        }
    }
}

/// Ações do ciclo de vida:
/// Open → Assigned → Scheduled → In Progress → Resolved → Closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplaintAction {
    Assign,
    Schedule,
    Start,
    Resolve,
    Close,
    Reopen,
}

impl ComplaintAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintAction::Assign => "assign",
            ComplaintAction::Schedule => "schedule",
            ComplaintAction::Start => "start",
            ComplaintAction::Resolve => "resolve",
            ComplaintAction::Close => "close",
            ComplaintAction::Reopen => "reopen",
        }
    }

    pub fn target(&self) -> ComplaintStatus {
        match self {
            ComplaintAction::Assign => ComplaintStatus::Assigned,
            ComplaintAction::Schedule => ComplaintStatus::Scheduled,
            ComplaintAction::Start => ComplaintStatus::InProgress,
            ComplaintAction::Resolve => ComplaintStatus::Resolved,
            ComplaintAction::Close => ComplaintStatus::Closed,
            ComplaintAction::Reopen => ComplaintStatus::Open,
        }
    }

    pub fn allowed_from(&self) -> &'static [ComplaintStatus] {
        use ComplaintStatus::*;
        match self {
            ComplaintAction::Assign => &[Open, Assigned, Scheduled],
            ComplaintAction::Schedule => &[Assigned, Scheduled],
            ComplaintAction::Start => &[Assigned, Scheduled],
            ComplaintAction::Resolve => &[InProgress],
            ComplaintAction::Close => &[Resolved],
            ComplaintAction::Reopen => &[Resolved],
        }
    }

    /// Ação correspondente a um status de destino (usado pelo PUT .../status).
    pub fn for_target(status: ComplaintStatus) -> ComplaintAction {
        match status {
            ComplaintStatus::Open => ComplaintAction::Reopen,
            ComplaintStatus::Assigned => ComplaintAction::Assign,
            ComplaintStatus::Scheduled => ComplaintAction::Schedule,
            ComplaintStatus::InProgress => ComplaintAction::Start,
            ComplaintStatus::Resolved => ComplaintAction::Resolve,
            ComplaintStatus::Closed => ComplaintAction::Close,
        }
    }
}

// --- CATEGORIAS ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintCategory {
    pub id: Uuid,
    #[schema(example = "Plumbing")]
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintSubCategory {
    pub id: Uuid,
    pub category_id: Uuid,
    #[schema(example = "Leakage")]
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithSubCategories {
    #[serde(flatten)]
    pub category: ComplaintCategory,
    pub sub_categories: Vec<ComplaintSubCategory>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    #[validate(length(min = 2, max = 64, message = "Name must have between 2 and 64 characters."))]
    #[schema(example = "Painting")]
    pub name: String,
}

// --- RECLAMAÇÕES ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: Uuid,
    #[schema(example = 1024)]
    pub ticket_number: i64,
    pub unit_id: Uuid,
    #[schema(example = "A-1204")]
    pub unit_number: String,
    pub customer_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub raised_by_kind: PrincipalKind,
    pub raised_by_id: Uuid,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub sub_category_id: Option<Uuid>,
    pub sub_category_name: Option<String>,
    #[schema(example = "Kitchen sink leaking")]
    pub title: String,
    pub description: String,
    pub priority: ComplaintPriority,
    pub status: ComplaintStatus,
    pub assigned_to: Option<Uuid>,
    pub assignee_name: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintComment {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub author_kind: PrincipalKind,
    pub author_id: Uuid,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintPayload {
    /// Obrigatório para funcionários; moradores usam a própria unidade.
    pub unit_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub sub_category_id: Option<Uuid>,
    #[validate(length(min = 3, max = 200, message = "Title must have between 3 and 200 characters."))]
    #[schema(example = "Kitchen sink leaking")]
    pub title: String,
    #[validate(length(min = 5, max = 4000, message = "Description must have between 5 and 4000 characters."))]
    pub description: String,
    pub priority: Option<ComplaintPriority>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignComplaintPayload {
    pub employee_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleComplaintPayload {
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveComplaintPayload {
    #[validate(length(min = 3, max = 4000, message = "Resolution notes are required."))]
    pub resolution_notes: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePriorityPayload {
    pub priority: ComplaintPriority,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentPayload {
    #[validate(length(min = 1, max = 2000, message = "Comment must have between 1 and 2000 characters."))]
    pub body: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ComplaintQuery {
    pub status: Option<ComplaintStatus>,
    pub priority: Option<ComplaintPriority>,
    pub unit_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

// =============================================================================
//  RECLAMAÇÕES INTERNAS (STAFF)
// =============================================================================

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InternalComplaint {
    pub id: Uuid,
    pub ticket_number: i64,
    pub raised_by: Uuid,
    pub raised_by_name: String,
    pub department: Option<String>,
    pub title: String,
    pub description: String,
    pub priority: ComplaintPriority,
    pub status: ComplaintStatus,
    pub assigned_to: Option<Uuid>,
    pub assignee_name: Option<String>,
    pub resolution_notes: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInternalComplaintPayload {
    pub department: Option<String>,
    #[validate(length(min = 3, max = 200, message = "Title must have between 3 and 200 characters."))]
    pub title: String,
    #[validate(length(min = 5, max = 4000, message = "Description must have between 5 and 4000 characters."))]
    pub description: String,
    pub priority: Option<ComplaintPriority>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InternalStatusPayload {
    pub status: ComplaintStatus,
    #[validate(length(max = 4000, message = "Resolution notes are too long."))]
    pub resolution_notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct InternalComplaintQuery {
    pub status: Option<ComplaintStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComplaintAction::*;
    use ComplaintStatus::*;

    #[test]
    fn happy_path_walks_the_whole_lifecycle() {
        let mut status = Open;
        for action in [Assign, Schedule, Start, Resolve, Close] {
            status = status.apply(action).expect("valid transition");
        }
        assert_eq!(status, Closed);
        assert!(status.is_terminal());
    }

    const ACTIONS: [ComplaintAction; 6] = [Assign, Schedule, Start, Resolve, Close, Reopen];

    // Tabela escrita à mão: as únicas transições válidas do ciclo de vida
    fn expected(from: ComplaintStatus, action: ComplaintAction) -> Option<ComplaintStatus> {
        match (from, action) {
            (Open | Assigned | Scheduled, Assign) => Some(Assigned),
            (Assigned | Scheduled, Schedule) => Some(Scheduled),
            (Assigned | Scheduled, Start) => Some(InProgress),
            (InProgress, Resolve) => Some(Resolved),
            (Resolved, Close) => Some(Closed),
            (Resolved, Reopen) => Some(Open),
            _ => None,
        }
    }

    #[test]
    fn transition_table_is_exhaustive() {
        let mut valid = 0;
        for from in ComplaintStatus::ALL {
            for action in ACTIONS {
                let to = from.apply(action);
                assert_eq!(to, expected(from, action), "{:?} --{:?}-->", from, action);
                valid += usize::from(to.is_some());
            }
        }
        // 36 pares, 10 transições válidas
        assert_eq!(valid, 10);
    }

    #[test]
    fn closed_accepts_nothing() {
        for action in ACTIONS {
            assert_eq!(Closed.apply(action), None);
        }
    }

    #[test]
    fn target_status_maps_back_to_action() {
        for status in ComplaintStatus::ALL {
            assert_eq!(ComplaintAction::for_target(status).target(), status);
        }
    }

    #[test]
    fn in_progress_keeps_its_spelling() {
        assert_eq!(serde_json::to_string(&InProgress).unwrap(), "\"In Progress\"");
        let parsed: ComplaintStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(parsed, InProgress);
        assert_eq!(InProgress.as_str(), "In Progress");
    }
}
