// src/models/notification.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::auth::{Principal, PrincipalKind};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient_kind: PrincipalKind,
    pub recipient_id: Uuid,
    #[schema(example = "Complaint #1024 assigned")]
    pub title: String,
    pub message: String,
    #[schema(example = "complaint")]
    pub link_type: Option<String>,
    pub link_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Destinatário de uma notificação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Recipient {
    pub kind: PrincipalKind,
    pub id: Uuid,
}

impl Recipient {
    pub fn new(kind: PrincipalKind, id: Uuid) -> Self {
        Self { kind, id }
    }

    pub fn customer(id: Uuid) -> Self {
        Self::new(PrincipalKind::Customer, id)
    }

    pub fn tenant(id: Uuid) -> Self {
        Self::new(PrincipalKind::Tenant, id)
    }

    pub fn employee(id: Uuid) -> Self {
        Self::new(PrincipalKind::Employee, id)
    }
}

impl From<&Principal> for Recipient {
    fn from(p: &Principal) -> Self {
        Self::new(p.kind, p.id)
    }
}

/// Conteúdo de uma notificação, com o link opcional para a entidade.
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub link_type: Option<&'static str>,
    pub link_id: Option<Uuid>,
}

impl NotificationDraft {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            link_type: None,
            link_id: None,
        }
    }

    pub fn link(mut self, link_type: &'static str, link_id: Uuid) -> Self {
        self.link_type = Some(link_type);
        self.link_id = Some(link_id);
        self
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkedRead {
    pub updated: u64,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

// =============================================================================
//  AUDITORIA
// =============================================================================

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub actor_kind: PrincipalKind,
    pub actor_id: Uuid,
    #[schema(example = "complaint.assigned")]
    pub action: String,
    #[schema(example = "complaint")]
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub details: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AuditQuery {
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
