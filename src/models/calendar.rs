// src/models/calendar.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{complaint::ComplaintStatus, employee::LeaveStatus};

// Janela máxima aceita pelo calendário
pub const MAX_CALENDAR_SPAN_DAYS: i64 = 92;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    #[param(example = "2025-03-01")]
    pub from: NaiveDate,
    #[param(example = "2025-03-31")]
    pub to: NaiveDate,
    pub employee_id: Option<Uuid>,
}

/// Visita agendada (reclamação com scheduled_at).
#[derive(Debug, Clone, FromRow)]
pub struct VisitRow {
    pub complaint_id: Uuid,
    pub ticket_number: i64,
    pub title: String,
    pub status: ComplaintStatus,
    pub scheduled_at: DateTime<Utc>,
    pub unit_id: Uuid,
    pub unit_number: String,
    pub assigned_to: Option<Uuid>,
    pub assignee_name: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct LeaveRow {
    pub leave_id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: String,
    pub leave_type: String,
    pub status: LeaveStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CalendarEvent {
    #[serde(rename_all = "camelCase")]
    Visit {
        complaint_id: Uuid,
        ticket_number: i64,
        title: String,
        status: ComplaintStatus,
        start: DateTime<Utc>,
        unit_id: Uuid,
        unit_number: String,
        employee_id: Option<Uuid>,
        employee_name: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Leave {
        leave_id: Uuid,
        employee_id: Uuid,
        employee_name: String,
        leave_type: String,
        status: LeaveStatus,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
}

impl CalendarEvent {
    /// Chave de ordenação: início do evento em UTC.
    pub fn starts_at(&self) -> DateTime<Utc> {
        match self {
            CalendarEvent::Visit { start, .. } => *start,
            CalendarEvent::Leave { start_date, .. } => start_date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or_default(),
        }
    }
}

impl From<VisitRow> for CalendarEvent {
    fn from(row: VisitRow) -> Self {
        CalendarEvent::Visit {
            complaint_id: row.complaint_id,
            ticket_number: row.ticket_number,
            title: row.title,
            status: row.status,
            start: row.scheduled_at,
            unit_id: row.unit_id,
            unit_number: row.unit_number,
            employee_id: row.assigned_to,
            employee_name: row.assignee_name,
        }
    }
}

impl From<LeaveRow> for CalendarEvent {
    fn from(row: LeaveRow) -> Self {
        CalendarEvent::Leave {
            leave_id: row.leave_id,
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            leave_type: row.leave_type,
            status: row.status,
            start_date: row.start_date,
            end_date: row.end_date,
        }
    }
}
