// src/db/calendar_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::calendar::{LeaveRow, VisitRow},
};

#[derive(Clone)]
pub struct CalendarRepository {
    pool: PgPool,
}

impl CalendarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Visitas agendadas em [from, to), exceto reclamações fechadas.
    pub async fn visits(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        employee_id: Option<Uuid>,
        unit_id: Option<Uuid>,
    ) -> Result<Vec<VisitRow>, AppError> {
        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT c.id AS complaint_id, c.ticket_number, c.title, c.status, c.scheduled_at,
                   c.unit_id, u.unit_number, c.assigned_to, e.full_name AS assignee_name
            FROM complaints c
            JOIN units u ON u.id = c.unit_id
            LEFT JOIN employees e ON e.id = c.assigned_to
            WHERE c.scheduled_at IS NOT NULL
              AND c.scheduled_at >= $1 AND c.scheduled_at < $2
              AND c.status <> 'Closed'
              AND ($3::uuid IS NULL OR c.assigned_to = $3)
              AND ($4::uuid IS NULL OR c.unit_id = $4)
            ORDER BY c.scheduled_at
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(employee_id)
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Férias não rejeitadas que cruzam [from, to] (datas inclusivas).
    pub async fn leaves(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        employee_id: Option<Uuid>,
    ) -> Result<Vec<LeaveRow>, AppError> {
        let rows = sqlx::query_as::<_, LeaveRow>(
            r#"
            SELECT l.id AS leave_id, l.employee_id, e.full_name AS employee_name, l.leave_type,
                   l.status, l.start_date, l.end_date
            FROM employee_leaves l
            JOIN employees e ON e.id = l.employee_id
            WHERE l.status <> 'Rejected'
              AND l.start_date <= $2 AND l.end_date >= $1
              AND ($3::uuid IS NULL OR l.employee_id = $3)
            ORDER BY l.start_date
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
