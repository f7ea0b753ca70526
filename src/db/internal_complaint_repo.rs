// src/db/internal_complaint_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::PageRequest},
    models::complaint::{ComplaintPriority, ComplaintStatus, InternalComplaint},
};

const INTERNAL_SELECT: &str = r#"
    SELECT ic.id, ic.ticket_number, ic.raised_by, r.full_name AS raised_by_name, ic.department,
           ic.title, ic.description, ic.priority, ic.status,
           ic.assigned_to, a.full_name AS assignee_name,
           ic.resolution_notes, ic.resolved_at, ic.closed_at, ic.created_at, ic.updated_at
    FROM internal_complaints ic
    JOIN employees r ON r.id = ic.raised_by
    LEFT JOIN employees a ON a.id = ic.assigned_to
"#;

#[derive(Clone)]
pub struct InternalComplaintRepository {
    pool: PgPool,
}

impl InternalComplaintRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        raised_by: Uuid,
        department: Option<&str>,
        title: &str,
        description: &str,
        priority: ComplaintPriority,
    ) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO internal_complaints (raised_by, department, title, description, priority)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(raised_by)
        .bind(department)
        .bind(title)
        .bind(description)
        .bind(priority)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<InternalComplaint>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE ic.id = $1", INTERNAL_SELECT);

        let complaint = sqlx::query_as::<_, InternalComplaint>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(complaint)
    }

    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<InternalComplaint>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE ic.id = $1 FOR UPDATE OF ic", INTERNAL_SELECT);

        let complaint = sqlx::query_as::<_, InternalComplaint>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(complaint)
    }

    /// `involving`: quando presente, restringe a quem abriu ou a quem está atribuído.
    pub async fn list(
        &self,
        status: Option<ComplaintStatus>,
        involving: Option<Uuid>,
        page: PageRequest,
    ) -> Result<(Vec<InternalComplaint>, i64), AppError> {
        let filter = r#"
            WHERE ($1::complaint_status IS NULL OR ic.status = $1)
              AND ($2::uuid IS NULL OR ic.raised_by = $2 OR ic.assigned_to = $2)
        "#;

        let sql = format!(
            "{} {} ORDER BY ic.created_at DESC LIMIT $3 OFFSET $4",
            INTERNAL_SELECT, filter
        );

        let complaints = sqlx::query_as::<_, InternalComplaint>(&sql)
            .bind(status)
            .bind(involving)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM internal_complaints ic {}", filter))
            .bind(status)
            .bind(involving)
            .fetch_one(&self.pool)
            .await?;

        Ok((complaints, total))
    }

    pub async fn assign<'e, E>(&self, executor: E, id: Uuid, employee_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE internal_complaints SET status = 'Assigned', assigned_to = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(employee_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Grava o novo status; os carimbos de data acompanham o destino.
    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: ComplaintStatus,
        resolution_notes: Option<&str>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE internal_complaints SET
                status = $2,
                resolution_notes = COALESCE($3, resolution_notes),
                resolved_at = CASE
                    WHEN $2 = 'Resolved'::complaint_status THEN NOW()
                    WHEN $2 = 'Open'::complaint_status THEN NULL
                    ELSE resolved_at END,
                closed_at = CASE WHEN $2 = 'Closed'::complaint_status THEN NOW() ELSE closed_at END,
                assigned_to = CASE WHEN $2 = 'Open'::complaint_status THEN NULL ELSE assigned_to END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(resolution_notes)
        .execute(executor)
        .await?;

        Ok(())
    }
}
