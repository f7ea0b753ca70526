// src/db/complaint_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError, pagination::PageRequest},
    models::{
        auth::PrincipalKind,
        complaint::{
            Complaint, ComplaintCategory, ComplaintComment, ComplaintPriority, ComplaintStatus,
            ComplaintSubCategory,
        },
    },
};

const COMPLAINT_SELECT: &str = r#"
    SELECT c.id, c.ticket_number, c.unit_id, u.unit_number, c.customer_id, c.tenant_id,
           c.raised_by_kind, c.raised_by_id,
           c.category_id, cat.name AS category_name,
           c.sub_category_id, sc.name AS sub_category_name,
           c.title, c.description, c.priority, c.status,
           c.assigned_to, e.full_name AS assignee_name,
           c.scheduled_at, c.resolution_notes, c.resolved_at, c.closed_at,
           c.created_at, c.updated_at
    FROM complaints c
    JOIN units u ON u.id = c.unit_id
    LEFT JOIN complaint_categories cat ON cat.id = c.category_id
    LEFT JOIN complaint_sub_categories sc ON sc.id = c.sub_category_id
    LEFT JOIN employees e ON e.id = c.assigned_to
"#;

/// Filtros da listagem. O serviço força os campos de visibilidade
/// conforme quem está perguntando.
#[derive(Debug, Default, Clone)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
    pub priority: Option<ComplaintPriority>,
    pub unit_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub raised_by: Option<(PrincipalKind, Uuid)>,
    pub search: Option<String>,
}

pub struct NewComplaint<'a> {
    pub unit_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub raised_by_kind: PrincipalKind,
    pub raised_by_id: Uuid,
    pub category_id: Option<Uuid>,
    pub sub_category_id: Option<Uuid>,
    pub title: &'a str,
    pub description: &'a str,
    pub priority: ComplaintPriority,
}

/// Escrita associada a cada passo do ciclo de vida.
#[derive(Debug, Clone, Copy)]
pub enum LifecycleUpdate<'a> {
    Assign(Uuid),
    Schedule(DateTime<Utc>),
    Start,
    Resolve(&'a str),
    Close,
    Reopen,
}

#[derive(Clone)]
pub struct ComplaintRepository {
    pool: PgPool,
}

impl ComplaintRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CATEGORIAS
    // =========================================================================

    pub async fn list_categories(&self) -> Result<Vec<ComplaintCategory>, AppError> {
        let categories = sqlx::query_as::<_, ComplaintCategory>(
            "SELECT id, name, is_active, created_at FROM complaint_categories WHERE is_active = TRUE ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn list_sub_categories(&self) -> Result<Vec<ComplaintSubCategory>, AppError> {
        let subs = sqlx::query_as::<_, ComplaintSubCategory>(
            r#"
            SELECT id, category_id, name, is_active, created_at
            FROM complaint_sub_categories
            WHERE is_active = TRUE
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(subs)
    }

    pub async fn find_category<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<ComplaintCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, ComplaintCategory>(
            "SELECT id, name, is_active, created_at FROM complaint_categories WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(category)
    }

    pub async fn find_sub_category<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<ComplaintSubCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sub = sqlx::query_as::<_, ComplaintSubCategory>(
            r#"
            SELECT id, category_id, name, is_active, created_at
            FROM complaint_sub_categories
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(sub)
    }

    pub async fn create_category<'e, E>(&self, executor: E, name: &str) -> Result<ComplaintCategory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ComplaintCategory>(
            "INSERT INTO complaint_categories (name) VALUES ($1) RETURNING id, name, is_active, created_at",
        )
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, format!("Category '{}' already exists.", name)))
    }

    pub async fn create_sub_category<'e, E>(
        &self,
        executor: E,
        category_id: Uuid,
        name: &str,
    ) -> Result<ComplaintSubCategory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ComplaintSubCategory>(
            r#"
            INSERT INTO complaint_sub_categories (category_id, name)
            VALUES ($1, $2)
            RETURNING id, category_id, name, is_active, created_at
            "#,
        )
        .bind(category_id)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, format!("Sub-category '{}' already exists in this category.", name)))
    }

    // =========================================================================
    //  RECLAMAÇÕES
    // =========================================================================

    pub async fn create<'e, E>(&self, executor: E, new: NewComplaint<'_>) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO complaints (
                unit_id, customer_id, tenant_id, raised_by_kind, raised_by_id,
                category_id, sub_category_id, title, description, priority
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(new.unit_id)
        .bind(new.customer_id)
        .bind(new.tenant_id)
        .bind(new.raised_by_kind)
        .bind(new.raised_by_id)
        .bind(new.category_id)
        .bind(new.sub_category_id)
        .bind(new.title)
        .bind(new.description)
        .bind(new.priority)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Complaint>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE c.id = $1", COMPLAINT_SELECT);

        let complaint = sqlx::query_as::<_, Complaint>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(complaint)
    }

    /// Mesmo que `find_by_id`, mas trava a linha até o fim da transação.
    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Complaint>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE c.id = $1 FOR UPDATE OF c", COMPLAINT_SELECT);

        let complaint = sqlx::query_as::<_, Complaint>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(complaint)
    }

    pub async fn list(
        &self,
        filter: &ComplaintFilter,
        page: PageRequest,
    ) -> Result<(Vec<Complaint>, i64), AppError> {
        let where_clause = r#"
            WHERE ($1::complaint_status IS NULL OR c.status = $1)
              AND ($2::complaint_priority IS NULL OR c.priority = $2)
              AND ($3::uuid IS NULL OR c.unit_id = $3)
              AND ($4::uuid IS NULL OR c.assigned_to = $4)
              AND ($5::principal_kind IS NULL OR (c.raised_by_kind = $5 AND c.raised_by_id = $6))
              AND ($7::text IS NULL OR c.title ILIKE $7 OR c.description ILIKE $7
                   OR u.unit_number ILIKE $7 OR c.ticket_number::text ILIKE $7)
        "#;

        let (raised_kind, raised_id) = match filter.raised_by {
            Some((kind, id)) => (Some(kind), Some(id)),
            None => (None, None),
        };

        let sql = format!(
            "{} {} ORDER BY c.created_at DESC LIMIT $8 OFFSET $9",
            COMPLAINT_SELECT, where_clause
        );

        let complaints = sqlx::query_as::<_, Complaint>(&sql)
            .bind(filter.status)
            .bind(filter.priority)
            .bind(filter.unit_id)
            .bind(filter.assigned_to)
            .bind(raised_kind)
            .bind(raised_id)
            .bind(filter.search.as_deref())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM complaints c JOIN units u ON u.id = c.unit_id {}",
            where_clause
        ))
        .bind(filter.status)
        .bind(filter.priority)
        .bind(filter.unit_id)
        .bind(filter.assigned_to)
        .bind(raised_kind)
        .bind(raised_id)
        .bind(filter.search.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok((complaints, total))
    }

    pub async fn apply_lifecycle<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        update: LifecycleUpdate<'_>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = match update {
            LifecycleUpdate::Assign(employee_id) => sqlx::query(
                "UPDATE complaints SET status = 'Assigned', assigned_to = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(employee_id),
            LifecycleUpdate::Schedule(at) => sqlx::query(
                "UPDATE complaints SET status = 'Scheduled', scheduled_at = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(at),
            LifecycleUpdate::Start => sqlx::query(
                "UPDATE complaints SET status = 'In Progress', updated_at = NOW() WHERE id = $1",
            )
            .bind(id),
            LifecycleUpdate::Resolve(notes) => sqlx::query(
                r#"
                UPDATE complaints
                SET status = 'Resolved', resolution_notes = $2, resolved_at = NOW(), updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(id)
            .bind(notes),
            LifecycleUpdate::Close => sqlx::query(
                "UPDATE complaints SET status = 'Closed', closed_at = NOW(), updated_at = NOW() WHERE id = $1",
            )
            .bind(id),
            // Reabrir devolve a fila: sem responsável e sem agenda
            LifecycleUpdate::Reopen => sqlx::query(
                r#"
                UPDATE complaints
                SET status = 'Open', assigned_to = NULL, scheduled_at = NULL,
                    resolved_at = NULL, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(id),
        };

        query.execute(executor).await?;

        Ok(())
    }

    pub async fn set_priority<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        priority: ComplaintPriority,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE complaints SET priority = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(priority)
            .execute(executor)
            .await?;

        Ok(())
    }

    // =========================================================================
    //  COMENTÁRIOS
    // =========================================================================

    pub async fn add_comment<'e, E>(
        &self,
        executor: E,
        complaint_id: Uuid,
        author_kind: PrincipalKind,
        author_id: Uuid,
        author_name: &str,
        body: &str,
    ) -> Result<ComplaintComment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let comment = sqlx::query_as::<_, ComplaintComment>(
            r#"
            INSERT INTO complaint_comments (complaint_id, author_kind, author_id, author_name, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, complaint_id, author_kind, author_id, author_name, body, created_at
            "#,
        )
        .bind(complaint_id)
        .bind(author_kind)
        .bind(author_id)
        .bind(author_name)
        .bind(body)
        .fetch_one(executor)
        .await?;

        Ok(comment)
    }

    pub async fn list_comments(&self, complaint_id: Uuid) -> Result<Vec<ComplaintComment>, AppError> {
        let comments = sqlx::query_as::<_, ComplaintComment>(
            r#"
            SELECT id, complaint_id, author_kind, author_id, author_name, body, created_at
            FROM complaint_comments
            WHERE complaint_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(complaint_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
