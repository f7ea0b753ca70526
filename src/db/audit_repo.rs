// src/db/audit_repo.rs

use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::PageRequest},
    models::{auth::Principal, notification::AuditLog},
};

const AUDIT_COLUMNS: &str = "id, actor_kind, actor_id, action, entity_type, entity_id, details, created_at";

// Trilha de auditoria (append-only)
#[derive(Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn record<'e, E>(
        &self,
        executor: E,
        actor: &Principal,
        action: &str,
        entity_type: &str,
        entity_id: Option<Uuid>,
        details: Value,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (actor_kind, actor_id, action, entity_type, entity_id, details)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(actor.kind)
        .bind(actor.id)
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .bind(details)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn list(
        &self,
        entity_type: Option<&str>,
        entity_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<(Vec<AuditLog>, i64), AppError> {
        let filter = r#"
            WHERE ($1::text IS NULL OR entity_type = $1)
              AND ($2::uuid IS NULL OR entity_id = $2)
        "#;

        let sql = format!(
            "SELECT {} FROM audit_logs {} ORDER BY created_at DESC LIMIT $3 OFFSET $4",
            AUDIT_COLUMNS, filter
        );

        let logs = sqlx::query_as::<_, AuditLog>(&sql)
            .bind(entity_type)
            .bind(entity_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM audit_logs {}", filter))
            .bind(entity_type)
            .bind(entity_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((logs, total))
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<AuditLog>, AppError> {
        let sql = format!("SELECT {} FROM audit_logs ORDER BY created_at DESC LIMIT $1", AUDIT_COLUMNS);

        let logs = sqlx::query_as::<_, AuditLog>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(logs)
    }
}
