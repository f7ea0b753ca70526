// src/db/notification_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::PageRequest},
    models::{
        auth::PrincipalKind,
        notification::{Notification, NotificationDraft, Recipient},
    },
};

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insere o mesmo aviso para vários destinatários num único INSERT (UNNEST).
    pub async fn insert_many<'e, E>(
        &self,
        executor: E,
        recipients: &[Recipient],
        draft: &NotificationDraft,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if recipients.is_empty() {
            return Ok(0);
        }

        let kinds: Vec<PrincipalKind> = recipients.iter().map(|r| r.kind).collect();
        let ids: Vec<Uuid> = recipients.iter().map(|r| r.id).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO notifications (recipient_kind, recipient_id, title, message, link_type, link_id)
            SELECT r.kind, r.id, $3, $4, $5, $6
            FROM UNNEST($1::principal_kind[], $2::uuid[]) AS r(kind, id)
            "#,
        )
        .bind(&kinds)
        .bind(&ids)
        .bind(&draft.title)
        .bind(&draft.message)
        .bind(draft.link_type)
        .bind(draft.link_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_for(
        &self,
        recipient: Recipient,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<(Vec<Notification>, i64), AppError> {
        let filter = r#"
            WHERE recipient_kind = $1 AND recipient_id = $2
              AND ($3 = FALSE OR is_read = FALSE)
        "#;

        let sql = format!(
            r#"
            SELECT id, recipient_kind, recipient_id, title, message, link_type, link_id, is_read, created_at
            FROM notifications {}
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
            filter
        );

        let notifications = sqlx::query_as::<_, Notification>(&sql)
            .bind(recipient.kind)
            .bind(recipient.id)
            .bind(unread_only)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM notifications {}", filter))
            .bind(recipient.kind)
            .bind(recipient.id)
            .bind(unread_only)
            .fetch_one(&self.pool)
            .await?;

        Ok((notifications, total))
    }

    pub async fn unread_count(&self, recipient: Recipient) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM notifications
            WHERE recipient_kind = $1 AND recipient_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(recipient.kind)
        .bind(recipient.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Marca como lida só se pertencer ao destinatário; devolve a linha atualizada.
    pub async fn mark_read(&self, recipient: Recipient, id: Uuid) -> Result<Option<Notification>, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications SET is_read = TRUE
            WHERE id = $1 AND recipient_kind = $2 AND recipient_id = $3
            RETURNING id, recipient_kind, recipient_id, title, message, link_type, link_id, is_read, created_at
            "#,
        )
        .bind(id)
        .bind(recipient.kind)
        .bind(recipient.id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn mark_all_read(&self, recipient: Recipient) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE notifications SET is_read = TRUE
            WHERE recipient_kind = $1 AND recipient_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(recipient.kind)
        .bind(recipient.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
