// src/db/kyc_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::PageRequest},
    models::{
        auth::PrincipalKind,
        kyc::{KycDocStatus, KycDocument, KycFile},
    },
};

const KYC_COLUMNS: &str = r#"
    entity_type, entity_id, doc_type, file_name, content_type, size_bytes, status, remarks,
    uploaded_by, verified_by, verified_at, uploaded_at
"#;

pub struct NewKycDocument<'a> {
    pub entity_type: PrincipalKind,
    pub entity_id: Uuid,
    pub doc_type: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
    pub uploaded_by: Uuid,
}

#[derive(Clone)]
pub struct KycRepository {
    pool: PgPool,
}

impl KycRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert pela chave composta; um novo envio volta sempre para Pending.
    pub async fn upsert<'e, E>(&self, executor: E, doc: NewKycDocument<'_>) -> Result<KycDocument, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO kyc_documents (entity_type, entity_id, doc_type, file_name, content_type, data, size_bytes, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (entity_type, entity_id, doc_type) DO UPDATE SET
                file_name = EXCLUDED.file_name,
                content_type = EXCLUDED.content_type,
                data = EXCLUDED.data,
                size_bytes = EXCLUDED.size_bytes,
                uploaded_by = EXCLUDED.uploaded_by,
                status = 'Pending',
                remarks = NULL,
                verified_by = NULL,
                verified_at = NULL,
                uploaded_at = NOW()
            RETURNING {}
            "#,
            KYC_COLUMNS
        );

        let document = sqlx::query_as::<_, KycDocument>(&sql)
            .bind(doc.entity_type)
            .bind(doc.entity_id)
            .bind(doc.doc_type)
            .bind(doc.file_name)
            .bind(doc.content_type)
            .bind(doc.data)
            .bind(doc.data.len() as i64)
            .bind(doc.uploaded_by)
            .fetch_one(executor)
            .await?;

        Ok(document)
    }

    pub async fn list_for_entity(
        &self,
        entity_type: PrincipalKind,
        entity_id: Uuid,
    ) -> Result<Vec<KycDocument>, AppError> {
        let sql = format!(
            "SELECT {} FROM kyc_documents WHERE entity_type = $1 AND entity_id = $2 ORDER BY doc_type",
            KYC_COLUMNS
        );

        let docs = sqlx::query_as::<_, KycDocument>(&sql)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(docs)
    }

    pub async fn find<'e, E>(
        &self,
        executor: E,
        entity_type: PrincipalKind,
        entity_id: Uuid,
        doc_type: &str,
    ) -> Result<Option<KycDocument>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM kyc_documents WHERE entity_type = $1 AND entity_id = $2 AND doc_type = $3",
            KYC_COLUMNS
        );

        let doc = sqlx::query_as::<_, KycDocument>(&sql)
            .bind(entity_type)
            .bind(entity_id)
            .bind(doc_type)
            .fetch_optional(executor)
            .await?;

        Ok(doc)
    }

    pub async fn find_file(
        &self,
        entity_type: PrincipalKind,
        entity_id: Uuid,
        doc_type: &str,
    ) -> Result<Option<KycFile>, AppError> {
        let file = sqlx::query_as::<_, KycFile>(
            r#"
            SELECT file_name, content_type, data
            FROM kyc_documents
            WHERE entity_type = $1 AND entity_id = $2 AND doc_type = $3
            "#,
        )
        .bind(entity_type)
        .bind(entity_id)
        .bind(doc_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }

    pub async fn verify<'e, E>(
        &self,
        executor: E,
        entity_type: PrincipalKind,
        entity_id: Uuid,
        doc_type: &str,
        status: KycDocStatus,
        remarks: Option<&str>,
        verified_by: Uuid,
    ) -> Result<KycDocument, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE kyc_documents SET
                status = $4,
                remarks = $5,
                verified_by = $6,
                verified_at = NOW()
            WHERE entity_type = $1 AND entity_id = $2 AND doc_type = $3
            RETURNING {}
            "#,
            KYC_COLUMNS
        );

        let doc = sqlx::query_as::<_, KycDocument>(&sql)
            .bind(entity_type)
            .bind(entity_id)
            .bind(doc_type)
            .bind(status)
            .bind(remarks)
            .bind(verified_by)
            .fetch_one(executor)
            .await?;

        Ok(doc)
    }

    pub async fn delete<'e, E>(
        &self,
        executor: E,
        entity_type: PrincipalKind,
        entity_id: Uuid,
        doc_type: &str,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM kyc_documents WHERE entity_type = $1 AND entity_id = $2 AND doc_type = $3",
        )
        .bind(entity_type)
        .bind(entity_id)
        .bind(doc_type)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_pending(&self, page: PageRequest) -> Result<(Vec<KycDocument>, i64), AppError> {
        let sql = format!(
            r#"
            SELECT {} FROM kyc_documents
            WHERE status = 'Pending'
            ORDER BY uploaded_at ASC
            LIMIT $1 OFFSET $2
            "#,
            KYC_COLUMNS
        );

        let docs = sqlx::query_as::<_, KycDocument>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kyc_documents WHERE status = 'Pending'")
            .fetch_one(&self.pool)
            .await?;

        Ok((docs, total))
    }
}
