// src/db/search_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::search::{ComplaintHit, PersonHit, UnitHit, VehicleHit},
};

// Busca global: ILIKE simples em cada tabela, cada uma com o mesmo limite
#[derive(Clone)]
pub struct SearchRepository {
    pool: PgPool,
}

impl SearchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn units(&self, pattern: &str, limit: i64) -> Result<Vec<UnitHit>, AppError> {
        let hits = sqlx::query_as::<_, UnitHit>(
            r#"
            SELECT id, unit_number, tower FROM units
            WHERE is_active = TRUE AND (unit_number ILIKE $1 OR tower ILIKE $1 OR unit_type ILIKE $1)
            ORDER BY unit_number
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(hits)
    }

    pub async fn customers(&self, pattern: &str, limit: i64) -> Result<Vec<PersonHit>, AppError> {
        let hits = sqlx::query_as::<_, PersonHit>(
            r#"
            SELECT c.id, c.full_name, c.email, c.phone, c.unit_id, u.unit_number
            FROM customers c
            JOIN units u ON u.id = c.unit_id
            WHERE c.is_active = TRUE
              AND (c.full_name ILIKE $1 OR c.email ILIKE $1 OR c.phone ILIKE $1 OR c.alternate_phone ILIKE $1)
            ORDER BY c.full_name
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(hits)
    }

    pub async fn tenants(&self, pattern: &str, limit: i64) -> Result<Vec<PersonHit>, AppError> {
        let hits = sqlx::query_as::<_, PersonHit>(
            r#"
            SELECT t.id, t.full_name, t.email, t.phone, t.unit_id, u.unit_number
            FROM tenants t
            JOIN units u ON u.id = t.unit_id
            WHERE t.is_active = TRUE
              AND (t.full_name ILIKE $1 OR t.email ILIKE $1 OR t.phone ILIKE $1)
            ORDER BY t.full_name
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(hits)
    }

    pub async fn complaints(&self, pattern: &str, limit: i64) -> Result<Vec<ComplaintHit>, AppError> {
        let hits = sqlx::query_as::<_, ComplaintHit>(
            r#"
            SELECT c.id, c.ticket_number, c.title, c.status, u.unit_number
            FROM complaints c
            JOIN units u ON u.id = c.unit_id
            WHERE c.title ILIKE $1 OR c.description ILIKE $1 OR c.ticket_number::text ILIKE $1
            ORDER BY c.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(hits)
    }

    pub async fn vehicles(&self, pattern: &str, limit: i64) -> Result<Vec<VehicleHit>, AppError> {
        let hits = sqlx::query_as::<_, VehicleHit>(
            r#"
            SELECT v.id, v.registration_number, u.unit_number
            FROM vehicles v
            JOIN units u ON u.id = v.unit_id
            WHERE v.is_active = TRUE AND (v.registration_number ILIKE $1 OR v.parking_slot ILIKE $1)
            ORDER BY v.registration_number
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(hits)
    }
}
