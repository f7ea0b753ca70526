// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{PrincipalKind, PrincipalRow},
};

// Cada tipo de principal mora na sua tabela; as colunas são alinhadas no SELECT.
fn principal_select(kind: PrincipalKind) -> &'static str {
    match kind {
        PrincipalKind::Customer => {
            "SELECT id, full_name, email, password_hash, unit_id, NULL::employee_role AS role, is_active FROM customers"
        }
        PrincipalKind::Tenant => {
            "SELECT id, full_name, email, password_hash, unit_id, NULL::employee_role AS role, is_active FROM tenants"
        }
        PrincipalKind::Employee => {
            "SELECT id, full_name, email, password_hash, NULL::uuid AS unit_id, role, is_active FROM employees"
        }
    }
}

fn table_of(kind: PrincipalKind) -> &'static str {
    match kind {
        PrincipalKind::Customer => "customers",
        PrincipalKind::Tenant => "tenants",
        PrincipalKind::Employee => "employees",
    }
}

// O repositório de identidades: customers, tenants e employees
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um principal ativo pelo e-mail
    pub async fn find_by_email(
        &self,
        kind: PrincipalKind,
        email: &str,
    ) -> Result<Option<PrincipalRow>, AppError> {
        let sql = format!(
            "{} WHERE lower(email) = lower($1) AND is_active = TRUE",
            principal_select(kind)
        );

        let row = sqlx::query_as::<_, PrincipalRow>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    // Busca um principal ativo pelo ID (usado na validação do token)
    pub async fn find_by_id(
        &self,
        kind: PrincipalKind,
        id: Uuid,
    ) -> Result<Option<PrincipalRow>, AppError> {
        let sql = format!("{} WHERE id = $1 AND is_active = TRUE", principal_select(kind));

        let row = sqlx::query_as::<_, PrincipalRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn update_password<'e, E>(
        &self,
        executor: E,
        kind: PrincipalKind,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE {} SET password_hash = $1, updated_at = NOW() WHERE id = $2",
            table_of(kind)
        );

        sqlx::query(&sql)
            .bind(password_hash)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn has_active_admin(&self) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM employees WHERE role = 'admin' AND is_active = TRUE)",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
