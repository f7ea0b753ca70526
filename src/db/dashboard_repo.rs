// src/db/dashboard_repo.rs

use sqlx::{Acquire, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::PrincipalKind,
        dashboard::{StaffDashboard, StatusCount},
    },
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Resumo da administração
    pub async fn staff_summary<'e, E>(
        &self,
        executor: E,
        employee_id: Option<Uuid>,
    ) -> Result<StaffDashboard, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Snapshot consistente dos contadores
        let mut tx = executor.begin().await?;

        // A. Unidades por situação
        let units_by_particulars = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT particulars::text AS label, COUNT(*) AS count
            FROM units
            WHERE is_active = TRUE
            GROUP BY particulars
            ORDER BY particulars
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        // B. Moradores e equipe ativos
        let active_customers: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE is_active = TRUE")
                .fetch_one(&mut *tx)
                .await?;

        let active_tenants: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tenants WHERE is_active = TRUE")
            .fetch_one(&mut *tx)
            .await?;

        let active_employees: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE is_active = TRUE")
                .fetch_one(&mut *tx)
                .await?;

        // C. Reclamações
        let complaints_by_status = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status::text AS label, COUNT(*) AS count
            FROM complaints
            GROUP BY status
            ORDER BY status
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let complaints_by_priority = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT priority::text AS label, COUNT(*) AS count
            FROM complaints
            WHERE status <> 'Closed'
            GROUP BY priority
            ORDER BY priority
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        // D. Filas pendentes
        let pending_leaves: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employee_leaves WHERE status = 'Pending'")
                .fetch_one(&mut *tx)
                .await?;

        let pending_kyc_documents: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM kyc_documents WHERE status = 'Pending'")
                .fetch_one(&mut *tx)
                .await?;

        let open_internal_complaints: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM internal_complaints WHERE status NOT IN ('Resolved', 'Closed')",
        )
        .fetch_one(&mut *tx)
        .await?;

        // E. Atribuições do próprio funcionário
        let my_open_assignments = match employee_id {
            Some(id) => Some(
                sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COUNT(*) FROM complaints
                    WHERE assigned_to = $1 AND status NOT IN ('Resolved', 'Closed')
                    "#,
                )
                .bind(id)
                .fetch_one(&mut *tx)
                .await?,
            ),
            None => None,
        };

        tx.commit().await?;

        Ok(StaffDashboard {
            units_by_particulars,
            active_customers,
            active_tenants,
            active_employees,
            complaints_by_status,
            complaints_by_priority,
            pending_leaves,
            pending_kyc_documents,
            open_internal_complaints,
            my_open_assignments,
        })
    }

    // 2. Reclamações visíveis ao morador, por status
    pub async fn resident_complaints_by_status(
        &self,
        kind: PrincipalKind,
        principal_id: Uuid,
        unit_id: Option<Uuid>,
    ) -> Result<Vec<StatusCount>, AppError> {
        // Proprietário vê a unidade inteira; inquilino só o que abriu
        let counts = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status::text AS label, COUNT(*) AS count
            FROM complaints
            WHERE CASE
                WHEN $1 = 'customer'::principal_kind THEN unit_id = $3
                ELSE raised_by_kind = $1 AND raised_by_id = $2
            END
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(kind)
        .bind(principal_id)
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
