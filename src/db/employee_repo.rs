// src/db/employee_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError, pagination::PageRequest},
    models::{
        auth::EmployeeRole,
        employee::{Employee, EmployeeLeave, LeaveStatus, UpdateEmployeePayload},
    },
};

const EMPLOYEE_COLUMNS: &str =
    "id, full_name, email, phone, role, department, designation, is_active, created_at, updated_at";

const LEAVE_SELECT: &str = r#"
    SELECT l.id, l.employee_id, e.full_name AS employee_name, l.leave_type, l.start_date, l.end_date,
           l.reason, l.status, l.reviewed_by, l.reviewed_at, l.review_remarks, l.created_at, l.updated_at
    FROM employee_leaves l
    JOIN employees e ON e.id = l.employee_id
"#;

/// Dados já normalizados para inserir um funcionário.
pub struct NewEmployee<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub role: EmployeeRole,
    pub department: Option<&'a str>,
    pub designation: Option<&'a str>,
    pub password_hash: &'a str,
}

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, new: NewEmployee<'_>) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO employees (full_name, email, phone, role, department, designation, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        );

        sqlx::query_as::<_, Employee>(&sql)
            .bind(new.full_name)
            .bind(new.email)
            .bind(new.phone)
            .bind(new.role)
            .bind(new.department)
            .bind(new.designation)
            .bind(new.password_hash)
            .fetch_one(executor)
            .await
            .map_err(|e| map_unique_violation(e, "An employee with this email already exists."))
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM employees WHERE id = $1 AND is_active = TRUE", EMPLOYEE_COLUMNS);

        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(employee)
    }

    pub async fn list(
        &self,
        role: Option<EmployeeRole>,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Employee>, i64), AppError> {
        let filter = r#"
            WHERE is_active = TRUE
              AND ($1::employee_role IS NULL OR role = $1)
              AND ($2::text IS NULL OR full_name ILIKE $2 OR email ILIKE $2
                   OR department ILIKE $2 OR designation ILIKE $2)
        "#;

        let sql = format!(
            "SELECT {} FROM employees {} ORDER BY full_name ASC LIMIT $3 OFFSET $4",
            EMPLOYEE_COLUMNS, filter
        );

        let employees = sqlx::query_as::<_, Employee>(&sql)
            .bind(role)
            .bind(search)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM employees {}", filter))
            .bind(role)
            .bind(search)
            .fetch_one(&self.pool)
            .await?;

        Ok((employees, total))
    }

    /// Funcionários com perfil de gestão (admin e sub_admin); destinatários de avisos.
    pub async fn list_manager_ids<'e, E>(&self, executor: E) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids = sqlx::query_scalar(
            "SELECT id FROM employees WHERE role IN ('admin', 'sub_admin') AND is_active = TRUE",
        )
        .fetch_all(executor)
        .await?;

        Ok(ids)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateEmployeePayload,
        email: Option<&str>,
    ) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE employees SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                role = COALESCE($5, role),
                department = COALESCE($6, department),
                designation = COALESCE($7, designation),
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        );

        sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .bind(payload.full_name.as_deref().map(str::trim))
            .bind(email)
            .bind(payload.phone.as_deref())
            .bind(payload.role)
            .bind(payload.department.as_deref())
            .bind(payload.designation.as_deref())
            .fetch_one(executor)
            .await
            .map_err(|e| map_unique_violation(e, "An employee with this email already exists."))
    }

    pub async fn deactivate<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE employees SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    // =========================================================================
    //  FÉRIAS
    // =========================================================================

    /// Existe outro pedido pendente ou aprovado que cruza o intervalo?
    pub async fn has_overlapping_leave<'e, E>(
        &self,
        executor: E,
        employee_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM employee_leaves
                WHERE employee_id = $1
                  AND status IN ('Pending', 'Approved')
                  AND start_date <= $3
                  AND end_date >= $2
            )
            "#,
        )
        .bind(employee_id)
        .bind(start)
        .bind(end)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    pub async fn create_leave<'e, E>(
        &self,
        executor: E,
        employee_id: Uuid,
        leave_type: &str,
        start: NaiveDate,
        end: NaiveDate,
        reason: Option<&str>,
    ) -> Result<EmployeeLeave, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let leave = sqlx::query_as::<_, EmployeeLeave>(
            r#"
            INSERT INTO employee_leaves (employee_id, leave_type, start_date, end_date, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, employee_id, leave_type, start_date, end_date, reason, status,
                      reviewed_by, reviewed_at, review_remarks, created_at, updated_at
            "#,
        )
        .bind(employee_id)
        .bind(leave_type)
        .bind(start)
        .bind(end)
        .bind(reason)
        .fetch_one(executor)
        .await?;

        Ok(leave)
    }

    pub async fn find_leave<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<EmployeeLeave>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE l.id = $1", LEAVE_SELECT);

        let leave = sqlx::query_as::<_, EmployeeLeave>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(leave)
    }

    pub async fn list_leaves(
        &self,
        employee_id: Option<Uuid>,
        status: Option<LeaveStatus>,
        page: PageRequest,
    ) -> Result<(Vec<EmployeeLeave>, i64), AppError> {
        let filter = r#"
            WHERE ($1::uuid IS NULL OR l.employee_id = $1)
              AND ($2::leave_status IS NULL OR l.status = $2)
        "#;

        let sql = format!(
            "{} {} ORDER BY l.start_date DESC, l.created_at DESC LIMIT $3 OFFSET $4",
            LEAVE_SELECT, filter
        );

        let leaves = sqlx::query_as::<_, EmployeeLeave>(&sql)
            .bind(employee_id)
            .bind(status)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM employee_leaves l {}", filter))
            .bind(employee_id)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok((leaves, total))
    }

    pub async fn review_leave<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: LeaveStatus,
        reviewer: Option<Uuid>,
        remarks: Option<&str>,
    ) -> Result<EmployeeLeave, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let leave = sqlx::query_as::<_, EmployeeLeave>(
            r#"
            UPDATE employee_leaves SET
                status = $2,
                reviewed_by = $3,
                reviewed_at = NOW(),
                review_remarks = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, employee_id, leave_type, start_date, end_date, reason, status,
                      reviewed_by, reviewed_at, review_remarks, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(reviewer)
        .bind(remarks)
        .fetch_one(executor)
        .await?;

        Ok(leave)
    }
}
