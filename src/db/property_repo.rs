// src/db/property_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError, pagination::PageRequest},
    models::property::{
        CreateCustomerPayload, CreateTenantPayload, CreateUnitPayload, Customer, PropertyHistory,
        Tenant, Unit, UnitParticulars, UpdateCustomerPayload, UpdateTenantPayload,
        UpdateUnitPayload,
    },
};

const UNIT_COLUMNS: &str = "id, unit_number, tower, floor, unit_type, area_sqft, particulars, is_active, created_at, updated_at";

const CUSTOMER_SELECT: &str = r#"
    SELECT c.id, c.unit_id, u.unit_number, c.full_name, c.email, c.phone, c.alternate_phone,
           c.is_active, c.created_at, c.updated_at
    FROM customers c
    JOIN units u ON u.id = c.unit_id
"#;

const TENANT_SELECT: &str = r#"
    SELECT t.id, t.unit_id, u.unit_number, t.customer_id, t.full_name, t.email, t.phone,
           t.lease_start, t.lease_end, t.is_active, t.created_at, t.updated_at
    FROM tenants t
    JOIN units u ON u.id = t.unit_id
"#;

// Unidades, proprietários, inquilinos e o histórico do imóvel
#[derive(Clone)]
pub struct PropertyRepository {
    pool: PgPool,
}

impl PropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  UNIDADES
    // =========================================================================

    pub async fn create_unit<'e, E>(
        &self,
        executor: E,
        payload: &CreateUnitPayload,
    ) -> Result<Unit, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO units (unit_number, tower, floor, unit_type, area_sqft, particulars)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'Vacant'::unit_particulars))
            RETURNING {}
            "#,
            UNIT_COLUMNS
        );

        sqlx::query_as::<_, Unit>(&sql)
            .bind(payload.unit_number.trim())
            .bind(payload.tower.as_deref())
            .bind(payload.floor)
            .bind(payload.unit_type.as_deref())
            .bind(payload.area_sqft)
            .bind(payload.particulars)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                map_unique_violation(e, format!("Unit '{}' already exists.", payload.unit_number.trim()))
            })
    }

    pub async fn find_unit<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Unit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM units WHERE id = $1 AND is_active = TRUE", UNIT_COLUMNS);

        let unit = sqlx::query_as::<_, Unit>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(unit)
    }

    pub async fn list_units(
        &self,
        search: Option<&str>,
        particulars: Option<UnitParticulars>,
        page: PageRequest,
    ) -> Result<(Vec<Unit>, i64), AppError> {
        let filter = r#"
            WHERE is_active = TRUE
              AND ($1::text IS NULL OR unit_number ILIKE $1 OR tower ILIKE $1 OR unit_type ILIKE $1)
              AND ($2::unit_particulars IS NULL OR particulars = $2)
        "#;

        let sql = format!(
            "SELECT {} FROM units {} ORDER BY unit_number ASC LIMIT $3 OFFSET $4",
            UNIT_COLUMNS, filter
        );

        let units = sqlx::query_as::<_, Unit>(&sql)
            .bind(search)
            .bind(particulars)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM units {}", filter))
            .bind(search)
            .bind(particulars)
            .fetch_one(&self.pool)
            .await?;

        Ok((units, total))
    }

    pub async fn update_unit<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateUnitPayload,
    ) -> Result<Unit, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE units SET
                tower = COALESCE($2, tower),
                floor = COALESCE($3, floor),
                unit_type = COALESCE($4, unit_type),
                area_sqft = COALESCE($5, area_sqft),
                particulars = COALESCE($6, particulars),
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING {}
            "#,
            UNIT_COLUMNS
        );

        let unit = sqlx::query_as::<_, Unit>(&sql)
            .bind(id)
            .bind(payload.tower.as_deref())
            .bind(payload.floor)
            .bind(payload.unit_type.as_deref())
            .bind(payload.area_sqft)
            .bind(payload.particulars)
            .fetch_one(executor)
            .await?;

        Ok(unit)
    }

    pub async fn deactivate_unit<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE units SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn unit_has_active_residents<'e, E>(&self, executor: E, unit_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM customers WHERE unit_id = $1 AND is_active = TRUE)
                OR EXISTS (SELECT 1 FROM tenants WHERE unit_id = $1 AND is_active = TRUE)
            "#,
        )
        .bind(unit_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    // =========================================================================
    //  HISTÓRICO DO IMÓVEL (append-only)
    // =========================================================================

    pub async fn add_history<'e, E>(
        &self,
        executor: E,
        unit_id: Uuid,
        event: &str,
        customer_id: Option<Uuid>,
        tenant_id: Option<Uuid>,
        details: Option<&str>,
        created_by: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO property_history (unit_id, event, customer_id, tenant_id, details, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(unit_id)
        .bind(event)
        .bind(customer_id)
        .bind(tenant_id)
        .bind(details)
        .bind(created_by)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn list_history(&self, unit_id: Uuid) -> Result<Vec<PropertyHistory>, AppError> {
        let history = sqlx::query_as::<_, PropertyHistory>(
            r#"
            SELECT id, unit_id, event, customer_id, tenant_id, details, created_by, created_at
            FROM property_history
            WHERE unit_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(history)
    }

    // =========================================================================
    //  PROPRIETÁRIOS
    // =========================================================================

    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        payload: &CreateCustomerPayload,
        email: &str,
        password_hash: &str,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (unit_id, full_name, email, phone, alternate_phone, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, unit_id, full_name, email, phone, alternate_phone, is_active, created_at, updated_at
            "#,
        )
        .bind(payload.unit_id)
        .bind(payload.full_name.trim())
        .bind(email)
        .bind(payload.phone.as_deref())
        .bind(payload.alternate_phone.as_deref())
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "A customer with this email already exists, or the unit already has an owner."))
    }

    pub async fn find_customer<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE c.id = $1 AND c.is_active = TRUE", CUSTOMER_SELECT);

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(customer)
    }

    pub async fn active_customer_for_unit<'e, E>(
        &self,
        executor: E,
        unit_id: Uuid,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE c.unit_id = $1 AND c.is_active = TRUE", CUSTOMER_SELECT);

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(unit_id)
            .fetch_optional(executor)
            .await?;

        Ok(customer)
    }

    pub async fn list_customers(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Customer>, i64), AppError> {
        let filter = r#"
            WHERE c.is_active = TRUE
              AND ($1::text IS NULL OR c.full_name ILIKE $1 OR c.email ILIKE $1
                   OR c.phone ILIKE $1 OR u.unit_number ILIKE $1)
        "#;

        let sql = format!("{} {} ORDER BY c.full_name ASC LIMIT $2 OFFSET $3", CUSTOMER_SELECT, filter);

        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(search)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM customers c JOIN units u ON u.id = c.unit_id {}",
            filter
        ))
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok((customers, total))
    }

    pub async fn update_customer<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateCustomerPayload,
        email: Option<&str>,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                alternate_phone = COALESCE($5, alternate_phone),
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING id, unit_id, full_name, email, phone, alternate_phone, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(payload.full_name.as_deref().map(str::trim))
        .bind(email)
        .bind(payload.phone.as_deref())
        .bind(payload.alternate_phone.as_deref())
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "A customer with this email already exists."))
    }

    pub async fn deactivate_customer<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE customers SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    // =========================================================================
    //  INQUILINOS
    // =========================================================================

    pub async fn create_tenant<'e, E>(
        &self,
        executor: E,
        payload: &CreateTenantPayload,
        customer_id: Option<Uuid>,
        email: &str,
        password_hash: &str,
    ) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (unit_id, customer_id, full_name, email, phone, lease_start, lease_end, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, unit_id, customer_id, full_name, email, phone, lease_start, lease_end,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(payload.unit_id)
        .bind(customer_id)
        .bind(payload.full_name.trim())
        .bind(email)
        .bind(payload.phone.as_deref())
        .bind(payload.lease_start)
        .bind(payload.lease_end)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "A tenant with this email already exists, or the unit already has a tenant."))
    }

    pub async fn find_tenant<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Tenant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE t.id = $1 AND t.is_active = TRUE", TENANT_SELECT);

        let tenant = sqlx::query_as::<_, Tenant>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(tenant)
    }

    pub async fn active_tenant_for_unit<'e, E>(
        &self,
        executor: E,
        unit_id: Uuid,
    ) -> Result<Option<Tenant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE t.unit_id = $1 AND t.is_active = TRUE", TENANT_SELECT);

        let tenant = sqlx::query_as::<_, Tenant>(&sql)
            .bind(unit_id)
            .fetch_optional(executor)
            .await?;

        Ok(tenant)
    }

    pub async fn list_tenants(
        &self,
        unit_id: Option<Uuid>,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Tenant>, i64), AppError> {
        let filter = r#"
            WHERE t.is_active = TRUE
              AND ($1::uuid IS NULL OR t.unit_id = $1)
              AND ($2::text IS NULL OR t.full_name ILIKE $2 OR t.email ILIKE $2
                   OR t.phone ILIKE $2 OR u.unit_number ILIKE $2)
        "#;

        let sql = format!("{} {} ORDER BY t.full_name ASC LIMIT $3 OFFSET $4", TENANT_SELECT, filter);

        let tenants = sqlx::query_as::<_, Tenant>(&sql)
            .bind(unit_id)
            .bind(search)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM tenants t JOIN units u ON u.id = t.unit_id {}",
            filter
        ))
        .bind(unit_id)
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok((tenants, total))
    }

    pub async fn update_tenant<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateTenantPayload,
        email: Option<&str>,
    ) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                lease_start = COALESCE($5, lease_start),
                lease_end = COALESCE($6, lease_end),
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING id, unit_id, customer_id, full_name, email, phone, lease_start, lease_end,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(payload.full_name.as_deref().map(str::trim))
        .bind(email)
        .bind(payload.phone.as_deref())
        .bind(payload.lease_start)
        .bind(payload.lease_end)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "A tenant with this email already exists."))
    }

    pub async fn deactivate_tenant<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE tenants SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }
}
