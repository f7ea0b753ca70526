// src/db/vehicle_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError, pagination::PageRequest},
    models::{
        auth::PrincipalKind,
        vehicle::{UpdateVehiclePayload, Vehicle, VehicleType},
    },
};

const VEHICLE_SELECT: &str = r#"
    SELECT v.id, v.unit_id, u.unit_number, v.owner_kind, v.owner_id, v.registration_number,
           v.vehicle_type, v.make, v.model, v.color, v.parking_slot, v.is_active,
           v.created_at, v.updated_at
    FROM vehicles v
    JOIN units u ON u.id = v.unit_id
"#;

const VEHICLE_RETURNING: &str = r#"
    RETURNING id, unit_id, owner_kind, owner_id, registration_number, vehicle_type,
              make, model, color, parking_slot, is_active, created_at, updated_at
"#;

const DUPLICATE_REGISTRATION: &str = "A vehicle with this registration number is already registered.";

pub struct NewVehicle<'a> {
    pub unit_id: Uuid,
    pub owner_kind: PrincipalKind,
    pub owner_id: Uuid,
    pub registration_number: &'a str,
    pub vehicle_type: VehicleType,
    pub make: Option<&'a str>,
    pub model: Option<&'a str>,
    pub color: Option<&'a str>,
    pub parking_slot: Option<&'a str>,
}

#[derive(Clone)]
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn registration_in_use<'e, E>(
        &self,
        executor: E,
        registration: &str,
        except: Option<Uuid>,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM vehicles
                WHERE registration_number = $1 AND is_active = TRUE
                  AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(registration)
        .bind(except)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    pub async fn create<'e, E>(&self, executor: E, new: NewVehicle<'_>) -> Result<Vehicle, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO vehicles (unit_id, owner_kind, owner_id, registration_number, vehicle_type,
                                  make, model, color, parking_slot)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            {}
            "#,
            VEHICLE_RETURNING
        );

        sqlx::query_as::<_, Vehicle>(&sql)
            .bind(new.unit_id)
            .bind(new.owner_kind)
            .bind(new.owner_id)
            .bind(new.registration_number)
            .bind(new.vehicle_type)
            .bind(new.make)
            .bind(new.model)
            .bind(new.color)
            .bind(new.parking_slot)
            .fetch_one(executor)
            .await
            .map_err(|e| map_unique_violation(e, DUPLICATE_REGISTRATION))
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Vehicle>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE v.id = $1 AND v.is_active = TRUE", VEHICLE_SELECT);

        let vehicle = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(vehicle)
    }

    pub async fn list(
        &self,
        unit_id: Option<Uuid>,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Vehicle>, i64), AppError> {
        let filter = r#"
            WHERE v.is_active = TRUE
              AND ($1::uuid IS NULL OR v.unit_id = $1)
              AND ($2::text IS NULL OR v.registration_number ILIKE $2 OR v.make ILIKE $2
                   OR v.model ILIKE $2 OR v.parking_slot ILIKE $2 OR u.unit_number ILIKE $2)
        "#;

        let sql = format!(
            "{} {} ORDER BY u.unit_number ASC, v.registration_number ASC LIMIT $3 OFFSET $4",
            VEHICLE_SELECT, filter
        );

        let vehicles = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(unit_id)
            .bind(search)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM vehicles v JOIN units u ON u.id = v.unit_id {}",
            filter
        ))
        .bind(unit_id)
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok((vehicles, total))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        registration: Option<&str>,
        payload: &UpdateVehiclePayload,
    ) -> Result<Vehicle, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE vehicles SET
                registration_number = COALESCE($2, registration_number),
                vehicle_type = COALESCE($3, vehicle_type),
                make = COALESCE($4, make),
                model = COALESCE($5, model),
                color = COALESCE($6, color),
                parking_slot = COALESCE($7, parking_slot),
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            {}
            "#,
            VEHICLE_RETURNING
        );

        sqlx::query_as::<_, Vehicle>(&sql)
            .bind(id)
            .bind(registration)
            .bind(payload.vehicle_type)
            .bind(payload.make.as_deref())
            .bind(payload.model.as_deref())
            .bind(payload.color.as_deref())
            .bind(payload.parking_slot.as_deref())
            .fetch_one(executor)
            .await
            .map_err(|e| map_unique_violation(e, DUPLICATE_REGISTRATION))
    }

    pub async fn deactivate<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE vehicles SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }
}
