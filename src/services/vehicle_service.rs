// src/services/vehicle_service.rs

use serde_json::json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::non_empty,
        error::AppError,
        pagination::{PageRequest, PageResponse},
    },
    db::{vehicle_repo::NewVehicle, AuditRepository, PropertyRepository, VehicleRepository},
    models::{
        auth::{Principal, PrincipalKind},
        vehicle::{normalize_registration, CreateVehiclePayload, UpdateVehiclePayload, Vehicle, VehicleQuery},
    },
    services::access,
};

const DUPLICATE_REGISTRATION: &str = "A vehicle with this registration number is already registered.";

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct VehicleService {
    repo: VehicleRepository,
    property_repo: PropertyRepository,
    audit: AuditRepository,
    pool: PgPool,
}

impl VehicleService {
    pub fn new(repo: VehicleRepository, property_repo: PropertyRepository, audit: AuditRepository, pool: PgPool) -> Self {
        Self {
            repo,
            property_repo,
            audit,
            pool,
        }
    }

    pub async fn list(&self, actor: &Principal, query: &VehicleQuery) -> Result<PageResponse<Vehicle>, AppError> {
        let unit_id = if actor.is_staff() {
            query.unit_id
        } else {
            Some(
                actor
                    .resident_unit()
                    .ok_or_else(|| AppError::forbidden("Your account is not linked to a unit."))?,
            )
        };

        let page = PageRequest::new(query.page, query.per_page);
        let search = non_empty(query.search.as_deref());
        let (vehicles, total) = self.repo.list(unit_id, search.as_deref(), page).await?;
        Ok(PageResponse::new(vehicles, page, total))
    }

    pub async fn get(&self, actor: &Principal, id: Uuid) -> Result<Vehicle, AppError> {
        let vehicle = self.require(&self.pool, id).await?;
        if !access::can_view_vehicle(actor, &vehicle) {
            return Err(AppError::forbidden("You cannot view this vehicle."));
        }
        Ok(vehicle)
    }

    async fn require<'e, E>(&self, executor: E, id: Uuid) -> Result<Vehicle, AppError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or_else(|| AppError::not_found("Vehicle"))
    }

    /// Dono informado pela administração: morador ativo da própria unidade.
    async fn check_owner(
        &self,
        conn: &mut PgConnection,
        unit_id: Uuid,
        owner_kind: PrincipalKind,
        owner_id: Uuid,
    ) -> Result<(), AppError> {
        let owner_unit = match owner_kind {
            PrincipalKind::Customer => self
                .property_repo
                .find_customer(&mut *conn, owner_id)
                .await?
                .map(|c| c.unit_id),
            PrincipalKind::Tenant => self
                .property_repo
                .find_tenant(&mut *conn, owner_id)
                .await?
                .map(|t| t.unit_id),
            PrincipalKind::Employee => {
                return Err(AppError::bad_request("A vehicle must belong to a customer or tenant."));
            }
        };

        match owner_unit {
            None => Err(AppError::not_found("Owner")),
            Some(u) if u != unit_id => Err(AppError::bad_request("The owner does not live in this unit.")),
            Some(_) => Ok(()),
        }
    }

    pub async fn create(&self, actor: &Principal, payload: &CreateVehiclePayload) -> Result<Vehicle, AppError> {
        let registration = normalize_registration(&payload.registration_number);

        let (unit_id, owner_kind, owner_id) = access::vehicle_placement(actor, payload)?;

        let mut tx = self.pool.begin().await?;

        if actor.is_manager() {
            self.property_repo
                .find_unit(&mut *tx, unit_id)
                .await?
                .ok_or_else(|| AppError::not_found("Unit"))?;
            self.check_owner(&mut tx, unit_id, owner_kind, owner_id).await?;
        }

        if self.repo.registration_in_use(&mut *tx, &registration, None).await? {
            return Err(AppError::conflict(DUPLICATE_REGISTRATION));
        }

        let created = self
            .repo
            .create(
                &mut *tx,
                NewVehicle {
                    unit_id,
                    owner_kind,
                    owner_id,
                    registration_number: &registration,
                    vehicle_type: payload.vehicle_type,
                    make: trimmed(&payload.make),
                    model: trimmed(&payload.model),
                    color: trimmed(&payload.color),
                    parking_slot: trimmed(&payload.parking_slot),
                },
            )
            .await?;

        self.audit
            .record(
                &mut *tx,
                actor,
                "vehicle.created",
                "vehicle",
                Some(created.id),
                json!({ "registrationNumber": registration, "unitId": unit_id }),
            )
            .await?;

        let vehicle = self.require(&mut *tx, created.id).await?;
        tx.commit().await?;

        tracing::info!("🚗 Veículo {} cadastrado na unidade {:?}", registration, vehicle.unit_number);
        Ok(vehicle)
    }

    pub async fn update(
        &self,
        actor: &Principal,
        id: Uuid,
        payload: &UpdateVehiclePayload,
    ) -> Result<Vehicle, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self.require(&mut *tx, id).await?;
        if !access::can_manage_vehicle(actor, &current) {
            return Err(AppError::forbidden("You cannot change this vehicle."));
        }

        let registration = payload.registration_number.as_deref().map(normalize_registration);
        if let Some(reg) = registration.as_deref() {
            if self.repo.registration_in_use(&mut *tx, reg, Some(id)).await? {
                return Err(AppError::conflict(DUPLICATE_REGISTRATION));
            }
        }

        self.repo
            .update(&mut *tx, id, registration.as_deref(), payload)
            .await?;
        self.audit
            .record(
                &mut *tx,
                actor,
                "vehicle.updated",
                "vehicle",
                Some(id),
                json!({ "registrationNumber": registration.as_deref().unwrap_or(&current.registration_number) }),
            )
            .await?;

        let vehicle = self.require(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(vehicle)
    }

    pub async fn delete(&self, actor: &Principal, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let vehicle = self.require(&mut *tx, id).await?;
        if !access::can_manage_vehicle(actor, &vehicle) {
            return Err(AppError::forbidden("You cannot remove this vehicle."));
        }

        self.repo.deactivate(&mut *tx, id).await?;
        self.audit
            .record(
                &mut *tx,
                actor,
                "vehicle.deleted",
                "vehicle",
                Some(id),
                json!({ "registrationNumber": vehicle.registration_number }),
            )
            .await?;
        tx.commit().await?;

        Ok(())
    }
}
