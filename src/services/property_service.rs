// src/services/property_service.rs

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::non_empty,
        error::AppError,
        pagination::{PageRequest, PageResponse},
    },
    db::{AuditRepository, PropertyRepository},
    models::{
        auth::{Principal, PrincipalKind},
        property::{
            CreateCustomerPayload, CreateTenantPayload, CreateUnitPayload, Customer, PropertyHistory,
            ResidentQuery, Tenant, Unit, UnitDetail, UnitQuery, UpdateCustomerPayload,
            UpdateTenantPayload, UpdateUnitPayload,
        },
    },
    services::{access, auth::hash_password},
};

#[derive(Clone)]
pub struct PropertyService {
    repo: PropertyRepository,
    audit: AuditRepository,
    pool: PgPool,
}

impl PropertyService {
    pub fn new(repo: PropertyRepository, audit: AuditRepository, pool: PgPool) -> Self {
        Self { repo, audit, pool }
    }

    // =========================================================================
    //  1. UNIDADES
    // =========================================================================

    pub async fn list_units(&self, query: &UnitQuery) -> Result<PageResponse<Unit>, AppError> {
        let page = PageRequest::new(query.page, query.per_page);
        let search = non_empty(query.search.as_deref());
        let (units, total) = self
            .repo
            .list_units(search.as_deref(), query.particulars, page)
            .await?;
        Ok(PageResponse::new(units, page, total))
    }

    pub async fn create_unit(&self, actor: &Principal, payload: &CreateUnitPayload) -> Result<Unit, AppError> {
        let mut tx = self.pool.begin().await?;

        let unit = self.repo.create_unit(&mut *tx, payload).await?;
        self.audit
            .record(&mut *tx, actor, "unit.created", "unit", Some(unit.id), json!({ "unitNumber": unit.unit_number }))
            .await?;

        tx.commit().await?;
        tracing::info!("🏢 Unidade criada: {}", unit.unit_number);
        Ok(unit)
    }

    async fn require_unit(&self, id: Uuid) -> Result<Unit, AppError> {
        self.repo
            .find_unit(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Unit"))
    }

    pub async fn get_unit(&self, actor: &Principal, id: Uuid) -> Result<UnitDetail, AppError> {
        if !access::can_view_unit(actor, id) {
            return Err(AppError::forbidden("You can only view your own unit."));
        }

        let unit = self.require_unit(id).await?;
        let customer = self.repo.active_customer_for_unit(&self.pool, id).await?;
        let tenant = self.repo.active_tenant_for_unit(&self.pool, id).await?;

        Ok(UnitDetail { unit, customer, tenant })
    }

    pub async fn update_unit(
        &self,
        actor: &Principal,
        id: Uuid,
        payload: &UpdateUnitPayload,
    ) -> Result<Unit, AppError> {
        let mut tx = self.pool.begin().await?;

        let before = self
            .repo
            .find_unit(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Unit"))?;

        let unit = self.repo.update_unit(&mut *tx, id, payload).await?;

        // Mudança de situação entra no histórico do imóvel
        if before.particulars != unit.particulars {
            let details = format!("{} → {}", before.particulars.as_str(), unit.particulars.as_str());
            self.repo
                .add_history(&mut *tx, id, "particulars_changed", None, None, Some(&details), actor.id)
                .await?;
        }

        self.audit
            .record(&mut *tx, actor, "unit.updated", "unit", Some(id), json!({ "particulars": unit.particulars.as_str() }))
            .await?;

        tx.commit().await?;
        Ok(unit)
    }

    pub async fn delete_unit(&self, actor: &Principal, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let unit = self
            .repo
            .find_unit(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Unit"))?;

        if self.repo.unit_has_active_residents(&mut *tx, id).await? {
            return Err(AppError::conflict(
                "The unit still has an active owner or tenant. Remove them first.",
            ));
        }

        self.repo.deactivate_unit(&mut *tx, id).await?;
        self.audit
            .record(&mut *tx, actor, "unit.deleted", "unit", Some(id), json!({ "unitNumber": unit.unit_number }))
            .await?;

        tx.commit().await?;
        tracing::info!("🗑️ Unidade desativada: {}", unit.unit_number);
        Ok(())
    }

    pub async fn unit_history(&self, actor: &Principal, id: Uuid) -> Result<Vec<PropertyHistory>, AppError> {
        if !access::can_view_unit_history(actor, id) {
            return Err(AppError::forbidden("Only managers and the unit owner can view its history."));
        }
        self.require_unit(id).await?;
        self.repo.list_history(id).await
    }

    // =========================================================================
    //  2. PROPRIETÁRIOS
    // =========================================================================

    pub async fn list_customers(&self, query: &ResidentQuery) -> Result<PageResponse<Customer>, AppError> {
        let page = PageRequest::new(query.page, query.per_page);
        let search = non_empty(query.search.as_deref());
        let (customers, total) = self.repo.list_customers(search.as_deref(), page).await?;
        Ok(PageResponse::new(customers, page, total))
    }

    pub async fn create_customer(
        &self,
        actor: &Principal,
        payload: &CreateCustomerPayload,
    ) -> Result<Customer, AppError> {
        let email = payload.email.trim().to_lowercase();
        let password_hash = hash_password(&payload.password).await?;

        let mut tx = self.pool.begin().await?;

        let unit = self
            .repo
            .find_unit(&mut *tx, payload.unit_id)
            .await?
            .ok_or_else(|| AppError::not_found("Unit"))?;

        if self.repo.active_customer_for_unit(&mut *tx, unit.id).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Unit {} already has an active owner.",
                unit.unit_number
            )));
        }

        let mut customer = self
            .repo
            .create_customer(&mut *tx, payload, &email, &password_hash)
            .await?;
        customer.unit_number = Some(unit.unit_number.clone());

        self.repo
            .add_history(&mut *tx, unit.id, "owner_assigned", Some(customer.id), None, Some(&customer.full_name), actor.id)
            .await?;
        self.audit
            .record(&mut *tx, actor, "customer.created", "customer", Some(customer.id), json!({ "unitId": unit.id }))
            .await?;

        tx.commit().await?;
        tracing::info!("👤 Proprietário {} vinculado à unidade {}", customer.email, unit.unit_number);
        Ok(customer)
    }

    async fn require_customer(&self, id: Uuid) -> Result<Customer, AppError> {
        self.repo
            .find_customer(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer"))
    }

    pub async fn get_customer(&self, actor: &Principal, id: Uuid) -> Result<Customer, AppError> {
        let customer = self.require_customer(id).await?;
        if !access::can_view_customer(actor, &customer) {
            return Err(AppError::forbidden("You cannot view this customer."));
        }
        Ok(customer)
    }

    pub async fn update_customer(
        &self,
        actor: &Principal,
        id: Uuid,
        payload: &UpdateCustomerPayload,
    ) -> Result<Customer, AppError> {
        let is_self = actor.is(PrincipalKind::Customer, id);

        if !actor.is_manager() {
            if !is_self {
                return Err(AppError::forbidden("You cannot edit this customer."));
            }
            if payload.touches_identity() {
                return Err(AppError::forbidden("You can only update your phone numbers."));
            }
        }

        let email = payload.email.as_deref().map(|e| e.trim().to_lowercase());

        let mut tx = self.pool.begin().await?;
        self.repo
            .find_customer(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer"))?;

        self.repo.update_customer(&mut *tx, id, payload, email.as_deref()).await?;
        self.audit
            .record(&mut *tx, actor, "customer.updated", "customer", Some(id), json!({}))
            .await?;
        tx.commit().await?;

        self.require_customer(id).await
    }

    pub async fn delete_customer(&self, actor: &Principal, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let customer = self
            .repo
            .find_customer(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer"))?;

        self.repo.deactivate_customer(&mut *tx, id).await?;
        self.repo
            .add_history(&mut *tx, customer.unit_id, "owner_removed", Some(id), None, Some(&customer.full_name), actor.id)
            .await?;
        self.audit
            .record(&mut *tx, actor, "customer.deleted", "customer", Some(id), json!({ "unitId": customer.unit_id }))
            .await?;

        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  3. INQUILINOS
    // =========================================================================

    pub async fn list_tenants(
        &self,
        actor: &Principal,
        query: &ResidentQuery,
    ) -> Result<PageResponse<Tenant>, AppError> {
        // Proprietário só enxerga a própria unidade
        let unit_id = match actor.kind {
            PrincipalKind::Employee => query.unit_id,
            PrincipalKind::Customer => actor.unit_id,
            PrincipalKind::Tenant => {
                return Err(AppError::forbidden("Tenants cannot list tenants."));
            }
        };

        let page = PageRequest::new(query.page, query.per_page);
        let search = non_empty(query.search.as_deref());
        let (tenants, total) = self.repo.list_tenants(unit_id, search.as_deref(), page).await?;
        Ok(PageResponse::new(tenants, page, total))
    }

    pub async fn create_tenant(&self, actor: &Principal, payload: &CreateTenantPayload) -> Result<Tenant, AppError> {
        if !access::can_register_tenant_for(actor, payload.unit_id) {
            return Err(AppError::forbidden("You can only register tenants for your own unit."));
        }

        let email = payload.email.trim().to_lowercase();
        let password_hash = hash_password(&payload.password).await?;

        let mut tx = self.pool.begin().await?;

        let unit = self
            .repo
            .find_unit(&mut *tx, payload.unit_id)
            .await?
            .ok_or_else(|| AppError::not_found("Unit"))?;

        if self.repo.active_tenant_for_unit(&mut *tx, unit.id).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Unit {} already has an active tenant.",
                unit.unit_number
            )));
        }

        // O contrato fica ligado ao proprietário da época
        let owner_id = self
            .repo
            .active_customer_for_unit(&mut *tx, unit.id)
            .await?
            .map(|c| c.id);

        let mut tenant = self
            .repo
            .create_tenant(&mut *tx, payload, owner_id, &email, &password_hash)
            .await?;
        tenant.unit_number = Some(unit.unit_number.clone());

        self.repo
            .add_history(&mut *tx, unit.id, "tenant_assigned", owner_id, Some(tenant.id), Some(&tenant.full_name), actor.id)
            .await?;
        self.audit
            .record(&mut *tx, actor, "tenant.created", "tenant", Some(tenant.id), json!({ "unitId": unit.id }))
            .await?;

        tx.commit().await?;
        tracing::info!("🏠 Inquilino {} vinculado à unidade {}", tenant.email, unit.unit_number);
        Ok(tenant)
    }

    async fn require_tenant(&self, id: Uuid) -> Result<Tenant, AppError> {
        self.repo
            .find_tenant(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Tenant"))
    }

    pub async fn get_tenant(&self, actor: &Principal, id: Uuid) -> Result<Tenant, AppError> {
        let tenant = self.require_tenant(id).await?;
        if !access::can_view_tenant(actor, &tenant) {
            return Err(AppError::forbidden("You cannot view this tenant."));
        }
        Ok(tenant)
    }

    pub async fn update_tenant(
        &self,
        actor: &Principal,
        id: Uuid,
        payload: &UpdateTenantPayload,
    ) -> Result<Tenant, AppError> {
        let tenant = self.require_tenant(id).await?;

        if !access::can_manage_tenant(actor, &tenant) {
            let is_self = actor.is(PrincipalKind::Tenant, id);
            if !is_self {
                return Err(AppError::forbidden("You cannot edit this tenant."));
            }
            if payload.touches_identity() {
                return Err(AppError::forbidden("You can only update your phone number."));
            }
        }

        // O payload pode trazer só uma das datas; compara com a gravada
        payload
            .check_merged_lease(&tenant)
            .map_err(|_| AppError::bad_request("Lease end must not be before lease start."))?;

        let email = payload.email.as_deref().map(|e| e.trim().to_lowercase());

        let mut tx = self.pool.begin().await?;
        self.repo.update_tenant(&mut *tx, id, payload, email.as_deref()).await?;
        self.audit
            .record(&mut *tx, actor, "tenant.updated", "tenant", Some(id), json!({}))
            .await?;
        tx.commit().await?;

        self.require_tenant(id).await
    }

    pub async fn delete_tenant(&self, actor: &Principal, id: Uuid) -> Result<(), AppError> {
        let tenant = self.require_tenant(id).await?;
        if !access::can_manage_tenant(actor, &tenant) {
            return Err(AppError::forbidden("You cannot remove this tenant."));
        }

        let mut tx = self.pool.begin().await?;
        self.repo.deactivate_tenant(&mut *tx, id).await?;
        self.repo
            .add_history(&mut *tx, tenant.unit_id, "tenant_removed", tenant.customer_id, Some(id), Some(&tenant.full_name), actor.id)
            .await?;
        self.audit
            .record(&mut *tx, actor, "tenant.deleted", "tenant", Some(id), json!({ "unitId": tenant.unit_id }))
            .await?;
        tx.commit().await?;

        tracing::info!("Inquilino removido: {}", tenant.email);
        Ok(())
    }
}
