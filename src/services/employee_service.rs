// src/services/employee_service.rs

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::non_empty,
        error::AppError,
        pagination::{PageRequest, PageResponse},
    },
    db::{employee_repo::NewEmployee, AuditRepository, EmployeeRepository},
    models::{
        auth::{EmployeeRole, Principal},
        employee::{
            ApplyLeavePayload, CreateEmployeePayload, Employee, EmployeeLeave, EmployeeQuery,
            LeaveQuery, LeaveStatus, ReviewLeavePayload, UpdateEmployeePayload,
        },
        notification::{NotificationDraft, Recipient},
    },
    services::{access, auth::hash_password, notification_service::NotificationService},
};

const CANCELLED_REMARK: &str = "Cancelled by employee";

/// Quem pode criar um funcionário com o perfil pedido.
pub fn can_create_with_role(actor: &Principal, role: EmployeeRole) -> bool {
    match actor.role {
        Some(EmployeeRole::Admin) => actor.is_staff(),
        Some(EmployeeRole::SubAdmin) => actor.is_staff() && role == EmployeeRole::Employee,
        _ => false,
    }
}

#[derive(Clone)]
pub struct EmployeeService {
    repo: EmployeeRepository,
    audit: AuditRepository,
    notifications: NotificationService,
    pool: PgPool,
}

impl EmployeeService {
    pub fn new(
        repo: EmployeeRepository,
        audit: AuditRepository,
        notifications: NotificationService,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            audit,
            notifications,
            pool,
        }
    }

    // =========================================================================
    //  1. FUNCIONÁRIOS
    // =========================================================================

    pub async fn list(&self, query: &EmployeeQuery) -> Result<PageResponse<Employee>, AppError> {
        let page = PageRequest::new(query.page, query.per_page);
        let search = non_empty(query.search.as_deref());
        let (employees, total) = self.repo.list(query.role, search.as_deref(), page).await?;
        Ok(PageResponse::new(employees, page, total))
    }

    pub async fn create(&self, actor: &Principal, payload: &CreateEmployeePayload) -> Result<Employee, AppError> {
        let role = payload.role.unwrap_or(EmployeeRole::Employee);
        if !can_create_with_role(actor, role) {
            tracing::warn!("{} tentou criar funcionário com perfil {:?}", actor.email, role);
            return Err(AppError::forbidden("You are not allowed to create an employee with this role."));
        }

        let email = payload.email.trim().to_lowercase();
        let password_hash = hash_password(&payload.password).await?;

        let mut tx = self.pool.begin().await?;
        let employee = self
            .repo
            .create(
                &mut *tx,
                NewEmployee {
                    full_name: payload.full_name.trim(),
                    email: &email,
                    phone: payload.phone.as_deref(),
                    role,
                    department: payload.department.as_deref(),
                    designation: payload.designation.as_deref(),
                    password_hash: &password_hash,
                },
            )
            .await?;

        self.audit
            .record(&mut *tx, actor, "employee.created", "employee", Some(employee.id), json!({ "role": role }))
            .await?;
        tx.commit().await?;

        tracing::info!("👷 Funcionário criado: {} ({:?})", employee.email, role);
        Ok(employee)
    }

    async fn require(&self, id: Uuid) -> Result<Employee, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee"))
    }

    pub async fn get(&self, id: Uuid) -> Result<Employee, AppError> {
        self.require(id).await
    }

    pub async fn update(
        &self,
        actor: &Principal,
        id: Uuid,
        payload: &UpdateEmployeePayload,
    ) -> Result<Employee, AppError> {
        let target = self.require(id).await?;

        if !access::can_update_employee(actor, &target, payload) {
            return Err(AppError::forbidden("You are not allowed to make these changes."));
        }

        let email = payload.email.as_deref().map(|e| e.trim().to_lowercase());

        let mut tx = self.pool.begin().await?;
        let employee = self.repo.update(&mut *tx, id, payload, email.as_deref()).await?;
        self.audit
            .record(&mut *tx, actor, "employee.updated", "employee", Some(id), json!({ "role": employee.role }))
            .await?;
        tx.commit().await?;

        Ok(employee)
    }

    pub async fn delete(&self, actor: &Principal, id: Uuid) -> Result<(), AppError> {
        if actor.id == id {
            return Err(AppError::conflict("You cannot deactivate your own account."));
        }

        let mut tx = self.pool.begin().await?;
        let employee = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee"))?;

        self.repo.deactivate(&mut *tx, id).await?;
        self.audit
            .record(&mut *tx, actor, "employee.deleted", "employee", Some(id), json!({ "email": employee.email }))
            .await?;
        tx.commit().await?;

        tracing::info!("Funcionário desativado: {}", employee.email);
        Ok(())
    }

    // =========================================================================
    //  2. FÉRIAS
    // =========================================================================

    pub async fn apply_leave(&self, actor: &Principal, payload: &ApplyLeavePayload) -> Result<EmployeeLeave, AppError> {
        if !actor.is_staff() {
            return Err(AppError::forbidden("Only employees can apply for leave."));
        }

        let mut tx = self.pool.begin().await?;

        if self
            .repo
            .has_overlapping_leave(&mut *tx, actor.id, payload.start_date, payload.end_date)
            .await?
        {
            return Err(AppError::conflict("You already have a leave request overlapping these dates."));
        }

        let mut leave = self
            .repo
            .create_leave(
                &mut *tx,
                actor.id,
                payload.leave_type.trim(),
                payload.start_date,
                payload.end_date,
                payload.reason.as_deref(),
            )
            .await?;
        leave.employee_name = Some(actor.full_name.clone());

        let draft = NotificationDraft::new(
            "Leave request",
            format!(
                "{} requested {} leave from {} to {}.",
                actor.full_name, leave.leave_type, leave.start_date, leave.end_date
            ),
        )
        .link("leave", leave.id);
        self.notifications.notify_managers(&mut *tx, actor, std::iter::empty(), draft).await?;

        self.audit
            .record(&mut *tx, actor, "leave.applied", "leave", Some(leave.id), json!({ "days": leave.days() }))
            .await?;
        tx.commit().await?;

        Ok(leave)
    }

    pub async fn list_leaves(&self, actor: &Principal, query: &LeaveQuery) -> Result<PageResponse<EmployeeLeave>, AppError> {
        // Funcionário comum só vê os próprios pedidos
        let employee_id = if actor.is_manager() { query.employee_id } else { Some(actor.id) };

        let page = PageRequest::new(query.page, query.per_page);
        let (leaves, total) = self.repo.list_leaves(employee_id, query.status, page).await?;
        Ok(PageResponse::new(leaves, page, total))
    }

    pub async fn review_leave(
        &self,
        actor: &Principal,
        id: Uuid,
        payload: &ReviewLeavePayload,
    ) -> Result<EmployeeLeave, AppError> {
        if payload.status == LeaveStatus::Pending {
            return Err(AppError::bad_request("A review must approve or reject the request."));
        }

        let mut tx = self.pool.begin().await?;

        let leave = self
            .repo
            .find_leave(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Leave request"))?;

        access::check_leave_review(actor, &leave)?;

        let mut reviewed = self
            .repo
            .review_leave(&mut *tx, id, payload.status, Some(actor.id), payload.remarks.as_deref())
            .await?;
        reviewed.employee_name = leave.employee_name;

        let verdict = if payload.status == LeaveStatus::Approved { "approved" } else { "rejected" };
        let draft = NotificationDraft::new(
            format!("Leave {}", verdict),
            format!(
                "Your leave from {} to {} was {}.",
                reviewed.start_date, reviewed.end_date, verdict
            ),
        )
        .link("leave", id);
        self.notifications
            .notify(&mut *tx, actor, [Recipient::employee(reviewed.employee_id)], draft)
            .await?;

        self.audit
            .record(&mut *tx, actor, "leave.reviewed", "leave", Some(id), json!({ "status": payload.status }))
            .await?;
        tx.commit().await?;

        Ok(reviewed)
    }

    /// Cancelamento vira rejeição com observação; nada é apagado.
    pub async fn cancel_leave(&self, actor: &Principal, id: Uuid) -> Result<EmployeeLeave, AppError> {
        let mut tx = self.pool.begin().await?;

        let leave = self
            .repo
            .find_leave(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Leave request"))?;

        if leave.employee_id != actor.id {
            return Err(AppError::forbidden("You can only cancel your own leave requests."));
        }
        if leave.status != LeaveStatus::Pending {
            return Err(AppError::conflict("Only pending leave requests can be cancelled."));
        }

        let mut cancelled = self
            .repo
            .review_leave(&mut *tx, id, LeaveStatus::Rejected, None, Some(CANCELLED_REMARK))
            .await?;
        cancelled.employee_name = leave.employee_name;

        self.audit
            .record(&mut *tx, actor, "leave.cancelled", "leave", Some(id), json!({}))
            .await?;
        tx.commit().await?;

        Ok(cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::PrincipalKind;

    fn staff(role: EmployeeRole) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            kind: PrincipalKind::Employee,
            role: Some(role),
            unit_id: None,
            full_name: "Staff".into(),
            email: "staff@example.com".into(),
        }
    }

    #[test]
    fn admin_creates_any_role() {
        let admin = staff(EmployeeRole::Admin);
        assert!(can_create_with_role(&admin, EmployeeRole::Admin));
        assert!(can_create_with_role(&admin, EmployeeRole::SubAdmin));
        assert!(can_create_with_role(&admin, EmployeeRole::Employee));
    }

    #[test]
    fn sub_admin_creates_only_employees() {
        let sub = staff(EmployeeRole::SubAdmin);
        assert!(can_create_with_role(&sub, EmployeeRole::Employee));
        assert!(!can_create_with_role(&sub, EmployeeRole::SubAdmin));
        assert!(!can_create_with_role(&sub, EmployeeRole::Admin));
    }

    #[test]
    fn plain_employees_and_residents_create_nobody() {
        assert!(!can_create_with_role(&staff(EmployeeRole::Employee), EmployeeRole::Employee));

        let customer = Principal {
            kind: PrincipalKind::Customer,
            role: None,
            ..staff(EmployeeRole::Employee)
        };
        assert!(!can_create_with_role(&customer, EmployeeRole::Employee));
    }
}
