// src/services/internal_complaint_service.rs

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{PageRequest, PageResponse},
    },
    db::{AuditRepository, EmployeeRepository, InternalComplaintRepository},
    models::{
        auth::Principal,
        complaint::{
            ComplaintAction, ComplaintPriority, ComplaintStatus, CreateInternalComplaintPayload,
            InternalComplaint, InternalComplaintQuery, InternalStatusPayload,
        },
        notification::{NotificationDraft, Recipient},
    },
    services::{access, notification_service::NotificationService},
};

#[derive(Clone)]
pub struct InternalComplaintService {
    repo: InternalComplaintRepository,
    employee_repo: EmployeeRepository,
    audit: AuditRepository,
    notifications: NotificationService,
    pool: PgPool,
}

impl InternalComplaintService {
    pub fn new(
        repo: InternalComplaintRepository,
        employee_repo: EmployeeRepository,
        audit: AuditRepository,
        notifications: NotificationService,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            employee_repo,
            audit,
            notifications,
            pool,
        }
    }

    pub async fn create(
        &self,
        actor: &Principal,
        payload: &CreateInternalComplaintPayload,
    ) -> Result<InternalComplaint, AppError> {
        if !actor.is_staff() {
            return Err(AppError::forbidden("Only employees can raise internal complaints."));
        }

        let mut tx = self.pool.begin().await?;

        let id = self
            .repo
            .create(
                &mut *tx,
                actor.id,
                payload.department.as_deref().map(str::trim).filter(|d| !d.is_empty()),
                payload.title.trim(),
                payload.description.trim(),
                payload.priority.unwrap_or(ComplaintPriority::Normal),
            )
            .await?;

        let complaint = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Internal complaint"))?;

        self.audit
            .record(
                &mut *tx,
                actor,
                "internal_complaint.created",
                "internal_complaint",
                Some(id),
                json!({ "ticketNumber": complaint.ticket_number }),
            )
            .await?;

        let draft = NotificationDraft::new(
            format!("New internal complaint #{}", complaint.ticket_number),
            format!("{} raised '{}'.", actor.full_name, complaint.title),
        )
        .link("internal_complaint", id);
        self.notifications
            .notify_managers(&mut *tx, actor, std::iter::empty(), draft)
            .await?;

        tx.commit().await?;
        Ok(complaint)
    }

    pub async fn list(
        &self,
        actor: &Principal,
        query: &InternalComplaintQuery,
    ) -> Result<PageResponse<InternalComplaint>, AppError> {
        if !actor.is_staff() {
            return Err(AppError::forbidden("Only employees can view internal complaints."));
        }

        let involving = if actor.is_manager() { None } else { Some(actor.id) };
        let page = PageRequest::new(query.page, query.per_page);
        let (complaints, total) = self.repo.list(query.status, involving, page).await?;
        Ok(PageResponse::new(complaints, page, total))
    }

    pub async fn get(&self, actor: &Principal, id: Uuid) -> Result<InternalComplaint, AppError> {
        let complaint = self
            .repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Internal complaint"))?;

        if !access::can_view_internal_complaint(actor, &complaint) {
            return Err(AppError::forbidden("You cannot view this internal complaint."));
        }
        Ok(complaint)
    }

    pub async fn assign(&self, actor: &Principal, id: Uuid, employee_id: Uuid) -> Result<InternalComplaint, AppError> {
        let mut tx = self.pool.begin().await?;

        let before = self.lock(&mut tx, id).await?;
        self.check(actor, ComplaintAction::Assign, &before)?;

        let assignee = self
            .employee_repo
            .find_by_id(&mut *tx, employee_id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee"))?;

        self.repo.assign(&mut *tx, id, assignee.id).await?;
        self.audit
            .record(
                &mut *tx,
                actor,
                "internal_complaint.assign",
                "internal_complaint",
                Some(id),
                json!({ "from": before.status.as_str(), "employeeId": assignee.id }),
            )
            .await?;

        let draft = NotificationDraft::new(
            format!("Internal complaint #{} assigned", before.ticket_number),
            format!("'{}' was assigned to {}.", before.title, assignee.full_name),
        )
        .link("internal_complaint", id);
        self.notifications
            .notify(
                &mut *tx,
                actor,
                [Recipient::employee(assignee.id), Recipient::employee(before.raised_by)],
                draft,
            )
            .await?;

        let after = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Internal complaint"))?;
        tx.commit().await?;

        Ok(after)
    }

    /// Mudança de status pela mesma tabela de transições das reclamações.
    pub async fn set_status(
        &self,
        actor: &Principal,
        id: Uuid,
        payload: &InternalStatusPayload,
    ) -> Result<InternalComplaint, AppError> {
        let action = ComplaintAction::for_target(payload.status);
        if action == ComplaintAction::Assign {
            return Err(AppError::bad_request("Use the assign endpoint to assign an internal complaint."));
        }

        let notes = payload
            .resolution_notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        if payload.status == ComplaintStatus::Resolved && notes.is_none() {
            return Err(AppError::bad_request("Resolution notes are required."));
        }

        let mut tx = self.pool.begin().await?;

        let before = self.lock(&mut tx, id).await?;
        self.check(actor, action, &before)?;

        self.repo.set_status(&mut *tx, id, payload.status, notes).await?;
        self.audit
            .record(
                &mut *tx,
                actor,
                &format!("internal_complaint.{}", action.as_str()),
                "internal_complaint",
                Some(id),
                json!({ "from": before.status.as_str(), "to": payload.status.as_str() }),
            )
            .await?;

        let draft = NotificationDraft::new(
            format!("Internal complaint #{} updated", before.ticket_number),
            format!("'{}' is now {}.", before.title, payload.status.as_str()),
        )
        .link("internal_complaint", id);
        let recipients = std::iter::once(Recipient::employee(before.raised_by))
            .chain(before.assigned_to.map(Recipient::employee));
        self.notifications.notify(&mut *tx, actor, recipients, draft).await?;

        let after = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Internal complaint"))?;
        tx.commit().await?;

        tracing::info!(
            "🔁 Reclamação interna #{}: {} → {}",
            after.ticket_number,
            before.status.as_str(),
            after.status.as_str()
        );
        Ok(after)
    }

    async fn lock(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: Uuid,
    ) -> Result<InternalComplaint, AppError> {
        self.repo
            .find_for_update(&mut **tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Internal complaint"))
    }

    fn check(&self, actor: &Principal, action: ComplaintAction, c: &InternalComplaint) -> Result<(), AppError> {
        if !access::may_act_on_internal(actor, action, c) {
            tracing::warn!("{} não pode '{}' a reclamação interna #{}", actor.email, action.as_str(), c.ticket_number);
            return Err(AppError::forbidden(format!(
                "You are not allowed to {} this internal complaint.",
                action.as_str()
            )));
        }
        if c.status.apply(action).is_none() {
            return Err(AppError::InvalidTransition {
                action: action.as_str(),
                status: c.status.as_str().to_string(),
            });
        }
        Ok(())
    }
}
