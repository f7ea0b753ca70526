// src/services/complaint_service.rs

use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::non_empty,
        error::AppError,
        pagination::{PageRequest, PageResponse},
    },
    db::{
        complaint_repo::{ComplaintFilter, LifecycleUpdate, NewComplaint},
        AuditRepository, ComplaintRepository, EmployeeRepository, PropertyRepository,
    },
    models::{
        auth::{Principal, PrincipalKind},
        complaint::{
            CategoryWithSubCategories, Complaint, ComplaintAction, ComplaintCategory, ComplaintComment,
            ComplaintPriority, ComplaintQuery, ComplaintSubCategory, CreateCategoryPayload,
            CreateCommentPayload, CreateComplaintPayload,
        },
        notification::{NotificationDraft, Recipient},
    },
    services::{access, notification_service::NotificationService},
};

/// Quem abriu a reclamação e o proprietário da unidade.
fn complainants(c: &Complaint) -> Vec<Recipient> {
    let mut out = vec![Recipient::new(c.raised_by_kind, c.raised_by_id)];
    if let Some(customer_id) = c.customer_id {
        out.push(Recipient::customer(customer_id));
    }
    out
}

/// Destinatários de cada passo do ciclo de vida (antes do filtro do ator).
fn transition_recipients(action: ComplaintAction, before: &Complaint, after: &Complaint) -> Vec<Recipient> {
    let mut out = complainants(after);
    match action {
        // reabrir tira o responsável; ele ainda deve saber
        ComplaintAction::Reopen => out.extend(before.assigned_to.map(Recipient::employee)),
        _ => out.extend(after.assigned_to.map(Recipient::employee)),
    }
    out
}

/// Comentário de morador vai para o responsável; de funcionário, para os moradores.
fn comment_recipients(author: &Principal, c: &Complaint) -> Vec<Recipient> {
    if author.is_staff() {
        let mut out = complainants(c);
        out.extend(c.assigned_to.map(Recipient::employee));
        out
    } else {
        c.assigned_to.map(Recipient::employee).into_iter().collect()
    }
}

fn transition_message(action: ComplaintAction, c: &Complaint) -> NotificationDraft {
    let ticket = c.ticket_number;
    let (title, message) = match action {
        ComplaintAction::Assign => (
            format!("Complaint #{} assigned", ticket),
            format!(
                "'{}' was assigned to {}.",
                c.title,
                c.assignee_name.as_deref().unwrap_or("a staff member")
            ),
        ),
        ComplaintAction::Schedule => (
            format!("Visit scheduled for #{}", ticket),
            match c.scheduled_at {
                Some(at) => format!("A visit for '{}' is scheduled at {}.", c.title, at.format("%Y-%m-%d %H:%M UTC")),
                None => format!("A visit for '{}' was scheduled.", c.title),
            },
        ),
        ComplaintAction::Start => (
            format!("Work started on #{}", ticket),
            format!("Work on '{}' is now in progress.", c.title),
        ),
        ComplaintAction::Resolve => (
            format!("Complaint #{} resolved", ticket),
            format!("'{}' was marked as resolved. Please close or reopen it.", c.title),
        ),
        ComplaintAction::Close => (
            format!("Complaint #{} closed", ticket),
            format!("'{}' was closed.", c.title),
        ),
        ComplaintAction::Reopen => (
            format!("Complaint #{} reopened", ticket),
            format!("'{}' was reopened and is waiting for assignment.", c.title),
        ),
    };
    NotificationDraft::new(title, message).link("complaint", c.id)
}

#[derive(Clone)]
pub struct ComplaintService {
    repo: ComplaintRepository,
    property_repo: PropertyRepository,
    employee_repo: EmployeeRepository,
    audit: AuditRepository,
    notifications: NotificationService,
    pool: PgPool,
}

impl ComplaintService {
    pub fn new(
        repo: ComplaintRepository,
        property_repo: PropertyRepository,
        employee_repo: EmployeeRepository,
        audit: AuditRepository,
        notifications: NotificationService,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            property_repo,
            employee_repo,
            audit,
            notifications,
            pool,
        }
    }

    // =========================================================================
    //  1. CATEGORIAS
    // =========================================================================

    pub async fn list_categories(&self) -> Result<Vec<CategoryWithSubCategories>, AppError> {
        let categories = self.repo.list_categories().await?;
        let mut subs = self.repo.list_sub_categories().await?;

        Ok(categories
            .into_iter()
            .map(|category| {
                let (mine, rest): (Vec<_>, Vec<_>) = subs.drain(..).partition(|s| s.category_id == category.id);
                subs = rest;
                CategoryWithSubCategories {
                    category,
                    sub_categories: mine,
                }
            })
            .collect())
    }

    pub async fn create_category(
        &self,
        actor: &Principal,
        payload: &CreateCategoryPayload,
    ) -> Result<ComplaintCategory, AppError> {
        let mut tx = self.pool.begin().await?;
        let category = self.repo.create_category(&mut *tx, payload.name.trim()).await?;
        self.audit
            .record(&mut *tx, actor, "category.created", "complaint_category", Some(category.id), json!({ "name": category.name }))
            .await?;
        tx.commit().await?;
        Ok(category)
    }

    pub async fn create_sub_category(
        &self,
        actor: &Principal,
        category_id: Uuid,
        payload: &CreateCategoryPayload,
    ) -> Result<ComplaintSubCategory, AppError> {
        let mut tx = self.pool.begin().await?;
        self.repo
            .find_category(&mut *tx, category_id)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;

        let sub = self
            .repo
            .create_sub_category(&mut *tx, category_id, payload.name.trim())
            .await?;
        self.audit
            .record(&mut *tx, actor, "sub_category.created", "complaint_category", Some(category_id), json!({ "name": sub.name }))
            .await?;
        tx.commit().await?;
        Ok(sub)
    }

    // =========================================================================
    //  2. ABERTURA E CONSULTA
    // =========================================================================

    pub async fn create(&self, actor: &Principal, payload: &CreateComplaintPayload) -> Result<Complaint, AppError> {
        let unit_id = access::complaint_unit(actor, payload.unit_id)?;

        let mut tx = self.pool.begin().await?;

        self.property_repo
            .find_unit(&mut *tx, unit_id)
            .await?
            .ok_or_else(|| AppError::not_found("Unit"))?;

        if let Some(id) = payload.category_id {
            self.repo
                .find_category(&mut *tx, id)
                .await?
                .ok_or_else(|| AppError::not_found("Category"))?;
        }

        let sub_parent = match payload.sub_category_id {
            Some(sub_id) => Some(
                self.repo
                    .find_sub_category(&mut *tx, sub_id)
                    .await?
                    .ok_or_else(|| AppError::bad_request("Unknown sub-category."))?
                    .category_id,
            ),
            None => None,
        };
        let category_id = access::complaint_category(payload.category_id, sub_parent)?;

        let customer_id = if actor.kind == PrincipalKind::Customer {
            Some(actor.id)
        } else {
            self.property_repo
                .active_customer_for_unit(&mut *tx, unit_id)
                .await?
                .map(|c| c.id)
        };
        let tenant_id = (actor.kind == PrincipalKind::Tenant).then_some(actor.id);

        let id = self
            .repo
            .create(
                &mut *tx,
                NewComplaint {
                    unit_id,
                    customer_id,
                    tenant_id,
                    raised_by_kind: actor.kind,
                    raised_by_id: actor.id,
                    category_id,
                    sub_category_id: payload.sub_category_id,
                    title: payload.title.trim(),
                    description: payload.description.trim(),
                    priority: payload.priority.unwrap_or(ComplaintPriority::Normal),
                },
            )
            .await?;

        let complaint = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Complaint"))?;

        self.audit
            .record(
                &mut *tx,
                actor,
                "complaint.created",
                "complaint",
                Some(id),
                json!({ "ticketNumber": complaint.ticket_number, "unitId": unit_id }),
            )
            .await?;

        let draft = NotificationDraft::new(
            format!("New complaint #{}", complaint.ticket_number),
            format!("'{}' was raised for unit {}.", complaint.title, complaint.unit_number),
        )
        .link("complaint", id);
        self.notifications
            .notify_managers(&mut *tx, actor, std::iter::empty(), draft)
            .await?;

        tx.commit().await?;
        tracing::info!("📝 Reclamação #{} aberta por {}", complaint.ticket_number, actor.email);
        Ok(complaint)
    }

    pub async fn list(&self, actor: &Principal, query: &ComplaintQuery) -> Result<PageResponse<Complaint>, AppError> {
        let mut filter = ComplaintFilter {
            status: query.status,
            priority: query.priority,
            unit_id: query.unit_id,
            assigned_to: query.assigned_to,
            raised_by: None,
            search: non_empty(query.search.as_deref()),
        };

        // Visibilidade imposta por cima dos filtros pedidos
        match actor.kind {
            PrincipalKind::Employee if actor.is_manager() => {}
            PrincipalKind::Employee => filter.assigned_to = Some(actor.id),
            PrincipalKind::Customer => filter.unit_id = actor.unit_id.or(Some(Uuid::nil())),
            PrincipalKind::Tenant => filter.raised_by = Some((PrincipalKind::Tenant, actor.id)),
        }

        let page = PageRequest::new(query.page, query.per_page);
        let (complaints, total) = self.repo.list(&filter, page).await?;
        Ok(PageResponse::new(complaints, page, total))
    }

    pub async fn get(&self, actor: &Principal, id: Uuid) -> Result<Complaint, AppError> {
        let complaint = self
            .repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Complaint"))?;

        if !access::can_view_complaint(actor, &complaint) {
            return Err(AppError::forbidden("You cannot view this complaint."));
        }
        Ok(complaint)
    }

    // =========================================================================
    //  3. CICLO DE VIDA
    // =========================================================================

    pub async fn assign(&self, actor: &Principal, id: Uuid, employee_id: Uuid) -> Result<Complaint, AppError> {
        let assignee = self
            .employee_repo
            .find_by_id(&self.pool, employee_id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee"))?;

        self.transition(
            actor,
            id,
            ComplaintAction::Assign,
            LifecycleUpdate::Assign(assignee.id),
            json!({ "employeeId": assignee.id, "employeeName": assignee.full_name }),
        )
        .await
    }

    pub async fn schedule(&self, actor: &Principal, id: Uuid, at: DateTime<Utc>) -> Result<Complaint, AppError> {
        if at <= Utc::now() {
            return Err(AppError::bad_request("The visit must be scheduled in the future."));
        }
        self.transition(
            actor,
            id,
            ComplaintAction::Schedule,
            LifecycleUpdate::Schedule(at),
            json!({ "scheduledAt": at }),
        )
        .await
    }

    pub async fn start(&self, actor: &Principal, id: Uuid) -> Result<Complaint, AppError> {
        self.transition(actor, id, ComplaintAction::Start, LifecycleUpdate::Start, json!({}))
            .await
    }

    pub async fn resolve(&self, actor: &Principal, id: Uuid, notes: &str) -> Result<Complaint, AppError> {
        let notes = notes.trim();
        if notes.is_empty() {
            return Err(AppError::bad_request("Resolution notes are required."));
        }
        self.transition(
            actor,
            id,
            ComplaintAction::Resolve,
            LifecycleUpdate::Resolve(notes),
            json!({ "resolutionNotes": notes }),
        )
        .await
    }

    pub async fn close(&self, actor: &Principal, id: Uuid) -> Result<Complaint, AppError> {
        self.transition(actor, id, ComplaintAction::Close, LifecycleUpdate::Close, json!({}))
            .await
    }

    pub async fn reopen(&self, actor: &Principal, id: Uuid) -> Result<Complaint, AppError> {
        self.transition(actor, id, ComplaintAction::Reopen, LifecycleUpdate::Reopen, json!({}))
            .await
    }

    /// Trava a linha, valida ator e status, grava, audita e notifica na mesma transação.
    async fn transition(
        &self,
        actor: &Principal,
        id: Uuid,
        action: ComplaintAction,
        update: LifecycleUpdate<'_>,
        mut details: serde_json::Value,
    ) -> Result<Complaint, AppError> {
        let mut tx = self.pool.begin().await?;

        let before = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Complaint"))?;

        if !access::may_act_on_complaint(actor, action, &before) {
            tracing::warn!("{} não pode '{}' a reclamação #{}", actor.email, action.as_str(), before.ticket_number);
            return Err(AppError::forbidden(format!(
                "You are not allowed to {} this complaint.",
                action.as_str()
            )));
        }

        let target = before.status.apply(action).ok_or(AppError::InvalidTransition {
            action: action.as_str(),
            status: before.status.as_str().to_string(),
        })?;

        self.repo.apply_lifecycle(&mut *tx, id, update).await?;

        let after = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Complaint"))?;

        if let Some(map) = details.as_object_mut() {
            map.insert("from".into(), json!(before.status.as_str()));
            map.insert("to".into(), json!(target.as_str()));
        }
        self.audit
            .record(&mut *tx, actor, &format!("complaint.{}", action.as_str()), "complaint", Some(id), details)
            .await?;

        let draft = transition_message(action, &after);
        let recipients = transition_recipients(action, &before, &after);
        if action == ComplaintAction::Reopen {
            self.notifications
                .notify_managers(&mut *tx, actor, recipients, draft)
                .await?;
        } else {
            self.notifications.notify(&mut *tx, actor, recipients, draft).await?;
        }

        tx.commit().await?;
        tracing::info!(
            "🔁 Reclamação #{}: {} → {}",
            after.ticket_number,
            before.status.as_str(),
            target.as_str()
        );
        Ok(after)
    }

    pub async fn set_priority(
        &self,
        actor: &Principal,
        id: Uuid,
        priority: ComplaintPriority,
    ) -> Result<Complaint, AppError> {
        let mut tx = self.pool.begin().await?;

        let before = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Complaint"))?;

        if before.status.is_terminal() {
            return Err(AppError::conflict("The priority of a closed complaint cannot be changed."));
        }

        self.repo.set_priority(&mut *tx, id, priority).await?;
        self.audit
            .record(
                &mut *tx,
                actor,
                "complaint.priority",
                "complaint",
                Some(id),
                json!({ "from": before.priority.as_str(), "to": priority.as_str() }),
            )
            .await?;

        let after = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Complaint"))?;
        tx.commit().await?;

        Ok(after)
    }

    // =========================================================================
    //  4. COMENTÁRIOS
    // =========================================================================

    pub async fn list_comments(&self, actor: &Principal, id: Uuid) -> Result<Vec<ComplaintComment>, AppError> {
        self.get(actor, id).await?;
        self.repo.list_comments(id).await
    }

    pub async fn add_comment(
        &self,
        actor: &Principal,
        id: Uuid,
        payload: &CreateCommentPayload,
    ) -> Result<ComplaintComment, AppError> {
        let complaint = self.get(actor, id).await?;

        let mut tx = self.pool.begin().await?;
        let comment = self
            .repo
            .add_comment(&mut *tx, id, actor.kind, actor.id, &actor.full_name, payload.body.trim())
            .await?;

        let draft = NotificationDraft::new(
            format!("New comment on #{}", complaint.ticket_number),
            format!("{}: {}", actor.full_name, comment.body),
        )
        .link("complaint", id);
        self.notifications
            .notify(&mut *tx, actor, comment_recipients(actor, &complaint), draft)
            .await?;

        tx.commit().await?;
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{auth::EmployeeRole, complaint::ComplaintStatus},
        services::notification_service::fan_out,
    };

    fn complaint(raised_by: Recipient, customer_id: Option<Uuid>, assigned_to: Option<Uuid>) -> Complaint {
        Complaint {
            id: Uuid::new_v4(),
            ticket_number: 7,
            unit_id: Uuid::new_v4(),
            unit_number: "B-202".into(),
            customer_id,
            tenant_id: None,
            raised_by_kind: raised_by.kind,
            raised_by_id: raised_by.id,
            category_id: None,
            category_name: None,
            sub_category_id: None,
            sub_category_name: None,
            title: "Lift stuck".into(),
            description: "Between floors".into(),
            priority: ComplaintPriority::High,
            status: ComplaintStatus::Assigned,
            assigned_to,
            assignee_name: Some("Suresh".into()),
            scheduled_at: None,
            resolution_notes: None,
            resolved_at: None,
            closed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn principal(kind: PrincipalKind, id: Uuid, role: Option<EmployeeRole>) -> Principal {
        Principal {
            id,
            kind,
            role,
            unit_id: None,
            full_name: "X".into(),
            email: "x@example.com".into(),
        }
    }

    #[test]
    fn assignment_reaches_assignee_and_complainants() {
        let tenant = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let worker = Uuid::new_v4();
        let c = complaint(Recipient::tenant(tenant), Some(owner), Some(worker));

        let admin = principal(PrincipalKind::Employee, Uuid::new_v4(), Some(EmployeeRole::Admin));
        let out = fan_out(transition_recipients(ComplaintAction::Assign, &c, &c), &admin);

        assert_eq!(
            out,
            vec![Recipient::tenant(tenant), Recipient::customer(owner), Recipient::employee(worker)]
        );
    }

    #[test]
    fn owner_raising_is_not_listed_twice() {
        let owner = Uuid::new_v4();
        let c = complaint(Recipient::customer(owner), Some(owner), None);
        let worker = principal(PrincipalKind::Employee, Uuid::new_v4(), Some(EmployeeRole::Employee));

        let out = fan_out(transition_recipients(ComplaintAction::Start, &c, &c), &worker);
        assert_eq!(out, vec![Recipient::customer(owner)]);
    }

    #[test]
    fn reopen_still_tells_the_previous_assignee() {
        let tenant = Uuid::new_v4();
        let worker = Uuid::new_v4();
        let before = complaint(Recipient::tenant(tenant), None, Some(worker));
        let mut after = before.clone();
        after.assigned_to = None;

        let actor = principal(PrincipalKind::Tenant, tenant, None);
        let out = fan_out(transition_recipients(ComplaintAction::Reopen, &before, &after), &actor);
        assert_eq!(out, vec![Recipient::employee(worker)]);
    }

    #[test]
    fn resident_comment_goes_to_assignee_only() {
        let tenant = Uuid::new_v4();
        let worker = Uuid::new_v4();
        let c = complaint(Recipient::tenant(tenant), Some(Uuid::new_v4()), Some(worker));
        let author = principal(PrincipalKind::Tenant, tenant, None);

        assert_eq!(comment_recipients(&author, &c), vec![Recipient::employee(worker)]);
    }

    #[test]
    fn staff_comment_goes_to_residents() {
        let tenant = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let worker = Uuid::new_v4();
        let c = complaint(Recipient::tenant(tenant), Some(owner), Some(worker));
        let author = principal(PrincipalKind::Employee, worker, Some(EmployeeRole::Employee));

        let out = fan_out(comment_recipients(&author, &c), &author);
        assert_eq!(out, vec![Recipient::tenant(tenant), Recipient::customer(owner)]);
    }

    #[test]
    fn notification_texts_carry_the_ticket() {
        let c = complaint(Recipient::tenant(Uuid::new_v4()), None, None);
        let draft = transition_message(ComplaintAction::Resolve, &c);
        assert_eq!(draft.title, "Complaint #7 resolved");
        assert_eq!(draft.link_type, Some("complaint"));
        assert_eq!(draft.link_id, Some(c.id));
    }
}
