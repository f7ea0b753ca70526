// src/services/notification_service.rs

use std::collections::HashSet;

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{PageRequest, PageResponse},
    },
    db::{EmployeeRepository, NotificationRepository},
    models::{
        auth::Principal,
        notification::{MarkedRead, Notification, NotificationDraft, Recipient, UnreadCount},
    },
};

/// Remove duplicados (mantendo a ordem) e nunca avisa quem fez a ação.
pub fn fan_out<I>(recipients: I, actor: &Principal) -> Vec<Recipient>
where
    I: IntoIterator<Item = Recipient>,
{
    let actor = Recipient::from(actor);
    let mut seen = HashSet::new();

    recipients
        .into_iter()
        .filter(|r| *r != actor)
        .filter(|r| seen.insert(*r))
        .collect()
}

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
    employee_repo: EmployeeRepository,
}

impl NotificationService {
    pub fn new(repo: NotificationRepository, employee_repo: EmployeeRepository) -> Self {
        Self { repo, employee_repo }
    }

    /// Grava os avisos dentro da transação de quem chamou.
    pub async fn notify<I>(
        &self,
        conn: &mut PgConnection,
        actor: &Principal,
        recipients: I,
        draft: NotificationDraft,
    ) -> Result<u64, AppError>
    where
        I: IntoIterator<Item = Recipient>,
    {
        let recipients = fan_out(recipients, actor);
        self.repo.insert_many(&mut *conn, &recipients, &draft).await
    }

    /// Todos os gestores ativos, mais os destinatários extras.
    pub async fn notify_managers<I>(
        &self,
        conn: &mut PgConnection,
        actor: &Principal,
        extra: I,
        draft: NotificationDraft,
    ) -> Result<u64, AppError>
    where
        I: IntoIterator<Item = Recipient>,
    {
        let managers = self.employee_repo.list_manager_ids(&mut *conn).await?;
        let recipients = managers
            .into_iter()
            .map(Recipient::employee)
            .chain(extra)
            .collect::<Vec<_>>();
        self.notify(conn, actor, recipients, draft).await
    }

    pub async fn list(
        &self,
        principal: &Principal,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<PageResponse<Notification>, AppError> {
        let (items, total) = self.repo.list_for(principal.into(), unread_only, page).await?;
        Ok(PageResponse::new(items, page, total))
    }

    pub async fn unread_count(&self, principal: &Principal) -> Result<UnreadCount, AppError> {
        let unread = self.repo.unread_count(principal.into()).await?;
        Ok(UnreadCount { unread })
    }

    /// Notificação de outra pessoa responde 404, como se não existisse.
    pub async fn mark_read(&self, principal: &Principal, id: Uuid) -> Result<Notification, AppError> {
        self.repo
            .mark_read(principal.into(), id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification"))
    }

    pub async fn mark_all_read(&self, principal: &Principal) -> Result<MarkedRead, AppError> {
        let updated = self.repo.mark_all_read(principal.into()).await?;
        Ok(MarkedRead { updated })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::{EmployeeRole, PrincipalKind};

    fn employee(id: Uuid) -> Principal {
        Principal {
            id,
            kind: PrincipalKind::Employee,
            role: Some(EmployeeRole::Admin),
            unit_id: None,
            full_name: "Admin".into(),
            email: "admin@example.com".into(),
        }
    }

    #[test]
    fn actor_is_never_notified() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let out = fan_out(
            vec![Recipient::employee(me), Recipient::employee(other)],
            &employee(me),
        );
        assert_eq!(out, vec![Recipient::employee(other)]);
    }

    #[test]
    fn duplicates_are_collapsed_in_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let out = fan_out(
            vec![
                Recipient::employee(a),
                Recipient::customer(b),
                Recipient::employee(a),
                Recipient::customer(b),
            ],
            &employee(Uuid::new_v4()),
        );
        assert_eq!(out, vec![Recipient::employee(a), Recipient::customer(b)]);
    }

    #[test]
    fn same_id_with_other_kind_is_a_different_recipient() {
        let id = Uuid::new_v4();
        let out = fan_out(
            vec![Recipient::customer(id), Recipient::employee(id)],
            &employee(id),
        );
        assert_eq!(out, vec![Recipient::customer(id)]);
    }

    #[test]
    fn nobody_left_means_nothing_to_send() {
        let me = Uuid::new_v4();
        assert!(fan_out(vec![Recipient::employee(me)], &employee(me)).is_empty());
    }
}
