// src/services/dashboard_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{AuditRepository, DashboardRepository, NotificationRepository},
    models::{
        auth::Principal,
        dashboard::{DashboardStats, ResidentDashboard},
        notification::AuditLog,
    },
};

pub const DEFAULT_ACTIVITY_LIMIT: i64 = 20;
pub const MAX_ACTIVITY_LIMIT: i64 = 100;

pub fn activity_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .clamp(1, MAX_ACTIVITY_LIMIT)
}

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    audit: AuditRepository,
    notification_repo: NotificationRepository,
    pool: PgPool,
}

impl DashboardService {
    pub fn new(
        repo: DashboardRepository,
        audit: AuditRepository,
        notification_repo: NotificationRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            audit,
            notification_repo,
            pool,
        }
    }

    pub async fn stats(&self, actor: &Principal) -> Result<DashboardStats, AppError> {
        if actor.is_staff() {
            // Funcionário comum recebe também o total das próprias tarefas
            let employee_id = (!actor.is_manager()).then_some(actor.id);
            let summary = self.repo.staff_summary(&self.pool, employee_id).await?;
            return Ok(DashboardStats::Staff(summary));
        }

        let complaints_by_status = self
            .repo
            .resident_complaints_by_status(actor.kind, actor.id, actor.unit_id)
            .await?;
        let total_complaints = complaints_by_status.iter().map(|s| s.count).sum();
        let unread_notifications = self.notification_repo.unread_count(actor.into()).await?;

        Ok(DashboardStats::Resident(ResidentDashboard {
            complaints_by_status,
            total_complaints,
            unread_notifications,
        }))
    }

    pub async fn recent_activity(&self, limit: Option<i64>) -> Result<Vec<AuditLog>, AppError> {
        self.audit.recent(activity_limit(limit)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_limit_defaults_and_clamps() {
        assert_eq!(activity_limit(None), 20);
        assert_eq!(activity_limit(Some(0)), 1);
        assert_eq!(activity_limit(Some(-5)), 1);
        assert_eq!(activity_limit(Some(55)), 55);
        assert_eq!(activity_limit(Some(1000)), 100);
    }
}
