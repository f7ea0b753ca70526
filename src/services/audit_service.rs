// src/services/audit_service.rs

use crate::{
    common::{
        error::AppError,
        pagination::{PageRequest, PageResponse},
    },
    db::AuditRepository,
    models::notification::{AuditLog, AuditQuery},
};

#[derive(Clone)]
pub struct AuditService {
    repo: AuditRepository,
}

impl AuditService {
    pub fn new(repo: AuditRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, query: &AuditQuery) -> Result<PageResponse<AuditLog>, AppError> {
        let page = PageRequest::new(query.page, query.per_page);
        let entity_type = query
            .entity_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let (logs, total) = self.repo.list(entity_type, query.entity_id, page).await?;
        Ok(PageResponse::new(logs, page, total))
    }
}
