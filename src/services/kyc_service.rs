// src/services/kyc_service.rs

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{PageRequest, PageResponse},
    },
    db::{kyc_repo::NewKycDocument, AuditRepository, EmployeeRepository, KycRepository, PropertyRepository},
    models::{
        auth::{Principal, PrincipalKind},
        kyc::{
            is_allowed_doc_type, KycDocStatus, KycDocument, KycFile, KycPendingQuery, KycSummary,
            UploadKycPayload, VerifyKycPayload, MAX_DOCUMENT_BYTES,
        },
        notification::{NotificationDraft, Recipient},
    },
    services::{
        access::{self, KycAccess},
        notification_service::NotificationService,
    },
};

/// Segmento `{entityType}` da rota.
pub fn parse_entity_type(raw: &str) -> Result<PrincipalKind, AppError> {
    match raw {
        "customer" => Ok(PrincipalKind::Customer),
        "tenant" => Ok(PrincipalKind::Tenant),
        "employee" => Ok(PrincipalKind::Employee),
        other => Err(AppError::bad_request(format!("Unknown entity type '{}'.", other))),
    }
}

pub fn check_doc_type(entity_type: PrincipalKind, doc_type: &str) -> Result<(), AppError> {
    if is_allowed_doc_type(entity_type, doc_type) {
        Ok(())
    } else {
        Err(AppError::bad_request(format!(
            "Document type '{}' is not accepted for a {}.",
            doc_type,
            entity_type.as_str()
        )))
    }
}

/// Decodifica o base64 (aceita o prefixo `data:...;base64,`) e aplica os limites.
pub fn decode_document(data: &str) -> Result<Vec<u8>, AppError> {
    let encoded = match data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };
    let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|_| AppError::bad_request("Document data is not valid base64."))?;

    if bytes.is_empty() {
        return Err(AppError::bad_request("Document data is empty."));
    }
    if bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(AppError::bad_request("Document is larger than 5 MiB."));
    }
    Ok(bytes)
}

#[derive(Clone)]
pub struct KycService {
    repo: KycRepository,
    property_repo: PropertyRepository,
    employee_repo: EmployeeRepository,
    audit: AuditRepository,
    notifications: NotificationService,
    pool: PgPool,
}

impl KycService {
    pub fn new(
        repo: KycRepository,
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

    /// Confere se a entidade existe e devolve a unidade (só para inquilinos).
    async fn entity_unit(
        &self,
        conn: &mut PgConnection,
        entity_type: PrincipalKind,
        entity_id: Uuid,
    ) -> Result<Option<Uuid>, AppError> {
        match entity_type {
            PrincipalKind::Customer => {
                self.property_repo
                    .find_customer(&mut *conn, entity_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Customer"))?;
                Ok(None)
            }
            PrincipalKind::Tenant => {
                let tenant = self
                    .property_repo
                    .find_tenant(&mut *conn, entity_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Tenant"))?;
                Ok(Some(tenant.unit_id))
            }
            PrincipalKind::Employee => {
                self.employee_repo
                    .find_by_id(&mut *conn, entity_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Employee"))?;
                Ok(None)
            }
        }
    }

    async fn authorize(
        &self,
        conn: &mut PgConnection,
        actor: &Principal,
        entity_type: PrincipalKind,
        entity_id: Uuid,
        needed: KycAccess,
    ) -> Result<(), AppError> {
        let unit = self.entity_unit(conn, entity_type, entity_id).await?;
        if access::kyc_access(actor, entity_type, entity_id, unit) < needed {
            tracing::warn!("{} sem acesso ao KYC de {} {}", actor.email, entity_type.as_str(), entity_id);
            return Err(AppError::forbidden("You cannot access these KYC documents."));
        }
        Ok(())
    }

    pub async fn summary(
        &self,
        actor: &Principal,
        entity_type: PrincipalKind,
        entity_id: Uuid,
    ) -> Result<KycSummary, AppError> {
        let mut conn = self.pool.acquire().await?;
        self.authorize(&mut conn, actor, entity_type, entity_id, KycAccess::Read)
            .await?;

        let documents = self.repo.list_for_entity(entity_type, entity_id).await?;
        Ok(KycSummary::build(entity_type, entity_id, documents))
    }

    pub async fn upload(
        &self,
        actor: &Principal,
        entity_type: PrincipalKind,
        entity_id: Uuid,
        doc_type: &str,
        payload: &UploadKycPayload,
    ) -> Result<KycDocument, AppError> {
        check_doc_type(entity_type, doc_type)?;
        let data = decode_document(&payload.data)?;

        let mut tx = self.pool.begin().await?;
        self.authorize(&mut tx, actor, entity_type, entity_id, KycAccess::Write)
            .await?;

        let document = self
            .repo
            .upsert(
                &mut *tx,
                NewKycDocument {
                    entity_type,
                    entity_id,
                    doc_type,
                    file_name: payload.file_name.trim(),
                    content_type: payload.content_type.trim(),
                    data: &data,
                    uploaded_by: actor.id,
                },
            )
            .await?;

        self.audit
            .record(
                &mut *tx,
                actor,
                "kyc.uploaded",
                entity_type.as_str(),
                Some(entity_id),
                json!({ "docType": doc_type, "sizeBytes": document.size_bytes }),
            )
            .await?;
        tx.commit().await?;

        tracing::info!("📎 KYC '{}' enviado para {} {}", doc_type, entity_type.as_str(), entity_id);
        Ok(document)
    }

    pub async fn file(
        &self,
        actor: &Principal,
        entity_type: PrincipalKind,
        entity_id: Uuid,
        doc_type: &str,
    ) -> Result<KycFile, AppError> {
        check_doc_type(entity_type, doc_type)?;

        let mut conn = self.pool.acquire().await?;
        self.authorize(&mut conn, actor, entity_type, entity_id, KycAccess::Read)
            .await?;

        self.repo
            .find_file(entity_type, entity_id, doc_type)
            .await?
            .ok_or_else(|| AppError::not_found("Document"))
    }

    pub async fn verify(
        &self,
        actor: &Principal,
        entity_type: PrincipalKind,
        entity_id: Uuid,
        doc_type: &str,
        payload: &VerifyKycPayload,
    ) -> Result<KycDocument, AppError> {
        check_doc_type(entity_type, doc_type)?;
        if payload.status == KycDocStatus::Pending {
            return Err(AppError::bad_request("A verification must mark the document Verified or Rejected."));
        }

        let mut tx = self.pool.begin().await?;

        self.repo
            .find(&mut *tx, entity_type, entity_id, doc_type)
            .await?
            .ok_or_else(|| AppError::not_found("Document"))?;

        let remarks = payload.remarks.as_deref().map(str::trim).filter(|r| !r.is_empty());
        let document = self
            .repo
            .verify(&mut *tx, entity_type, entity_id, doc_type, payload.status, remarks, actor.id)
            .await?;

        self.audit
            .record(
                &mut *tx,
                actor,
                "kyc.verified",
                entity_type.as_str(),
                Some(entity_id),
                json!({ "docType": doc_type, "status": payload.status }),
            )
            .await?;

        let verdict = match payload.status {
            KycDocStatus::Verified => "verified",
            _ => "rejected",
        };
        let message = match remarks {
            Some(r) => format!("Your '{}' document was {}: {}", doc_type, verdict, r),
            None => format!("Your '{}' document was {}.", doc_type, verdict),
        };
        let draft = NotificationDraft::new(format!("KYC document {}", verdict), message).link("kyc", entity_id);
        self.notifications
            .notify(&mut *tx, actor, [Recipient::new(entity_type, entity_id)], draft)
            .await?;

        tx.commit().await?;
        Ok(document)
    }

    pub async fn delete(
        &self,
        actor: &Principal,
        entity_type: PrincipalKind,
        entity_id: Uuid,
        doc_type: &str,
    ) -> Result<(), AppError> {
        check_doc_type(entity_type, doc_type)?;

        let mut tx = self.pool.begin().await?;
        self.authorize(&mut tx, actor, entity_type, entity_id, KycAccess::Write)
            .await?;

        let document = self
            .repo
            .find(&mut *tx, entity_type, entity_id, doc_type)
            .await?
            .ok_or_else(|| AppError::not_found("Document"))?;

        if document.status == KycDocStatus::Verified && !actor.is_manager() {
            return Err(AppError::forbidden("Verified documents can only be removed by a manager."));
        }

        self.repo.delete(&mut *tx, entity_type, entity_id, doc_type).await?;
        self.audit
            .record(
                &mut *tx,
                actor,
                "kyc.deleted",
                entity_type.as_str(),
                Some(entity_id),
                json!({ "docType": doc_type }),
            )
            .await?;
        tx.commit().await?;

        Ok(())
    }

    pub async fn pending(&self, query: &KycPendingQuery) -> Result<PageResponse<KycDocument>, AppError> {
        let page = PageRequest::new(query.page, query.per_page);
        let (documents, total) = self.repo.list_pending(page).await?;
        Ok(PageResponse::new(documents, page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_types_parse_from_path() {
        assert_eq!(parse_entity_type("tenant").unwrap(), PrincipalKind::Tenant);
        assert!(matches!(parse_entity_type("vendor"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn unknown_doc_type_is_bad_request() {
        assert!(check_doc_type(PrincipalKind::Customer, "aadhaar").is_ok());
        assert!(matches!(
            check_doc_type(PrincipalKind::Customer, "police_verification"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn decodes_plain_and_data_url_base64() {
        assert_eq!(decode_document("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode_document("data:text/plain;base64,aGVs\nbG8=").unwrap(), b"hello");
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert!(matches!(decode_document(""), Err(AppError::BadRequest(_))));
        assert!(matches!(decode_document("***"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn rejects_oversized_documents() {
        let big = STANDARD.encode(vec![0u8; MAX_DOCUMENT_BYTES + 1]);
        assert!(matches!(decode_document(&big), Err(AppError::BadRequest(_))));

        let limit = STANDARD.encode(vec![0u8; MAX_DOCUMENT_BYTES]);
        assert_eq!(decode_document(&limit).unwrap().len(), MAX_DOCUMENT_BYTES);
    }
}
