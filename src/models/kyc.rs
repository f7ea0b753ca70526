// src/models/kyc.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::auth::PrincipalKind;

// Tamanho máximo de um documento (após decodificar o base64)
pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

pub const OPTIONAL_DOC_TYPES: &[&str] = &["passport", "driving_license", "other"];

/// Conjunto fixo de documentos obrigatórios por tipo de entidade.
pub fn required_doc_types(entity_type: PrincipalKind) -> &'static [&'static str] {
    match entity_type {
        PrincipalKind::Customer => &["aadhaar", "pan", "photo", "sale_agreement"],
        PrincipalKind::Tenant => &["aadhaar", "pan", "photo", "rent_agreement", "police_verification"],
        PrincipalKind::Employee => &["aadhaar", "pan", "photo", "address_proof"],
    }
}

pub fn is_allowed_doc_type(entity_type: PrincipalKind, doc_type: &str) -> bool {
    required_doc_types(entity_type).contains(&doc_type) || OPTIONAL_DOC_TYPES.contains(&doc_type)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "kyc_doc_status")]
pub enum KycDocStatus {
    Pending,
    Verified,
    Rejected,
}

/// Metadados do documento (o blob só sai pelo endpoint de download).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KycDocument {
    pub entity_type: PrincipalKind,
    pub entity_id: Uuid,
    #[schema(example = "aadhaar")]
    pub doc_type: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub status: KycDocStatus,
    pub remarks: Option<String>,
    pub uploaded_by: Uuid,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct KycFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum KycCompletion {
    NotStarted,
    Incomplete,
    PendingVerification,
    Complete,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KycSummary {
    pub entity_type: PrincipalKind,
    pub entity_id: Uuid,
    pub status: KycCompletion,
    pub required: Vec<String>,
    pub missing: Vec<String>,
    pub rejected: Vec<String>,
    pub pending: Vec<String>,
    pub documents: Vec<KycDocument>,
}

impl KycSummary {
    pub fn build(entity_type: PrincipalKind, entity_id: Uuid, documents: Vec<KycDocument>) -> Self {
        let required = required_doc_types(entity_type);

        let status_of = |doc_type: &str| {
            documents
                .iter()
                .find(|d| d.doc_type == doc_type)
                .map(|d| d.status)
        };

        let mut missing = Vec::new();
        let mut rejected = Vec::new();
        let mut pending = Vec::new();

        for doc_type in required {
            match status_of(doc_type) {
                None => missing.push(doc_type.to_string()),
                Some(KycDocStatus::Rejected) => rejected.push(doc_type.to_string()),
                Some(KycDocStatus::Pending) => pending.push(doc_type.to_string()),
                Some(KycDocStatus::Verified) => {}
            }
        }

        let status = if documents.is_empty() {
            KycCompletion::NotStarted
        } else if !missing.is_empty() || !rejected.is_empty() {
            KycCompletion::Incomplete
        } else if !pending.is_empty() {
            KycCompletion::PendingVerification
        } else {
            KycCompletion::Complete
        };

        Self {
            entity_type,
            entity_id,
            status,
            required: required.iter().map(|s| s.to_string()).collect(),
            missing,
            rejected,
            pending,
            documents,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadKycPayload {
    #[validate(
        length(min = 1, max = 255, message = "File name is required."),
        custom(function = "no_control_chars")
    )]
    #[schema(example = "aadhaar-front.pdf")]
    pub file_name: String,
    #[validate(
        length(min = 3, max = 100, message = "Content type is required."),
        custom(function = "no_control_chars")
    )]
    #[schema(example = "application/pdf")]
    pub content_type: String,
    /// Conteúdo do arquivo em base64
    #[validate(length(min = 1, message = "Document data is required."))]
    pub data: String,
}

// Nome e tipo voltam como headers no download
fn no_control_chars(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(char::is_control) {
        let mut err = ValidationError::new("control_chars");
        err.message = Some("Control characters are not allowed.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyKycPayload {
    pub status: KycDocStatus,
    #[validate(length(max = 500, message = "Remarks are too long."))]
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct KycPendingQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(entity_type: PrincipalKind, doc_type: &str, status: KycDocStatus) -> KycDocument {
        KycDocument {
            entity_type,
            entity_id: Uuid::nil(),
            doc_type: doc_type.into(),
            file_name: format!("{}.pdf", doc_type),
            content_type: "application/pdf".into(),
            size_bytes: 10,
            status,
            remarks: None,
            uploaded_by: Uuid::nil(),
            verified_by: None,
            verified_at: None,
            uploaded_at: Utc::now(),
        }
    }

    fn all_required(entity_type: PrincipalKind, status: KycDocStatus) -> Vec<KycDocument> {
        required_doc_types(entity_type)
            .iter()
            .map(|t| doc(entity_type, t, status))
            .collect()
    }

    #[test]
    fn nothing_uploaded_is_not_started() {
        let summary = KycSummary::build(PrincipalKind::Customer, Uuid::nil(), vec![]);
        assert_eq!(summary.status, KycCompletion::NotStarted);
        assert_eq!(summary.missing.len(), 4);
    }

    #[test]
    fn missing_required_doc_is_incomplete() {
        let docs = vec![
            doc(PrincipalKind::Tenant, "aadhaar", KycDocStatus::Verified),
            doc(PrincipalKind::Tenant, "passport", KycDocStatus::Verified),
        ];
        let summary = KycSummary::build(PrincipalKind::Tenant, Uuid::nil(), docs);
        assert_eq!(summary.status, KycCompletion::Incomplete);
        assert_eq!(summary.missing, vec!["pan", "photo", "rent_agreement", "police_verification"]);
    }

    #[test]
    fn rejected_required_doc_is_incomplete() {
        let mut docs = all_required(PrincipalKind::Employee, KycDocStatus::Verified);
        docs[1].status = KycDocStatus::Rejected;
        let summary = KycSummary::build(PrincipalKind::Employee, Uuid::nil(), docs);
        assert_eq!(summary.status, KycCompletion::Incomplete);
        assert_eq!(summary.rejected, vec!["pan"]);
    }

    #[test]
    fn all_present_but_pending() {
        let mut docs = all_required(PrincipalKind::Customer, KycDocStatus::Verified);
        docs[0].status = KycDocStatus::Pending;
        let summary = KycSummary::build(PrincipalKind::Customer, Uuid::nil(), docs);
        assert_eq!(summary.status, KycCompletion::PendingVerification);
        assert_eq!(summary.pending, vec!["aadhaar"]);
    }

    #[test]
    fn all_verified_is_complete() {
        let docs = all_required(PrincipalKind::Tenant, KycDocStatus::Verified);
        let summary = KycSummary::build(PrincipalKind::Tenant, Uuid::nil(), docs);
        assert_eq!(summary.status, KycCompletion::Complete);
        assert!(summary.missing.is_empty());
    }

    #[test]
    fn optional_docs_do_not_count_towards_completion() {
        let mut docs = all_required(PrincipalKind::Customer, KycDocStatus::Verified);
        docs.push(doc(PrincipalKind::Customer, "other", KycDocStatus::Rejected));
        let summary = KycSummary::build(PrincipalKind::Customer, Uuid::nil(), docs);
        assert_eq!(summary.status, KycCompletion::Complete);
    }

    #[test]
    fn doc_type_whitelist_depends_on_entity() {
        assert!(is_allowed_doc_type(PrincipalKind::Customer, "sale_agreement"));
        assert!(!is_allowed_doc_type(PrincipalKind::Customer, "rent_agreement"));
        assert!(is_allowed_doc_type(PrincipalKind::Tenant, "police_verification"));
        assert!(is_allowed_doc_type(PrincipalKind::Employee, "passport"));
        assert!(!is_allowed_doc_type(PrincipalKind::Employee, "selfie"));
    }

    fn upload(file_name: &str, content_type: &str) -> UploadKycPayload {
        UploadKycPayload {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: "aGVsbG8=".into(),
        }
    }

    #[test]
    fn upload_rejects_control_characters() {
        assert!(upload("aadhaar-front.pdf", "application/pdf").validate().is_ok());
        assert!(upload("pan card (1).pdf", "image/jpeg").validate().is_ok());

        let errors = upload("evil\r\nSet-Cookie: x.pdf", "application/pdf").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("file_name"));

        let errors = upload("ok.pdf", "application/pdf\n").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("content_type"));

        assert!(upload("tab\there.pdf", "application/pdf").validate().is_err());
    }
}
