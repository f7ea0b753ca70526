// src/handlers/kyc.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::PageResponse},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{Managers, RequireRole},
    },
    models::kyc::{KycDocument, KycPendingQuery, KycSummary, UploadKycPayload, VerifyKycPayload},
    services::kyc_service::parse_entity_type,
};

// GET /api/kyc/pending
#[utoipa::path(
    get,
    path = "/api/kyc/pending",
    tag = "KYC",
    params(KycPendingQuery),
    responses((status = 200, description = "Documentos aguardando verificação", body = PageResponse<KycDocument>)),
    security(("api_jwt" = []))
)]
pub async fn list_pending(
    State(app_state): State<AppState>,
    _manager: RequireRole<Managers>,
    Query(query): Query<KycPendingQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.kyc_service.pending(&query).await?;
    Ok((StatusCode::OK, Json(page)))
}

// GET /api/kyc/{entityType}/{entityId}
#[utoipa::path(
    get,
    path = "/api/kyc/{entityType}/{entityId}",
    tag = "KYC",
    params(
        ("entityType" = String, Path, description = "customer | tenant | employee"),
        ("entityId" = Uuid, Path, description = "ID da entidade")
    ),
    responses(
        (status = 200, description = "Resumo do KYC", body = KycSummary),
        (status = 403, description = "Sem acesso"),
        (status = 404, description = "Entidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path((entity_type, entity_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let entity_type = parse_entity_type(&entity_type)?;

    let summary = app_state
        .kyc_service
        .summary(&principal, entity_type, entity_id)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}

// PUT /api/kyc/{entityType}/{entityId}/{docType}
#[utoipa::path(
    put,
    path = "/api/kyc/{entityType}/{entityId}/{docType}",
    tag = "KYC",
    params(
        ("entityType" = String, Path, description = "customer | tenant | employee"),
        ("entityId" = Uuid, Path, description = "ID da entidade"),
        ("docType" = String, Path, description = "Tipo do documento")
    ),
    request_body = UploadKycPayload,
    responses(
        (status = 200, description = "Documento enviado (volta para pendente)", body = KycDocument),
        (status = 400, description = "Tipo ou conteúdo inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_document(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path((entity_type, entity_id, doc_type)): Path<(String, Uuid, String)>,
    Json(payload): Json<UploadKycPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let entity_type = parse_entity_type(&entity_type)?;

    let document = app_state
        .kyc_service
        .upload(&principal, entity_type, entity_id, &doc_type, &payload)
        .await?;

    Ok((StatusCode::OK, Json(document)))
}

// GET /api/kyc/{entityType}/{entityId}/{docType}/file
#[utoipa::path(
    get,
    path = "/api/kyc/{entityType}/{entityId}/{docType}/file",
    tag = "KYC",
    params(
        ("entityType" = String, Path, description = "customer | tenant | employee"),
        ("entityId" = Uuid, Path, description = "ID da entidade"),
        ("docType" = String, Path, description = "Tipo do documento")
    ),
    responses(
        (status = 200, description = "Conteúdo do documento", content_type = "application/octet-stream"),
        (status = 404, description = "Documento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_document(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path((entity_type, entity_id, doc_type)): Path<(String, Uuid, String)>,
) -> Result<Response, AppError> {
    let entity_type = parse_entity_type(&entity_type)?;

    let file = app_state
        .kyc_service
        .file(&principal, entity_type, entity_id, &doc_type)
        .await?;

    Ok((download_headers(&file.file_name, &file.content_type), file.data).into_response())
}

/// Sempre como anexo. Aspas e caracteres de controle saem do nome; tipo
/// inválido cai para octet-stream.
fn download_headers(file_name: &str, content_type: &str) -> [(HeaderName, HeaderValue); 2] {
    let safe_name: String = file_name
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect();

    let content_type = HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", safe_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    [
        (header::CONTENT_TYPE, content_type),
        (header::CONTENT_DISPOSITION, disposition),
    ]
}

// PUT /api/kyc/{entityType}/{entityId}/{docType}/verify
#[utoipa::path(
    put,
    path = "/api/kyc/{entityType}/{entityId}/{docType}/verify",
    tag = "KYC",
    params(
        ("entityType" = String, Path, description = "customer | tenant | employee"),
        ("entityId" = Uuid, Path, description = "ID da entidade"),
        ("docType" = String, Path, description = "Tipo do documento")
    ),
    request_body = VerifyKycPayload,
    responses(
        (status = 200, description = "Documento verificado ou rejeitado", body = KycDocument),
        (status = 400, description = "Status inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn verify_document(
    State(app_state): State<AppState>,
    manager: RequireRole<Managers>,
    Path((entity_type, entity_id, doc_type)): Path<(String, Uuid, String)>,
    Json(payload): Json<VerifyKycPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let entity_type = parse_entity_type(&entity_type)?;

    let document = app_state
        .kyc_service
        .verify(&manager.0, entity_type, entity_id, &doc_type, &payload)
        .await?;

    Ok((StatusCode::OK, Json(document)))
}

// DELETE /api/kyc/{entityType}/{entityId}/{docType}
#[utoipa::path(
    delete,
    path = "/api/kyc/{entityType}/{entityId}/{docType}",
    tag = "KYC",
    params(
        ("entityType" = String, Path, description = "customer | tenant | employee"),
        ("entityId" = Uuid, Path, description = "ID da entidade"),
        ("docType" = String, Path, description = "Tipo do documento")
    ),
    responses(
        (status = 204, description = "Documento removido"),
        (status = 403, description = "Documento verificado só pode ser removido pela gerência")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_document(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path((entity_type, entity_id, doc_type)): Path<(String, Uuid, String)>,
) -> Result<impl IntoResponse, AppError> {
    let entity_type = parse_entity_type(&entity_type)?;

    app_state
        .kyc_service
        .delete(&principal, entity_type, entity_id, &doc_type)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_map(file_name: &str, content_type: &str) -> Vec<(HeaderName, String)> {
        download_headers(file_name, content_type)
            .into_iter()
            .map(|(name, value)| (name, value.to_str().unwrap_or_default().to_string()))
            .collect()
    }

    #[test]
    fn download_is_always_an_attachment() {
        let headers = header_map("aadhaar-front.pdf", "application/pdf");
        assert_eq!(headers[0], (header::CONTENT_TYPE, "application/pdf".to_string()));
        assert_eq!(
            headers[1],
            (header::CONTENT_DISPOSITION, "attachment; filename=\"aadhaar-front.pdf\"".to_string())
        );
    }

    #[test]
    fn stored_control_characters_do_not_break_the_response() {
        let headers = header_map("bad\r\n\"name\".pdf", "text/plain\n");
        assert_eq!(headers[0].1, "application/octet-stream");
        assert_eq!(headers[1].1, "attachment; filename=\"badname.pdf\"");
    }
}
