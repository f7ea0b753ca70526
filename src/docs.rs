// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Emperium City Grievance API",
        description = "Reclamações, moradores, funcionários e KYC do condomínio"
    ),
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::change_password,

        // --- Units ---
        handlers::property::list_units,
        handlers::property::create_unit,
        handlers::property::get_unit,
        handlers::property::update_unit,
        handlers::property::delete_unit,
        handlers::property::unit_history,

        // --- Residents ---
        handlers::property::list_customers,
        handlers::property::create_customer,
        handlers::property::get_customer,
        handlers::property::update_customer,
        handlers::property::delete_customer,
        handlers::property::list_tenants,
        handlers::property::create_tenant,
        handlers::property::get_tenant,
        handlers::property::update_tenant,
        handlers::property::delete_tenant,

        // --- Employees ---
        handlers::employee::list_employees,
        handlers::employee::create_employee,
        handlers::employee::get_employee,
        handlers::employee::update_employee,
        handlers::employee::delete_employee,
        handlers::employee::apply_leave,
        handlers::employee::list_leaves,
        handlers::employee::review_leave,
        handlers::employee::cancel_leave,

        // --- Complaints ---
        handlers::complaint::list_categories,
        handlers::complaint::create_category,
        handlers::complaint::create_sub_category,
        handlers::complaint::create_complaint,
        handlers::complaint::list_complaints,
        handlers::complaint::get_complaint,
        handlers::complaint::assign_complaint,
        handlers::complaint::schedule_complaint,
        handlers::complaint::start_complaint,
        handlers::complaint::resolve_complaint,
        handlers::complaint::close_complaint,
        handlers::complaint::reopen_complaint,
        handlers::complaint::update_priority,
        handlers::complaint::list_comments,
        handlers::complaint::add_comment,

        // --- Internal complaints ---
        handlers::internal_complaint::create_internal_complaint,
        handlers::internal_complaint::list_internal_complaints,
        handlers::internal_complaint::get_internal_complaint,
        handlers::internal_complaint::assign_internal_complaint,
        handlers::internal_complaint::update_internal_status,

        // --- KYC ---
        handlers::kyc::list_pending,
        handlers::kyc::get_summary,
        handlers::kyc::upload_document,
        handlers::kyc::download_document,
        handlers::kyc::verify_document,
        handlers::kyc::delete_document,

        // --- Vehicles ---
        handlers::vehicle::list_vehicles,
        handlers::vehicle::create_vehicle,
        handlers::vehicle::get_vehicle,
        handlers::vehicle::update_vehicle,
        handlers::vehicle::delete_vehicle,

        // --- Notifications ---
        handlers::notification::list_notifications,
        handlers::notification::unread_count,
        handlers::notification::mark_read,
        handlers::notification::mark_all_read,

        // --- Dashboard, Calendar, Search, Audit ---
        handlers::dashboard::get_stats,
        handlers::dashboard::get_recent_activity,
        handlers::calendar::list_events,
        handlers::search::global_search,
        handlers::audit::list_audit_logs,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::PrincipalKind,
            models::auth::EmployeeRole,
            models::auth::Principal,
            models::auth::LoginPayload,
            models::auth::ChangePasswordPayload,
            models::auth::AuthResponse,

            // --- Property ---
            models::property::UnitParticulars,
            models::property::Unit,
            models::property::UnitDetail,
            models::property::PropertyHistory,
            models::property::Customer,
            models::property::Tenant,

            // --- Employees ---
            models::employee::Employee,
            models::employee::LeaveStatus,
            models::employee::EmployeeLeave,

            // --- Complaints ---
            models::complaint::ComplaintStatus,
            models::complaint::ComplaintPriority,
            models::complaint::Complaint,
            models::complaint::ComplaintComment,
            models::complaint::CategoryWithSubCategories,
            models::complaint::InternalComplaint,

            // --- KYC ---
            models::kyc::KycDocStatus,
            models::kyc::KycCompletion,
            models::kyc::KycDocument,
            models::kyc::KycSummary,

            // --- Vehicles ---
            models::vehicle::VehicleType,
            models::vehicle::Vehicle,

            // --- Notifications / Audit ---
            models::notification::Notification,
            models::notification::UnreadCount,
            models::notification::MarkedRead,
            models::notification::AuditLog,

            // --- Dashboard / Calendar / Search ---
            models::dashboard::StatusCount,
            models::dashboard::DashboardStats,
            models::calendar::CalendarEvent,
            models::search::SearchResults,
        )
    ),
    tags(
        (name = "Auth", description = "Login e dados do usuário"),
        (name = "Units", description = "Unidades e histórico do imóvel"),
        (name = "Customers", description = "Proprietários"),
        (name = "Tenants", description = "Inquilinos"),
        (name = "Employees", description = "Equipe da administração"),
        (name = "Leaves", description = "Pedidos de férias e folgas"),
        (name = "Complaints", description = "Reclamações dos moradores"),
        (name = "Complaint lifecycle", description = "Transições de status das reclamações"),
        (name = "Internal complaints", description = "Reclamações internas da equipe"),
        (name = "KYC", description = "Documentos de identificação"),
        (name = "Vehicles", description = "Veículos cadastrados"),
        (name = "Notifications", description = "Notificações do usuário"),
        (name = "Dashboard", description = "Indicadores"),
        (name = "Calendar", description = "Agenda de visitas e férias"),
        (name = "Search", description = "Busca global"),
        (name = "Audit", description = "Trilha de auditoria")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_registers_bearer_scheme_and_routes() {
        let doc = ApiDoc::openapi();

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));

        assert!(doc.paths.paths.contains_key("/api/complaints/{id}/resolve"));
        assert!(doc.paths.paths.contains_key("/api/kyc/{entityType}/{entityId}/{docType}/file"));
    }
}
