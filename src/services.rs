pub mod access;
pub mod audit_service;
pub mod auth;
pub mod calendar_service;
pub mod complaint_service;
pub mod dashboard_service;
pub mod employee_service;
pub mod internal_complaint_service;
pub mod kyc_service;
pub mod notification_service;
pub mod property_service;
pub mod search_service;
pub mod vehicle_service;

pub use audit_service::AuditService;
pub use auth::AuthService;
pub use calendar_service::CalendarService;
pub use complaint_service::ComplaintService;
pub use dashboard_service::DashboardService;
pub use employee_service::EmployeeService;
pub use internal_complaint_service::InternalComplaintService;
pub use kyc_service::KycService;
pub use notification_service::NotificationService;
pub use property_service::PropertyService;
pub use search_service::SearchService;
pub use vehicle_service::VehicleService;
