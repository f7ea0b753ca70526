pub mod user_repo;
pub use user_repo::UserRepository;
pub mod property_repo;
pub use property_repo::PropertyRepository;
pub mod employee_repo;
pub use employee_repo::EmployeeRepository;
pub mod complaint_repo;
pub use complaint_repo::ComplaintRepository;
pub mod internal_complaint_repo;
pub use internal_complaint_repo::InternalComplaintRepository;
pub mod kyc_repo;
pub use kyc_repo::KycRepository;
pub mod vehicle_repo;
pub use vehicle_repo::VehicleRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;
pub mod audit_repo;
pub use audit_repo::AuditRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod calendar_repo;
pub use calendar_repo::CalendarRepository;
pub mod search_repo;
pub use search_repo::SearchRepository;
