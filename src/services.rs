pub mod auth;
pub use auth::AuthService;
pub mod deliverer_service;
pub use deliverer_service::DelivererService;
pub mod delivery_service;
pub use delivery_service::DeliveryService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
pub mod backup_service;
pub use backup_service::BackupService;
