pub mod auth;
pub mod backup;
pub mod dashboard;
pub mod deliverer;
pub mod delivery;
pub mod establishment;
