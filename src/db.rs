pub mod database;
pub use database::Database;
pub mod storage;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub mod seed;

pub mod establishment_repo;
pub mod deliverer_repo;
pub mod delivery_repo;
pub mod backup_repo;
pub mod settings_repo;
