//src/lib.rs

// MotoTrack: base local de estabelecimentos, entregadores e entregas.

pub mod common;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

pub use common::error::AppError;
pub use config::{AppConfig, AppState};
