// src/models/backup.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{deliverer::Deliverer, delivery::Delivery, establishment::Establishment};

pub const BACKUP_VERSION: &str = "1.0.0";
pub const BACKUP_TABLES: [&str; 3] = ["deliveries", "deliverers", "establishments"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupType {
    Manual,
    Automatic,
}

// O conteúdo restaurável
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    pub deliveries: Vec<Delivery>,
    pub deliverers: Vec<Deliverer>,
    pub establishments: Vec<Establishment>,
    // settings_<establishmentId> -> objeto livre
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,
}

impl BackupData {
    pub fn record_count(&self) -> usize {
        self.deliveries.len() + self.deliverers.len() + self.establishments.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub note: String,
    pub record_count: usize,
    #[serde(rename = "type")]
    pub backup_type: BackupType,
    #[serde(default)]
    pub tables: Vec<String>,
}

// O arquivo exportado / guardado em backup_<id>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupEnvelope {
    pub metadata: BackupMetadata,
    pub data: BackupData,
}

// Entrada do histórico (backup_history)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupFile {
    pub id: String,
    pub name: String,
    // Tamanho formatado, ex: "1.2 KB"
    pub size: String,
    pub date: DateTime<Utc>,
    pub version: String,
    #[serde(rename = "type")]
    pub backup_type: BackupType,
    pub tables: Vec<String>,
    pub record_count: usize,
}

pub fn format_file_size(size_in_bytes: usize) -> String {
    if size_in_bytes < 1024 {
        format!("{} B", size_in_bytes)
    } else if size_in_bytes < 1024 * 1024 {
        format!("{:.1} KB", size_in_bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", size_in_bytes as f64 / (1024.0 * 1024.0))
    }
}
