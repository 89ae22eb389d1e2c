// src/db/backup_repo.rs

use chrono::{DateTime, Utc};

use crate::{
    common::error::AppError,
    db::{
        database::{keys, Changes},
        Database,
    },
    models::backup::{BackupData, BackupEnvelope, BackupFile},
};

// Histórico de backups e snapshots guardados localmente
impl Database {
    pub fn backup_history(&self) -> Vec<BackupFile> {
        match self.read_json(keys::BACKUP_HISTORY) {
            Ok(history) => history.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("⚠️ Histórico de backups ilegível, ignorando: {}", e);
                Vec::new()
            }
        }
    }

    pub(crate) fn save_backup_history(&mut self, history: &[BackupFile]) -> Result<(), AppError> {
        self.write_json(keys::BACKUP_HISTORY, history)
    }

    pub(crate) fn save_backup(&mut self, id: &str, envelope: &BackupEnvelope) -> Result<(), AppError> {
        self.write_json(&keys::backup(id), envelope)
    }

    pub fn load_backup(&self, id: &str) -> Result<Option<BackupEnvelope>, AppError> {
        self.read_json(&keys::backup(id))
    }

    pub(crate) fn remove_backup(&mut self, id: &str) -> Result<(), AppError> {
        self.remove_key(&keys::backup(id))
    }

    /// Foto do estado completo (todos os tenants), como o export original.
    pub fn snapshot(&self) -> BackupData {
        BackupData {
            deliveries: self.deliveries.clone(),
            deliverers: self.deliverers.clone(),
            establishments: self.establishments.clone(),
            settings: self.all_settings(),
        }
    }

    /// Troca as coleções (e as configurações) pelo conteúdo restaurado, tudo
    /// ou nada.
    pub(crate) fn replace_all(&mut self, data: BackupData) -> Result<(), AppError> {
        self.commit(Changes {
            establishments: Some(data.establishments),
            deliverers: Some(data.deliverers),
            deliveries: Some(data.deliveries),
            settings: data.settings.into_iter().collect(),
        })
    }

    // --- Backup automático ---

    pub fn auto_backup_enabled(&self) -> bool {
        self.read_json::<bool>(keys::AUTO_BACKUP)
            .ok()
            .flatten()
            .unwrap_or(false)
    }

    pub(crate) fn set_auto_backup_enabled(&mut self, enabled: bool) -> Result<(), AppError> {
        self.write_json(keys::AUTO_BACKUP, &enabled)
    }

    pub fn last_auto_backup(&self) -> Option<DateTime<Utc>> {
        self.read_json(keys::LAST_AUTO_BACKUP).ok().flatten()
    }

    pub(crate) fn set_last_auto_backup(&mut self, at: DateTime<Utc>) -> Result<(), AppError> {
        self.write_json(keys::LAST_AUTO_BACKUP, &at)
    }
}
