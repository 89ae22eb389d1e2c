// src/services/backup_service.rs

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{establishment_repo::hash_legacy_passwords, Database},
    models::backup::{
        format_file_size, BackupData, BackupEnvelope, BackupFile, BackupMetadata, BackupType,
        BACKUP_TABLES, BACKUP_VERSION,
    },
};

const AUTO_BACKUP_INTERVAL_HOURS: i64 = 24;

#[derive(Clone)]
pub struct BackupService {
    history_limit: usize,
    bcrypt_cost: u32,
}

impl BackupService {
    pub fn new(history_limit: usize, bcrypt_cost: u32) -> Self {
        Self {
            history_limit: history_limit.max(1),
            bcrypt_cost,
        }
    }

    pub fn history(&self, db: &Database) -> Vec<BackupFile> {
        db.backup_history()
    }

    /// Fotografa o estado completo, guarda em backup_<id> e registra no
    /// histórico (mais recente primeiro, limitado a `history_limit`).
    pub fn create_backup(
        &self,
        db: &mut Database,
        note: Option<&str>,
        backup_type: BackupType,
        now: DateTime<Utc>,
    ) -> Result<(BackupFile, BackupEnvelope), AppError> {
        let data = db.snapshot();
        let note = match (note.map(str::trim).filter(|n| !n.is_empty()), backup_type) {
            (Some(note), _) => note.to_string(),
            (None, BackupType::Automatic) => "Backup automático".to_string(),
            (None, BackupType::Manual) => "Backup manual".to_string(),
        };
        let tables: Vec<String> = BACKUP_TABLES.iter().map(|t| t.to_string()).collect();

        let envelope = BackupEnvelope {
            metadata: BackupMetadata {
                version: BACKUP_VERSION.to_string(),
                created_at: now,
                note: note.clone(),
                record_count: data.record_count(),
                backup_type,
                tables: tables.clone(),
            },
            data,
        };

        let size = serde_json::to_string(&envelope)?.len();
        let file = BackupFile {
            id: Uuid::new_v4().simple().to_string(),
            name: note,
            size: format_file_size(size),
            date: now,
            version: BACKUP_VERSION.to_string(),
            backup_type,
            tables,
            record_count: envelope.metadata.record_count,
        };

        // 1. Snapshot primeiro; o histórico só aponta para o que já existe
        db.save_backup(&file.id, &envelope)?;

        // 2. Histórico
        let mut history = db.backup_history();
        history.insert(0, file.clone());
        let dropped: Vec<BackupFile> = if history.len() > self.history_limit {
            history.split_off(self.history_limit)
        } else {
            Vec::new()
        };
        if let Err(e) = db.save_backup_history(&history) {
            // Sem entrada no histórico o snapshot ficaria órfão
            if let Err(cleanup) = db.remove_backup(&file.id) {
                tracing::warn!("⚠️ Snapshot órfão {} não removido: {}", file.id, cleanup);
            }
            return Err(e);
        }

        for old in dropped {
            if let Err(e) = db.remove_backup(&old.id) {
                tracing::warn!("⚠️ Não foi possível apagar o backup antigo {}: {}", old.id, e);
            }
        }

        tracing::info!(
            "💾 Backup {} criado ({:?}, {} registros, {})",
            file.id,
            backup_type,
            file.record_count,
            file.size
        );
        Ok((file, envelope))
    }

    /// JSON formatado de um novo backup manual, pronto para download.
    pub fn export_backup(&self, db: &mut Database, note: Option<&str>, now: DateTime<Utc>) -> Result<String, AppError> {
        let (_, envelope) = self.create_backup(db, note, BackupType::Manual, now)?;
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    /// Restaura a partir de um arquivo exportado. Estrutura inválida não mexe em nada.
    pub fn restore_from_json(&self, db: &mut Database, json: &str) -> Result<BackupMetadata, AppError> {
        let raw: Value = serde_json::from_str(json)
            .map_err(|e| AppError::InvalidBackup(format!("JSON ilegível: {}", e)))?;

        if raw.get("data").is_none() || raw.get("metadata").is_none() {
            return Err(AppError::InvalidBackup(
                "os campos 'data' e 'metadata' são obrigatórios".to_string(),
            ));
        }

        let envelope: BackupEnvelope = serde_json::from_value(raw)
            .map_err(|e| AppError::InvalidBackup(e.to_string()))?;

        let metadata = envelope.metadata.clone();
        self.restore(db, envelope.data)?;
        Ok(metadata)
    }

    pub fn restore_from_history(&self, db: &mut Database, id: &str) -> Result<BackupMetadata, AppError> {
        let envelope = db
            .load_backup(id)?
            .ok_or_else(|| AppError::BackupNotFound(id.to_string()))?;

        let metadata = envelope.metadata.clone();
        self.restore(db, envelope.data)?;
        Ok(metadata)
    }

    /// JSON formatado de um snapshot do histórico, pronto para download.
    pub fn export_from_history(&self, db: &Database, id: &str) -> Result<String, AppError> {
        let envelope = db
            .load_backup(id)?
            .ok_or_else(|| AppError::BackupNotFound(id.to_string()))?;
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    /// Tira o backup do histórico e apaga o snapshot. Id desconhecido não faz nada.
    pub fn delete_backup(&self, db: &mut Database, id: &str) -> Result<(), AppError> {
        let mut history = db.backup_history();
        let before = history.len();
        history.retain(|b| b.id != id);
        if history.len() != before {
            db.save_backup_history(&history)?;
            tracing::info!("🗑️ Backup {} removido do histórico", id);
        }
        db.remove_backup(id)

    }

    fn restore(&self, db: &mut Database, mut data: BackupData) -> Result<(), AppError> {
        let count = data.record_count();
        // Backups antigos podem trazer senha em texto puro
        hash_legacy_passwords(&mut data.establishments, self.bcrypt_cost)?;
        db.replace_all(data)?;

        tracing::info!("♻️ Dados restaurados ({} registros)", count);
        Ok(())
    }

    /// Apaga as três coleções e desloga o estabelecimento.
    pub fn clear_all_data(&self, db: &mut Database) -> Result<(), AppError> {
        db.replace_all(BackupData::default())?;
        db.set_current_establishment(None)?;
        tracing::warn!("🧹 Todos os dados foram removidos");
        Ok(())
    }

    // --- Backup automático ---

    pub fn set_auto_backup(&self, db: &mut Database, enabled: bool) -> Result<(), AppError> {
        db.set_auto_backup_enabled(enabled)
    }

    /// Cria um backup automático se estiver ligado e o último tiver mais de 24h.
    pub fn run_auto_backup_if_due(
        &self,
        db: &mut Database,
        now: DateTime<Utc>,
    ) -> Result<Option<BackupFile>, AppError> {
        if !db.auto_backup_enabled() {
            return Ok(None);
        }

        let due = match db.last_auto_backup() {
            Some(last) => now - last > Duration::hours(AUTO_BACKUP_INTERVAL_HOURS),
            None => true,
        };
        if !due {
            return Ok(None);
        }

        let (file, _) = self.create_backup(db, None, BackupType::Automatic, now)?;
        db.set_last_auto_backup(now)?;
        Ok(Some(file))
    }
}
