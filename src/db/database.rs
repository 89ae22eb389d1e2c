// src/db/database.rs

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    common::error::AppError,
    db::{seed, storage::KeyValueStore},
    models::{deliverer::Deliverer, delivery::Delivery, establishment::Establishment},
};

// Todas as chaves ficam sob este prefixo no armazenamento
const NAMESPACE: &str = "mototrack";

pub mod keys {
    pub const DELIVERIES: &str = "deliveries";
    pub const DELIVERERS: &str = "deliverers";
    pub const ESTABLISHMENTS: &str = "establishments";
    pub const CURRENT_ESTABLISHMENT: &str = "current_establishment";
    pub const BACKUP_HISTORY: &str = "backup_history";
    pub const AUTO_BACKUP: &str = "auto_backup";
    pub const LAST_AUTO_BACKUP: &str = "last_auto_backup";

    pub fn settings(establishment_id: &str) -> String {
        format!("settings_{}", establishment_id)
    }

    pub fn backup(id: &str) -> String {
        format!("backup_{}", id)
    }
}

pub(crate) fn namespaced(key: &str) -> String {
    format!("{}_{}", NAMESPACE, key)
}

// Coleções novas a gravar juntas (None = não mexe)
#[derive(Default)]
pub(crate) struct Changes {
    pub(crate) establishments: Option<Vec<Establishment>>,
    pub(crate) deliverers: Option<Vec<Deliverer>>,
    pub(crate) deliveries: Option<Vec<Delivery>>,
    // establishmentId -> objeto de configurações
    pub(crate) settings: Vec<(String, Value)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadOutcome {
    Loaded,
    Missing,
    Corrupt,
}

/// O "banco" da aplicação: as três coleções em memória, espelhadas no
/// armazenamento chave-valor. Toda escrita grava a coleção inteira antes de
/// trocar a versão em memória, então uma falha de escrita não deixa o
/// estado pela metade (ver `commit`).
pub struct Database {
    store: Box<dyn KeyValueStore>,
    pub(crate) establishments: Vec<Establishment>,
    pub(crate) deliverers: Vec<Deliverer>,
    pub(crate) deliveries: Vec<Delivery>,
    pub(crate) current_establishment: Option<String>,
}

impl Database {
    /// Carrega as coleções do armazenamento. Chave ausente ou conteúdo
    /// ilegível cai nos dados de exemplo.
    pub fn open(store: impl KeyValueStore + 'static) -> Result<Self, AppError> {
        let store: Box<dyn KeyValueStore> = Box::new(store);

        let (establishments, est_outcome) =
            load_collection(store.as_ref(), keys::ESTABLISHMENTS, seed::establishments);
        let (deliverers, deliverers_outcome) =
            load_collection(store.as_ref(), keys::DELIVERERS, seed::deliverers);
        let (deliveries, deliveries_outcome) =
            load_collection(store.as_ref(), keys::DELIVERIES, seed::deliveries);

        let current_establishment = match store.get(&namespaced(keys::CURRENT_ESTABLISHMENT)) {
            Ok(value) => value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!("⚠️ Falha ao ler o estabelecimento ativo: {}", e);
                None
            }
        };

        let mut db = Self {
            store,
            establishments,
            deliverers,
            deliveries,
            current_establishment,
        };

        // Primeira execução: grava os dados de exemplo. Conteúdo corrompido
        // só é sobrescrito na próxima escrita de verdade.
        if est_outcome == LoadOutcome::Missing {
            db.write_json(keys::ESTABLISHMENTS, &db.establishments.clone())?;
        }
        if deliverers_outcome == LoadOutcome::Missing {
            db.write_json(keys::DELIVERERS, &db.deliverers.clone())?;
        }
        if deliveries_outcome == LoadOutcome::Missing {
            db.write_json(keys::DELIVERIES, &db.deliveries.clone())?;
        }

        tracing::info!(
            "✅ Base carregada: {} estabelecimentos, {} entregadores, {} entregas",
            db.establishments.len(),
            db.deliverers.len(),
            db.deliveries.len()
        );

        Ok(db)
    }

    // --- Escrita (coleção inteira) ---

    pub(crate) fn commit_establishments(&mut self, next: Vec<Establishment>) -> Result<(), AppError> {
        self.commit(Changes {
            establishments: Some(next),
            ..Default::default()
        })
    }

    pub(crate) fn commit_deliverers(&mut self, next: Vec<Deliverer>) -> Result<(), AppError> {
        self.commit(Changes {
            deliverers: Some(next),
            ..Default::default()
        })
    }

    pub(crate) fn commit_deliveries(&mut self, next: Vec<Delivery>) -> Result<(), AppError> {
        self.commit(Changes {
            deliveries: Some(next),
            ..Default::default()
        })
    }

    /// Grava todas as coleções alteradas como uma unidade. Se uma escrita
    /// falhar, as chaves já gravadas voltam ao conteúdo anterior e a versão
    /// em memória não é trocada.
    pub(crate) fn commit(&mut self, changes: Changes) -> Result<(), AppError> {
        let mut entries: Vec<(String, String)> = Vec::new();
        if let Some(items) = &changes.establishments {
            entries.push((keys::ESTABLISHMENTS.to_string(), serde_json::to_string(items)?));
        }
        if let Some(items) = &changes.deliverers {
            entries.push((keys::DELIVERERS.to_string(), serde_json::to_string(items)?));
        }
        if let Some(items) = &changes.deliveries {
            entries.push((keys::DELIVERIES.to_string(), serde_json::to_string(items)?));
        }
        for (establishment_id, value) in &changes.settings {
            entries.push((keys::settings(establishment_id), serde_json::to_string(value)?));
        }

        self.write_batch(entries)?;

        if let Some(items) = changes.establishments {
            self.establishments = items;
        }
        if let Some(items) = changes.deliverers {
            self.deliverers = items;
        }
        if let Some(items) = changes.deliveries {
            self.deliveries = items;
        }
        Ok(())
    }

    fn write_batch(&mut self, entries: Vec<(String, String)>) -> Result<(), AppError> {
        // (chave, conteúdo anterior) de cada escrita já feita
        let mut written: Vec<(String, Option<String>)> = Vec::with_capacity(entries.len());

        for (key, raw) in entries {
            let full_key = namespaced(&key);
            let previous = match self.store.get(&full_key) {
                Ok(previous) => previous,
                Err(e) => {
                    self.rollback(written);
                    return Err(e);
                }
            };
            if let Err(e) = self.store.set(&full_key, &raw) {
                tracing::error!("🔥 Falha ao gravar '{}': {}", key, e);
                self.rollback(written);
                return Err(e);
            }
            written.push((full_key, previous));
        }
        Ok(())
    }

    fn rollback(&mut self, written: Vec<(String, Option<String>)>) {
        for (key, previous) in written.into_iter().rev() {
            let restored = match &previous {
                Some(raw) => self.store.set(&key, raw),
                None => self.store.remove(&key),
            };
            match restored {
                Ok(()) => tracing::warn!("↩️ '{}' restaurado após falha de escrita", key),
                Err(e) => tracing::error!("🔥 Falha ao desfazer '{}': {}", key, e),
            }
        }
    }

    pub(crate) fn commit_current_establishment(&mut self, id: Option<String>) -> Result<(), AppError> {
        let key = namespaced(keys::CURRENT_ESTABLISHMENT);
        match &id {
            Some(id) => self.store.set(&key, id)?,
            None => self.store.remove(&key)?,
        }
        self.current_establishment = id;
        Ok(())
    }

    // --- Acesso bruto para histórico de backup e configurações ---

    pub(crate) fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        match self.store.get(&namespaced(key))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), AppError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(&namespaced(key), &raw).map_err(|e| {
            tracing::error!("🔥 Falha ao gravar '{}': {}", key, e);
            e
        })
    }

    pub(crate) fn remove_key(&mut self, key: &str) -> Result<(), AppError> {
        self.store.remove(&namespaced(key))
    }
}

fn load_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    seed: fn() -> Vec<T>,
) -> (Vec<T>, LoadOutcome) {
    match store.get(&namespaced(key)) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(items) => (items, LoadOutcome::Loaded),
            Err(e) => {
                tracing::warn!("⚠️ Conteúdo inválido em '{}', usando dados de exemplo: {}", key, e);
                (seed(), LoadOutcome::Corrupt)
            }
        },
        Ok(None) => (seed(), LoadOutcome::Missing),
        Err(e) => {
            tracing::warn!("⚠️ Falha ao ler '{}', usando dados de exemplo: {}", key, e);
            (seed(), LoadOutcome::Corrupt)
        }
    }
}
