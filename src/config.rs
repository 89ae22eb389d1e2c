// src/config.rs

use std::{env, path::PathBuf};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::{
    db::{Database, FileStore, KeyValueStore, MemoryStore},
    services::{AuthService, BackupService, DashboardService, DelivererService, DeliveryService},
};

const DEFAULT_BACKUP_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Sem diretório, os dados ficam só em memória
    pub data_dir: Option<PathBuf>,
    pub bcrypt_cost: u32,
    pub backup_history_limit: usize,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            backup_history_limit: DEFAULT_BACKUP_HISTORY_LIMIT,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Lê o `.env` (se existir) e as variáveis MOTOTRACK_*.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let data_dir = env::var("MOTOTRACK_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let bcrypt_cost = match env::var("MOTOTRACK_BCRYPT_COST") {
            Ok(raw) => {
                let cost: u32 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("MOTOTRACK_BCRYPT_COST inválido: {:?}", raw))?;
                anyhow::ensure!(
                    (4..=31).contains(&cost),
                    "MOTOTRACK_BCRYPT_COST deve estar entre 4 e 31 (recebido {})",
                    cost
                );
                cost
            }
            Err(_) => defaults.bcrypt_cost,
        };

        let backup_history_limit = match env::var("MOTOTRACK_BACKUP_HISTORY_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("MOTOTRACK_BACKUP_HISTORY_LIMIT inválido: {:?}", raw))?,
            Err(_) => defaults.backup_history_limit,
        };

        let log_filter = env::var("RUST_LOG").unwrap_or(defaults.log_filter);

        Ok(Self {
            data_dir,
            bcrypt_cost,
            backup_history_limit,
            log_filter,
        })
    }
}

// O estado da aplicação: a base e os serviços, montados uma vez por sessão.
pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
    pub auth_service: AuthService,
    pub deliverer_service: DelivererService,
    pub delivery_service: DeliveryService,
    pub dashboard_service: DashboardService,
    pub backup_service: BackupService,
}

impl AppState {
    /// Configuração do ambiente + backend escolhido pelo `MOTOTRACK_DATA_DIR`.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        init_tracing(&config.log_filter);

        let store: Box<dyn KeyValueStore> = match &config.data_dir {
            Some(dir) => {
                let store = FileStore::open(dir)
                    .with_context(|| format!("Falha ao abrir o diretório de dados {}", dir.display()))?;
                tracing::info!("📁 Dados em {}", dir.display());
                Box::new(store)
            }
            None => {
                tracing::info!("🧠 Sem MOTOTRACK_DATA_DIR: dados só em memória");
                Box::new(MemoryStore::new())
            }
        };

        Self::with_store(config, store)
    }

    /// Monta o estado sobre um backend já pronto (testes, embutir em outro app).
    pub fn with_store(config: AppConfig, store: impl KeyValueStore + 'static) -> anyhow::Result<Self> {
        let mut db = Database::open(store).context("Falha ao carregar a base local")?;
        db.rehash_legacy_passwords(config.bcrypt_cost)
            .context("Falha ao migrar senhas legadas")?;

        // --- Monta o gráfico de dependências ---
        let auth_service = AuthService::new(config.bcrypt_cost);
        let backup_service = BackupService::new(config.backup_history_limit, config.bcrypt_cost);

        Ok(Self {
            config,
            db,
            auth_service,
            deliverer_service: DelivererService::new(),
            delivery_service: DeliveryService::new(),
            dashboard_service: DashboardService::new(),
            backup_service,
        })
    }
}

/// Logger compacto, sem target. `try_init` porque testes (ou quem embute a
/// lib) podem já ter instalado um subscriber.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_data_in_memory() {
        let config = AppConfig::default();
        assert!(config.data_dir.is_none());
        assert_eq!(config.backup_history_limit, 10);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn state_opens_on_an_injected_store() {
        let config = AppConfig {
            bcrypt_cost: 4,
            ..AppConfig::default()
        };
        let state = AppState::with_store(config, MemoryStore::new()).unwrap();

        // Dados de exemplo já com a senha migrada
        let demo = state.db.find_establishment("est_1").unwrap();
        assert!(!demo.needs_rehash());
        assert!(state.auth_service.current_establishment(&state.db).is_none());
    }
}
