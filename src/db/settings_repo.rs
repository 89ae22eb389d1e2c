// src/db/settings_repo.rs

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::{
    common::error::AppError,
    db::{database::keys, Database},
    models::auth::TenantContext,
};

// Configurações por estabelecimento: um objeto JSON livre em settings_<id>
impl Database {
    pub fn settings(&self, tenant: &TenantContext) -> Value {
        // Se não existir (ou estiver ilegível), trata como vazio
        match self.read_json::<Value>(&keys::settings(tenant.id())) {
            Ok(Some(value)) => value,
            Ok(None) => Value::Object(Map::new()),
            Err(e) => {
                tracing::warn!("⚠️ Configurações de {} ilegíveis: {}", tenant.id(), e);
                Value::Object(Map::new())
            }
        }
    }

    pub fn save_settings(&mut self, tenant: &TenantContext, settings: &Value) -> Result<(), AppError> {
        self.write_json(&keys::settings(tenant.id()), settings)
    }

    /// Configurações de todos os estabelecimentos conhecidos (entra no backup).
    pub(crate) fn all_settings(&self) -> BTreeMap<String, Value> {
        self.establishments
            .iter()
            .filter_map(|e| {
                self.read_json::<Value>(&keys::settings(&e.id))
                    .ok()
                    .flatten()
                    .map(|value| (e.id.clone(), value))
            })
            .collect()
    }
}
