// src/models/auth.rs

use serde::{Deserialize, Serialize};

// O tenant ativo. Toda operação de leitura/escrita recebe um explicitamente.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantContext(pub String);

impl TenantContext {
    pub fn new(establishment_id: impl Into<String>) -> Self {
        Self(establishment_id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    pub fn owns(&self, establishment_id: &str) -> bool {
        self.0 == establishment_id
    }
}

// Perfis do app: o vendedor administra tudo, o entregador só vê/atualiza o que é dele.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserRole {
    Vendedor,
    #[serde(rename_all = "camelCase")]
    Entregador { deliverer_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub establishment_id: String,
    pub name: String,
    pub role: UserRole,
}

impl Session {
    pub fn tenant(&self) -> TenantContext {
        TenantContext::new(self.establishment_id.clone())
    }

    /// Id do entregador logado, se a sessão for de entregador.
    pub fn deliverer_id(&self) -> Option<&str> {
        match &self.role {
            UserRole::Entregador { deliverer_id } => Some(deliverer_id),
            UserRole::Vendedor => None,
        }
    }
}
