// src/models/establishment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::validation::validate_not_blank;

// O estabelecimento é o tenant: tudo (entregadores, entregas) pertence a um.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Establishment {
    pub id: String,
    // O nome também é o "usuário" do login
    pub name: String,
    pub email: String,
    // Sempre um hash bcrypt depois do carregamento (ver `needs_rehash`)
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl Establishment {
    /// Dados antigos guardavam a senha em texto puro.
    pub fn needs_rehash(&self) -> bool {
        !self.password.starts_with("$2")
    }
}

// Dados para registro de um novo estabelecimento
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEstablishmentPayload {
    #[validate(custom(function = "validate_not_blank", message = "O nome do estabelecimento é obrigatório."))]
    pub name: String,

    #[validate(custom(function = "validate_not_blank", message = "O e-mail é obrigatório."))]
    pub email: String,

    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}
