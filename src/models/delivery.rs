// src/models/delivery.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::common::validation::{validate_not_blank, validate_positive};

pub const DEFAULT_CUSTOMER_NAME: &str = "Cliente não identificado";
pub const DEFAULT_ESTIMATED_TIME: &str = "30-45 min";

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    Pendente,
    // A versão mobile chamava este estado de "em_rota"
    #[serde(alias = "em_rota")]
    EmAndamento,
    Entregue,
    Cancelada,
}

impl DeliveryStatus {
    /// Pendente ou em andamento: ainda aparece na lista de entregas ativas.
    pub fn is_active(self) -> bool {
        matches!(self, DeliveryStatus::Pendente | DeliveryStatus::EmAndamento)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Pix,
    Dinheiro,
    Cartao,
    Loja,
    SemPagamento,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Baixa,
    #[default]
    Normal,
    Alta,
    Urgente,
}

// --- Entidade ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    // Sequencial por estabelecimento (max + 1)
    pub id: u64,
    pub customer_name: String,
    pub address: String,
    #[serde(default)]
    pub phone: String,
    pub value: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    // Cache do nome do entregador, ressincronizado quando ele é renomeado
    #[serde(default)]
    pub assigned_to_name: Option<String>,
    pub status: DeliveryStatus,
    pub establishment_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Delivery {
    pub fn is_assigned_to(&self, deliverer_id: &str) -> bool {
        self.assigned_to.as_deref() == Some(deliverer_id)
    }

    /// Efeito colateral único da máquina de estados: entrar em "entregue"
    /// carimba `completed_at`, sair de "entregue" limpa o carimbo.
    pub fn transition_to(&mut self, status: DeliveryStatus, now: DateTime<Utc>) {
        let previous = self.status;
        self.status = status;
        if status == DeliveryStatus::Entregue && previous != DeliveryStatus::Entregue {
            self.completed_at = Some(now);
        } else if status != DeliveryStatus::Entregue {
            self.completed_at = None;
        }
    }

    pub fn unassign(&mut self) {
        self.assigned_to = None;
        self.assigned_to_name = None;
    }
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeliveryPayload {
    // Em branco vira "Cliente não identificado"
    pub customer_name: Option<String>,

    #[validate(custom(function = "validate_not_blank", message = "O endereço é obrigatório."))]
    pub address: String,

    pub phone: Option<String>,

    #[validate(custom(function = "validate_positive"))]
    pub value: Decimal,

    pub payment_method: PaymentMethod,

    pub priority: Option<Priority>,
    pub estimated_time: Option<String>,
    pub observations: Option<String>,

    // Atribuição opcional já na criação
    pub assigned_to: Option<String>,
}

impl CreateDeliveryPayload {
    pub fn new(address: impl Into<String>, value: Decimal, payment_method: PaymentMethod) -> Self {
        Self {
            customer_name: None,
            address: address.into(),
            phone: None,
            value,
            payment_method,
            priority: None,
            estimated_time: None,
            observations: None,
            assigned_to: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeliveryPayload {
    pub customer_name: Option<String>,

    #[validate(custom(function = "validate_not_blank", message = "O endereço é obrigatório."))]
    pub address: Option<String>,

    pub phone: Option<String>,

    #[validate(custom(function = "validate_positive"))]
    pub value: Option<Decimal>,

    pub payment_method: Option<PaymentMethod>,
    pub priority: Option<Priority>,
    pub estimated_time: Option<String>,
    pub observations: Option<String>,

    // `Some(None)` desatribui; `None` não mexe na atribuição
    #[serde(default, deserialize_with = "deserialize_some")]
    pub assigned_to: Option<Option<String>>,

    pub status: Option<DeliveryStatus>,
}

impl UpdateDeliveryPayload {
    pub fn status(status: DeliveryStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

// Distingue campo ausente (None) de `null` explícito (Some(None))
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
