// src/models/deliverer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::validation::validate_not_blank;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Moto,
    Bicicleta,
    Carro,
    #[serde(rename = "a_pe")]
    APe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelivererStatus {
    #[default]
    Disponivel,
    Ocupado,
    Inativo,
    Folga,
}

// --- Entidade ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deliverer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub vehicle: VehicleType,
    #[serde(default)]
    pub plate: String,
    pub zone: String,
    pub status: DelivererStatus,
    pub establishment_id: String,
    pub created_at: DateTime<Utc>,
}

impl Deliverer {
    /// Comparação de nome usada na regra de unicidade (case-insensitive).
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

// --- Payloads ---

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDelivererPayload {
    #[validate(custom(function = "validate_not_blank", message = "O nome é obrigatório."))]
    pub name: String,

    pub phone: Option<String>,
    pub email: Option<String>,

    #[validate(required(message = "O veículo é obrigatório."))]
    pub vehicle: Option<VehicleType>,

    pub plate: Option<String>,

    #[validate(custom(function = "validate_not_blank", message = "A zona de atuação é obrigatória."))]
    pub zone: String,

    // Se não vier, assume "disponivel"
    pub status: Option<DelivererStatus>,
}

// Atualização parcial: só os campos presentes são aplicados
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDelivererPayload {
    #[validate(custom(function = "validate_not_blank", message = "O nome é obrigatório."))]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub vehicle: Option<VehicleType>,
    pub plate: Option<String>,
    #[validate(custom(function = "validate_not_blank", message = "A zona de atuação é obrigatória."))]
    pub zone: Option<String>,
    pub status: Option<DelivererStatus>,
}

impl UpdateDelivererPayload {
    /// Aplica o patch sobre uma cópia do registro.
    pub fn apply_to(&self, current: &Deliverer) -> Deliverer {
        let mut next = current.clone();
        if let Some(name) = &self.name {
            next.name = name.trim().to_string();
        }
        if let Some(phone) = &self.phone {
            next.phone = phone.trim().to_string();
        }
        if let Some(email) = &self.email {
            next.email = email.trim().to_string();
        }
        if let Some(vehicle) = self.vehicle {
            next.vehicle = vehicle;
        }
        if let Some(plate) = &self.plate {
            next.plate = plate.trim().to_string();
        }
        if let Some(zone) = &self.zone {
            next.zone = zone.trim().to_string();
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_use_portuguese_wire_names() {
        assert_eq!(serde_json::to_string(&VehicleType::APe).unwrap(), "\"a_pe\"");
        assert_eq!(
            serde_json::to_string(&DelivererStatus::Disponivel).unwrap(),
            "\"disponivel\""
        );
        let v: VehicleType = serde_json::from_str("\"bicicleta\"").unwrap();
        assert_eq!(v, VehicleType::Bicicleta);
    }

    #[test]
    fn create_payload_reports_missing_fields() {
        let payload = CreateDelivererPayload {
            name: "  ".into(),
            zone: String::new(),
            ..Default::default()
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("vehicle"));
        assert!(fields.contains_key("zone"));
    }
}
