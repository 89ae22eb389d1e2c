// src/services/deliverer_service.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{validation_error, AppError},
        validation::trimmed,
    },
    db::Database,
    models::{
        auth::TenantContext,
        deliverer::{CreateDelivererPayload, Deliverer, UpdateDelivererPayload},
        delivery::{Delivery, DeliveryStatus},
    },
};

#[derive(Clone, Default)]
pub struct DelivererService;

impl DelivererService {
    pub fn new() -> Self {
        Self
    }

    pub fn list_deliverers(&self, db: &Database, tenant: &TenantContext) -> Vec<Deliverer> {
        db.deliverers_of(tenant).cloned().collect()
    }

    pub fn get_deliverer(&self, db: &Database, tenant: &TenantContext, id: &str) -> Option<Deliverer> {
        db.find_deliverer(tenant, id).cloned()
    }

    /// Busca por nome, zona ou telefone (case-insensitive).
    pub fn search_deliverers(&self, db: &Database, tenant: &TenantContext, term: &str) -> Vec<Deliverer> {
        let term = term.trim().to_lowercase();
        db.deliverers_of(tenant)
            .filter(|d| {
                term.is_empty()
                    || d.name.to_lowercase().contains(&term)
                    || d.zone.to_lowercase().contains(&term)
                    || d.phone.contains(&term)
            })
            .cloned()
            .collect()
    }

    pub fn add_deliverer(
        &self,
        db: &mut Database,
        tenant: &TenantContext,
        payload: CreateDelivererPayload,
    ) -> Result<Deliverer, AppError> {
        // 1. Validação antes de qualquer escrita
        payload.validate()?;

        let name = payload.name.trim().to_string();
        if db.deliverer_name_taken(tenant, &name, None) {
            return Err(AppError::DuplicateDeliverer(name));
        }

        // `validate` já garantiu que o veículo veio
        let Some(vehicle) = payload.vehicle else {
            return Err(validation_error("vehicle", "required", "O veículo é obrigatório."));
        };

        let deliverer = Deliverer {
            id: Uuid::new_v4().to_string(),
            name,
            phone: trimmed(payload.phone.as_deref()),
            email: trimmed(payload.email.as_deref()),
            vehicle,
            plate: trimmed(payload.plate.as_deref()),
            zone: payload.zone.trim().to_string(),
            status: payload.status.unwrap_or_default(),
            establishment_id: tenant.id().to_string(),
            created_at: Utc::now(),
        };

        // 2. Grava
        db.insert_deliverer(deliverer.clone())?;

        tracing::info!("🛵 Entregador cadastrado: {} ({})", deliverer.name, deliverer.id);
        Ok(deliverer)
    }

    /// Aplica o patch. Id desconhecido no tenant: `Ok(None)`, nada muda.
    pub fn update_deliverer(
        &self,
        db: &mut Database,
        tenant: &TenantContext,
        id: &str,
        payload: UpdateDelivererPayload,
    ) -> Result<Option<Deliverer>, AppError> {
        payload.validate()?;

        let Some(current) = db.find_deliverer(tenant, id) else {
            return Ok(None);
        };
        let updated = payload.apply_to(current);

        if updated.name != current.name && db.deliverer_name_taken(tenant, &updated.name, Some(id)) {
            return Err(AppError::DuplicateDeliverer(updated.name));
        }

        let synced = db.replace_deliverer(updated.clone())?;
        if synced > 0 {
            tracing::debug!("🔁 Nome de {} atualizado em {} entrega(s)", updated.id, synced);
        }

        Ok(Some(updated))
    }

    /// Remove o entregador. Entregas atribuídas a ele voltam para "pendente"
    /// sem atribuição, qualquer que fosse o status anterior.
    pub fn delete_deliverer(
        &self,
        db: &mut Database,
        tenant: &TenantContext,
        id: &str,
    ) -> Result<Option<Deliverer>, AppError> {
        let now = Utc::now();
        let removed = db.remove_deliverer(tenant, id, |delivery: &mut Delivery| {
            delivery.unassign();
            delivery.transition_to(DeliveryStatus::Pendente, now);
        })?;

        Ok(removed.map(|(deliverer, reset)| {
            tracing::info!(
                "🗑️ Entregador removido: {} ({} entrega(s) devolvida(s) para pendente)",
                deliverer.name,
                reset
            );
            deliverer
        }))
    }
}
