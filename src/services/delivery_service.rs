// src/services/delivery_service.rs

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    common::{
        error::{validation_error, AppError},
        validation::trimmed,
    },
    db::Database,
    models::{
        auth::{Session, TenantContext},
        dashboard::DeliveryFilter,
        deliverer::Deliverer,
        delivery::{
            CreateDeliveryPayload, Delivery, DeliveryStatus, UpdateDeliveryPayload,
            DEFAULT_CUSTOMER_NAME, DEFAULT_ESTIMATED_TIME,
        },
    },
};

#[derive(Clone, Default)]
pub struct DeliveryService;

impl DeliveryService {
    pub fn new() -> Self {
        Self
    }

    // --- LEITURA ---

    pub fn list_deliveries(&self, db: &Database, tenant: &TenantContext) -> Vec<Delivery> {
        db.deliveries_of(tenant).cloned().collect()
    }

    pub fn get_delivery(&self, db: &Database, tenant: &TenantContext, id: u64) -> Option<Delivery> {
        db.find_delivery(tenant, id).cloned()
    }

    /// Pendentes + em andamento (a aba "Ativas").
    pub fn active_deliveries(&self, db: &Database, tenant: &TenantContext) -> Vec<Delivery> {
        db.deliveries_of(tenant)
            .filter(|d| d.status.is_active())
            .cloned()
            .collect()
    }

    pub fn filter_deliveries(
        &self,
        db: &Database,
        tenant: &TenantContext,
        filter: &DeliveryFilter,
        now: DateTime<Utc>,
    ) -> Vec<Delivery> {
        db.deliveries_of(tenant)
            .filter(|d| filter.matches(d, now))
            .cloned()
            .collect()
    }

    /// Vendedor vê todas as entregas do estabelecimento; entregador só as dele.
    pub fn list_for_session(&self, db: &Database, session: &Session) -> Vec<Delivery> {
        let tenant = session.tenant();
        match session.deliverer_id() {
            Some(deliverer_id) => db
                .deliveries_of(&tenant)
                .filter(|d| d.is_assigned_to(deliverer_id))
                .cloned()
                .collect(),
            None => self.list_deliveries(db, &tenant),
        }
    }

    // --- ESCRITA ---

    pub fn add_delivery(
        &self,
        db: &mut Database,
        tenant: &TenantContext,
        payload: CreateDeliveryPayload,
    ) -> Result<Delivery, AppError> {
        // 1. Validação (endereço, valor > 0) antes de qualquer escrita
        payload.validate()?;

        let assignee = match payload.assigned_to.as_deref() {
            Some(deliverer_id) => Some(resolve_assignee(db, tenant, deliverer_id)?),
            None => None,
        };

        // 2. Próximo id dentro do tenant
        let id = db.next_delivery_id(tenant);

        let delivery = Delivery {
            id,
            customer_name: or_default(payload.customer_name.as_deref(), DEFAULT_CUSTOMER_NAME),
            address: payload.address.trim().to_string(),
            phone: trimmed(payload.phone.as_deref()),
            value: payload.value,
            payment_method: payload.payment_method,
            priority: payload.priority.unwrap_or_default(),
            estimated_time: or_default(payload.estimated_time.as_deref(), DEFAULT_ESTIMATED_TIME),
            observations: trimmed(payload.observations.as_deref()),
            assigned_to: assignee.as_ref().map(|d| d.id.clone()),
            assigned_to_name: assignee.map(|d| d.name),
            status: DeliveryStatus::Pendente,
            establishment_id: tenant.id().to_string(),
            created_at: Utc::now(),
            completed_at: None,
        };

        // 3. Grava
        db.insert_delivery(delivery.clone())?;

        tracing::info!("📦 Entrega #{} criada ({})", delivery.id, delivery.address);
        Ok(delivery)
    }

    /// Aplica o patch. Qualquer status pode ir para qualquer outro; o único
    /// efeito colateral é o carimbo de `completed_at`.
    pub fn update_delivery(
        &self,
        db: &mut Database,
        tenant: &TenantContext,
        id: u64,
        payload: UpdateDeliveryPayload,
    ) -> Result<Option<Delivery>, AppError> {
        payload.validate()?;

        let Some(current) = db.find_delivery(tenant, id) else {
            return Ok(None);
        };
        let mut next = current.clone();

        if let Some(customer_name) = payload.customer_name.as_deref() {
            next.customer_name = or_default(Some(customer_name), DEFAULT_CUSTOMER_NAME);
        }
        if let Some(address) = payload.address.as_deref() {
            next.address = address.trim().to_string();
        }
        if let Some(phone) = payload.phone.as_deref() {
            next.phone = phone.trim().to_string();
        }
        if let Some(value) = payload.value {
            next.value = value;
        }
        if let Some(method) = payload.payment_method {
            next.payment_method = method;
        }
        if let Some(priority) = payload.priority {
            next.priority = priority;
        }
        if let Some(estimated_time) = payload.estimated_time.as_deref() {
            next.estimated_time = or_default(Some(estimated_time), DEFAULT_ESTIMATED_TIME);
        }
        if let Some(observations) = payload.observations.as_deref() {
            next.observations = observations.trim().to_string();
        }
        match payload.assigned_to.as_ref() {
            Some(Some(deliverer_id)) => {
                let deliverer = resolve_assignee(db, tenant, deliverer_id)?;
                next.assigned_to = Some(deliverer.id);
                next.assigned_to_name = Some(deliverer.name);
            }
            Some(None) => next.unassign(),
            None => {}
        }
        if let Some(status) = payload.status {
            let previous = next.status;
            next.transition_to(status, Utc::now());
            if previous != status {
                tracing::info!("🔄 Entrega #{}: {:?} -> {:?}", id, previous, status);
            }
        }

        db.replace_delivery(next.clone())?;
        Ok(Some(next))
    }

    pub fn assign_delivery(
        &self,
        db: &mut Database,
        tenant: &TenantContext,
        id: u64,
        deliverer_id: &str,
    ) -> Result<Option<Delivery>, AppError> {
        let payload = UpdateDeliveryPayload {
            assigned_to: Some(Some(deliverer_id.to_string())),
            ..Default::default()
        };
        self.update_delivery(db, tenant, id, payload)
    }

    pub fn update_status(
        &self,
        db: &mut Database,
        tenant: &TenantContext,
        id: u64,
        status: DeliveryStatus,
    ) -> Result<Option<Delivery>, AppError> {
        self.update_delivery(db, tenant, id, UpdateDeliveryPayload::status(status))
    }

    /// Troca de status feita pelo app: o entregador só mexe no que é dele.
    pub fn update_status_for_session(
        &self,
        db: &mut Database,
        session: &Session,
        id: u64,
        status: DeliveryStatus,
    ) -> Result<Option<Delivery>, AppError> {
        let tenant = session.tenant();
        let Some(delivery) = db.find_delivery(&tenant, id) else {
            return Ok(None);
        };

        if let Some(deliverer_id) = session.deliverer_id() {
            if !delivery.is_assigned_to(deliverer_id) {
                tracing::warn!("🚫 Entregador {} tentou alterar a entrega #{}", deliverer_id, id);
                return Err(AppError::Forbidden);
            }
        }

        self.update_status(db, &tenant, id, status)
    }

    pub fn delete_delivery(
        &self,
        db: &mut Database,
        tenant: &TenantContext,
        id: u64,
    ) -> Result<Option<Delivery>, AppError> {
        let removed = db.remove_delivery(tenant, id)?;
        if removed.is_some() {
            tracing::info!("🗑️ Entrega #{} excluída", id);
        }
        Ok(removed)
    }
}

// O entregador precisa existir e ser do mesmo estabelecimento
fn resolve_assignee(db: &Database, tenant: &TenantContext, deliverer_id: &str) -> Result<Deliverer, AppError> {
    db.find_deliverer(tenant, deliverer_id).cloned().ok_or_else(|| {
        validation_error(
            "assignedTo",
            "not_found",
            "Entregador não encontrado neste estabelecimento.",
        )
    })
}

fn or_default(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_text_falls_back_to_default() {
        assert_eq!(or_default(None, DEFAULT_CUSTOMER_NAME), DEFAULT_CUSTOMER_NAME);
        assert_eq!(or_default(Some("   "), DEFAULT_ESTIMATED_TIME), DEFAULT_ESTIMATED_TIME);
        assert_eq!(or_default(Some(" Maria "), DEFAULT_CUSTOMER_NAME), "Maria");
    }
}
