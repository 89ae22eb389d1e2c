// src/db/delivery_repo.rs

use crate::{
    common::error::AppError,
    db::Database,
    models::{auth::TenantContext, delivery::Delivery},
};

// Coleção de entregas. O id é sequencial dentro do tenant, então toda
// busca por id também filtra pelo estabelecimento.
impl Database {
    pub fn deliveries_of<'a>(&'a self, tenant: &TenantContext) -> impl Iterator<Item = &'a Delivery> {
        self.deliveries
            .iter()
            .filter(move |d| tenant.owns(&d.establishment_id))
    }

    pub fn find_delivery(&self, tenant: &TenantContext, id: u64) -> Option<&Delivery> {
        self.deliveries_of(tenant).find(|d| d.id == id)
    }

    /// max(ids visíveis, 0) + 1
    pub fn next_delivery_id(&self, tenant: &TenantContext) -> u64 {
        self.deliveries_of(tenant).map(|d| d.id).max().unwrap_or(0) + 1
    }

    pub(crate) fn insert_delivery(&mut self, delivery: Delivery) -> Result<(), AppError> {
        let mut next = self.deliveries.clone();
        next.push(delivery);
        self.commit_deliveries(next)
    }

    pub(crate) fn replace_delivery(&mut self, updated: Delivery) -> Result<bool, AppError> {
        let mut next = self.deliveries.clone();
        let Some(slot) = next
            .iter_mut()
            .find(|d| d.id == updated.id && d.establishment_id == updated.establishment_id)
        else {
            return Ok(false);
        };
        *slot = updated;
        self.commit_deliveries(next)?;
        Ok(true)
    }

    pub(crate) fn remove_delivery(&mut self, tenant: &TenantContext, id: u64) -> Result<Option<Delivery>, AppError> {
        let Some(position) = self
            .deliveries
            .iter()
            .position(|d| d.id == id && tenant.owns(&d.establishment_id))
        else {
            return Ok(None);
        };
        let mut next = self.deliveries.clone();
        let removed = next.remove(position);
        self.commit_deliveries(next)?;
        Ok(Some(removed))
    }
}
