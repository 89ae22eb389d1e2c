// src/db/deliverer_repo.rs

use crate::{
    common::error::AppError,
    db::{database::Changes, Database},
    models::{auth::TenantContext, deliverer::Deliverer, delivery::Delivery},
};

// Coleção de entregadores. Toda leitura é filtrada pelo tenant.
impl Database {
    pub fn deliverers_of<'a>(&'a self, tenant: &TenantContext) -> impl Iterator<Item = &'a Deliverer> {
        self.deliverers
            .iter()
            .filter(move |d| tenant.owns(&d.establishment_id))
    }

    pub fn find_deliverer(&self, tenant: &TenantContext, id: &str) -> Option<&Deliverer> {
        self.deliverers_of(tenant).find(|d| d.id == id)
    }

    /// Procura outro entregador do tenant com o mesmo nome (case-insensitive).
    pub fn deliverer_name_taken(&self, tenant: &TenantContext, name: &str, except_id: Option<&str>) -> bool {
        self.deliverers_of(tenant)
            .any(|d| d.has_name(name) && Some(d.id.as_str()) != except_id)
    }

    pub(crate) fn insert_deliverer(&mut self, deliverer: Deliverer) -> Result<(), AppError> {
        let mut next = self.deliverers.clone();
        next.push(deliverer);
        self.commit_deliverers(next)
    }

    /// Substitui o registro e, se o nome mudou, ressincroniza o cache
    /// `assigned_to_name` das entregas atribuídas a ele.
    pub(crate) fn replace_deliverer(&mut self, updated: Deliverer) -> Result<usize, AppError> {
        let mut next = self.deliverers.clone();
        let Some(slot) = next
            .iter_mut()
            .find(|d| d.id == updated.id && d.establishment_id == updated.establishment_id)
        else {
            return Ok(0);
        };
        let renamed = slot.name != updated.name;
        *slot = updated.clone();

        let mut synced = 0;
        if renamed {
            let next_deliveries: Vec<Delivery> = self
                .deliveries
                .iter()
                .cloned()
                .map(|mut delivery| {
                    if delivery.establishment_id == updated.establishment_id
                        && delivery.is_assigned_to(&updated.id)
                    {
                        delivery.assigned_to_name = Some(updated.name.clone());
                        synced += 1;
                    }
                    delivery
                })
                .collect();
            if synced > 0 {
                self.commit(Changes {
                    deliverers: Some(next),
                    deliveries: Some(next_deliveries),
                    ..Default::default()
                })?;
                return Ok(synced);
            }
        }

        self.commit_deliverers(next)?;
        Ok(synced)
    }

    /// Remove o entregador e devolve para "pendente" tudo que estava com ele.
    pub(crate) fn remove_deliverer(
        &mut self,
        tenant: &TenantContext,
        id: &str,
        reset: impl Fn(&mut Delivery),
    ) -> Result<Option<(Deliverer, usize)>, AppError> {
        let Some(position) = self
            .deliverers
            .iter()
            .position(|d| d.id == id && tenant.owns(&d.establishment_id))
        else {
            return Ok(None);
        };

        let mut next = self.deliverers.clone();
        let removed = next.remove(position);

        let mut reset_count = 0;
        let next_deliveries: Vec<Delivery> = self
            .deliveries
            .iter()
            .cloned()
            .map(|mut delivery| {
                if tenant.owns(&delivery.establishment_id) && delivery.is_assigned_to(id) {
                    reset(&mut delivery);
                    reset_count += 1;
                }
                delivery
            })
            .collect();

        self.commit(Changes {
            deliverers: Some(next),
            deliveries: (reset_count > 0).then_some(next_deliveries),
            ..Default::default()
        })?;

        Ok(Some((removed, reset_count)))
    }
}
