// src/db/establishment_repo.rs

use bcrypt::hash;

use crate::{common::error::AppError, db::Database, models::establishment::Establishment};

// Consultas e escritas da coleção de estabelecimentos
impl Database {
    pub fn establishments(&self) -> &[Establishment] {
        &self.establishments
    }

    pub fn find_establishment(&self, id: &str) -> Option<&Establishment> {
        self.establishments.iter().find(|e| e.id == id)
    }

    /// Todos com o nome exato, em ordem de inserção (o nome não é único).
    pub fn find_establishments_by_name<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Establishment> {
        self.establishments.iter().filter(move |e| e.name == name)
    }

    pub(crate) fn insert_establishment(&mut self, establishment: Establishment) -> Result<(), AppError> {
        let mut next = self.establishments.clone();
        next.push(establishment);
        self.commit_establishments(next)
    }

    pub fn current_establishment_id(&self) -> Option<&str> {
        self.current_establishment.as_deref()
    }

    pub(crate) fn set_current_establishment(&mut self, id: Option<String>) -> Result<(), AppError> {
        self.commit_current_establishment(id)
    }

    /// Converte senhas em texto puro (dados legados) para bcrypt.
    /// Retorna quantos registros foram atualizados.
    pub fn rehash_legacy_passwords(&mut self, cost: u32) -> Result<usize, AppError> {
        if !self.establishments.iter().any(Establishment::needs_rehash) {
            return Ok(0);
        }

        let mut next = self.establishments.clone();
        let upgraded = hash_legacy_passwords(&mut next, cost)?;
        self.commit_establishments(next)?;
        Ok(upgraded)
    }
}

/// Troca no lugar as senhas em texto puro por hashes bcrypt.
pub(crate) fn hash_legacy_passwords(establishments: &mut [Establishment], cost: u32) -> Result<usize, AppError> {
    let mut upgraded = 0;
    for establishment in establishments.iter_mut().filter(|e| e.needs_rehash()) {
        establishment.password = hash(&establishment.password, cost)?;
        upgraded += 1;
    }
    if upgraded > 0 {
        tracing::warn!("🔐 {} senha(s) em texto puro convertida(s) para bcrypt", upgraded);
    }
    Ok(upgraded)
}
