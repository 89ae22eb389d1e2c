// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::Database,
    models::{
        auth::{Session, TenantContext, UserRole},
        establishment::{CreateEstablishmentPayload, Establishment},
    },
};

#[derive(Clone)]
pub struct AuthService {
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(bcrypt_cost: u32) -> Self {
        Self { bcrypt_cost }
    }

    /// Registra um novo estabelecimento. O nome não precisa ser único.
    pub fn create_establishment(
        &self,
        db: &mut Database,
        payload: CreateEstablishmentPayload,
    ) -> Result<Establishment, AppError> {
        payload.validate()?;

        // 1. Hashing antes de tocar na base
        let hashed_password = hash(&payload.password, self.bcrypt_cost)?;

        let establishment = Establishment {
            id: format!("est_{}", Uuid::new_v4().simple()),
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_string(),
            password: hashed_password,
            created_at: Utc::now(),
        };

        // 2. Grava
        db.insert_establishment(establishment.clone())?;

        tracing::info!("🏪 Estabelecimento criado: {} ({})", establishment.name, establishment.id);
        Ok(establishment)
    }

    /// Login do estabelecimento por nome + senha. Se houver mais de um com o
    /// mesmo nome, vale o primeiro (em ordem de cadastro) cuja senha confere.
    /// Sucesso grava o estabelecimento ativo.
    pub fn authenticate(
        &self,
        db: &mut Database,
        name: &str,
        password: &str,
    ) -> Result<Option<Establishment>, AppError> {
        let mut found = None;
        for candidate in db.find_establishments_by_name(name) {
            match verify(password, &candidate.password) {
                Ok(true) => {
                    found = Some(candidate.clone());
                    break;
                }
                Ok(false) => {}
                // Hash ilegível (dado legado não migrado): conta como senha errada
                Err(e) => tracing::warn!("⚠️ Hash inválido para {}: {}", candidate.id, e),
            }
        }

        let Some(establishment) = found else {
            tracing::info!("🚫 Falha de login para '{}'", name);
            return Ok(None);
        };

        db.set_current_establishment(Some(establishment.id.clone()))?;
        tracing::info!("🔓 Login: {} ({})", establishment.name, establishment.id);
        Ok(Some(establishment))
    }

    /// O estabelecimento gravado como ativo, se ainda existir.
    pub fn current_establishment(&self, db: &Database) -> Option<Establishment> {
        db.current_establishment_id()
            .and_then(|id| db.find_establishment(id))
            .cloned()
    }

    pub fn current_tenant(&self, db: &Database) -> Option<TenantContext> {
        self.current_establishment(db).map(|e| TenantContext::new(e.id))
    }

    pub fn logout(&self, db: &mut Database) -> Result<(), AppError> {
        db.set_current_establishment(None)
    }

    pub fn login_as_vendedor(&self, establishment: &Establishment) -> Session {
        Session {
            establishment_id: establishment.id.clone(),
            name: establishment.name.clone(),
            role: UserRole::Vendedor,
        }
    }

    /// O entregador entra escolhendo o próprio nome na lista do estabelecimento.
    pub fn login_as_deliverer(
        &self,
        db: &Database,
        tenant: &TenantContext,
        deliverer_id: &str,
    ) -> Option<Session> {
        db.find_deliverer(tenant, deliverer_id).map(|d| Session {
            establishment_id: d.establishment_id.clone(),
            name: d.name.clone(),
            role: UserRole::Entregador {
                deliverer_id: d.id.clone(),
            },
        })
    }
}
