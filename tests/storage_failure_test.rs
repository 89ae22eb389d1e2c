//! Escritas que falham no meio de uma cascata não podem deixar meia alteração
//! gravada (nem em disco nem em memória).

use std::{cell::RefCell, rc::Rc};

use chrono::Utc;
use mototrack::{
    db::{Database, KeyValueStore, MemoryStore},
    models::{
        auth::TenantContext,
        backup::BackupType,
        deliverer::{CreateDelivererPayload, UpdateDelivererPayload, VehicleType},
        delivery::{CreateDeliveryPayload, DeliveryStatus, PaymentMethod},
        establishment::CreateEstablishmentPayload,
    },
    AppConfig, AppError, AppState,
};
use rust_decimal::Decimal;

/// Armazenamento em memória que recusa gravar uma chave escolhida.
#[derive(Clone, Default)]
struct FlakyStore {
    inner: Rc<RefCell<MemoryStore>>,
    fail_on: Rc<RefCell<Option<String>>>,
}

impl FlakyStore {
    fn fail_on(&self, key: &str) {
        *self.fail_on.borrow_mut() = Some(key.to_string());
    }

    /// Cópia do que de fato foi gravado.
    fn persisted(&self) -> MemoryStore {
        self.inner.borrow().clone()
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.inner.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        if self.fail_on.borrow().as_deref() == Some(key) {
            return Err(AppError::StorageError(format!("disco cheio ao gravar {}", key)));
        }
        self.inner.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        self.inner.borrow_mut().remove(key)
    }
}

struct Fixture {
    state: AppState,
    store: FlakyStore,
    tenant: TenantContext,
    ana: String,
}

/// Helper: tenant com a Ana e uma entrega atribuída a ela, em andamento.
fn setup() -> Fixture {
    let store = FlakyStore::default();
    let config = AppConfig {
        bcrypt_cost: 4,
        ..AppConfig::default()
    };
    let mut state = AppState::with_store(config, store.clone()).unwrap();

    let est = state
        .auth_service
        .create_establishment(
            &mut state.db,
            CreateEstablishmentPayload {
                name: "Pizza Joe".into(),
                email: "joe@example.com".into(),
                password: "abc123".into(),
            },
        )
        .unwrap();
    let tenant = TenantContext::new(est.id);

    let ana = state
        .deliverer_service
        .add_deliverer(
            &mut state.db,
            &tenant,
            CreateDelivererPayload {
                name: "Ana".into(),
                vehicle: Some(VehicleType::Moto),
                zone: "Centro".into(),
                ..Default::default()
            },
        )
        .unwrap()
        .id;

    let mut payload = CreateDeliveryPayload::new("Rua X, 1", Decimal::new(255, 1), PaymentMethod::Pix);
    payload.assigned_to = Some(ana.clone());
    state
        .delivery_service
        .add_delivery(&mut state.db, &tenant, payload)
        .unwrap();
    state
        .delivery_service
        .update_status(&mut state.db, &tenant, 1, DeliveryStatus::EmAndamento)
        .unwrap();

    Fixture {
        state,
        store,
        tenant,
        ana,
    }
}

fn reopen(store: &FlakyStore) -> Database {
    Database::open(store.persisted()).unwrap()
}

#[test]
fn failed_delete_cascade_keeps_the_delivery_assigned() {
    for failing_key in ["mototrack_deliverers", "mototrack_deliveries"] {
        let Fixture {
            mut state,
            store,
            tenant,
            ana,
        } = setup();
        store.fail_on(failing_key);

        let result = state
            .deliverer_service
            .delete_deliverer(&mut state.db, &tenant, &ana);
        assert!(matches!(result, Err(AppError::StorageError(_))), "{}", failing_key);

        // Em memória
        assert!(state.deliverer_service.get_deliverer(&state.db, &tenant, &ana).is_some());
        let d = state.delivery_service.get_delivery(&state.db, &tenant, 1).unwrap();
        assert_eq!(d.assigned_to.as_deref(), Some(ana.as_str()));
        assert_eq!(d.status, DeliveryStatus::EmAndamento);

        // No armazenamento
        let reloaded = reopen(&store);
        assert!(reloaded.find_deliverer(&tenant, &ana).is_some());
        let d = reloaded.find_delivery(&tenant, 1).unwrap();
        assert_eq!(d.assigned_to.as_deref(), Some(ana.as_str()));
        assert_eq!(d.status, DeliveryStatus::EmAndamento);
    }
}

#[test]
fn failed_rename_does_not_touch_assigned_to_name() {
    let Fixture {
        mut state,
        store,
        tenant,
        ana,
    } = setup();
    store.fail_on("mototrack_deliveries");

    let result = state.deliverer_service.update_deliverer(
        &mut state.db,
        &tenant,
        &ana,
        UpdateDelivererPayload {
            name: Some("Ana Paula".into()),
            ..Default::default()
        },
    );
    assert!(result.is_err());

    let reloaded = reopen(&store);
    assert_eq!(reloaded.find_deliverer(&tenant, &ana).unwrap().name, "Ana");
    assert_eq!(
        reloaded.find_delivery(&tenant, 1).unwrap().assigned_to_name.as_deref(),
        Some("Ana")
    );
    assert_eq!(state.deliverer_service.get_deliverer(&state.db, &tenant, &ana).unwrap().name, "Ana");
}

#[test]
fn failed_restore_leaves_every_collection_as_it_was() {
    let Fixture {
        mut state,
        store,
        tenant,
        ..
    } = setup();
    let json = state
        .backup_service
        .export_backup(&mut state.db, None, Utc::now())
        .unwrap();

    // Muda duas coleções depois do backup
    state
        .delivery_service
        .delete_delivery(&mut state.db, &tenant, 1)
        .unwrap();
    state
        .deliverer_service
        .add_deliverer(
            &mut state.db,
            &tenant,
            CreateDelivererPayload {
                name: "Bia".into(),
                vehicle: Some(VehicleType::Bicicleta),
                zone: "Zona Sul".into(),
                ..Default::default()
            },
        )
        .unwrap();
    let before = state.db.snapshot();

    store.fail_on("mototrack_deliveries");
    let result = state.backup_service.restore_from_json(&mut state.db, &json);
    assert!(matches!(result, Err(AppError::StorageError(_))));

    assert_eq!(state.db.snapshot(), before);
    assert_eq!(reopen(&store).snapshot(), before);
}

#[test]
fn failed_history_write_does_not_leave_an_orphan_snapshot() {
    let Fixture { mut state, store, .. } = setup();
    store.fail_on("mototrack_backup_history");

    let result = state
        .backup_service
        .create_backup(&mut state.db, None, BackupType::Manual, Utc::now());
    assert!(result.is_err());

    let persisted = store.persisted();
    let keys_left = ["mototrack_deliveries", "mototrack_deliverers", "mototrack_establishments"];
    for key in keys_left {
        assert!(persisted.get(key).unwrap().is_some());
    }
    assert!(state.backup_service.history(&state.db).is_empty());
    // Nenhum backup_<id> sobrou
    let snapshots = persisted
        .keys()
        .filter(|k| k.starts_with("mototrack_backup_") && *k != "mototrack_backup_history")
        .count();
    assert_eq!(snapshots, 0);
}
