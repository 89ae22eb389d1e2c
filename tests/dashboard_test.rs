//! Testes de integração do painel e dos relatórios.

use chrono::Utc;
use mototrack::{
    db::MemoryStore,
    models::{
        auth::TenantContext,
        dashboard::{DeliveryFilter, ReportPeriod},
        deliverer::{CreateDelivererPayload, DelivererStatus, VehicleType},
        delivery::{CreateDeliveryPayload, DeliveryStatus, PaymentMethod, Priority},
        establishment::CreateEstablishmentPayload,
    },
    AppConfig, AppState,
};
use rust_decimal::Decimal;

struct Fixture {
    state: AppState,
    tenant: TenantContext,
    ana: String,
}

/// Helper: um tenant com Ana (ocupada), Bia (disponível) e quatro entregas.
fn setup() -> Fixture {
    let config = AppConfig {
        bcrypt_cost: 4,
        ..AppConfig::default()
    };
    let mut state = AppState::with_store(config, MemoryStore::new()).unwrap();
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

    let mut add_deliverer = |name: &str, status: DelivererStatus| {
        state
            .deliverer_service
            .add_deliverer(
                &mut state.db,
                &tenant,
                CreateDelivererPayload {
                    name: name.into(),
                    vehicle: Some(VehicleType::Moto),
                    zone: "Centro".into(),
                    status: Some(status),
                    ..Default::default()
                },
            )
            .unwrap()
            .id
    };
    let ana = add_deliverer("Ana", DelivererStatus::Ocupado);
    add_deliverer("Bia", DelivererStatus::Disponivel);

    let rows = [
        (Decimal::new(20, 0), PaymentMethod::Pix, Priority::Normal, DeliveryStatus::Entregue, true),
        (Decimal::new(30, 0), PaymentMethod::Pix, Priority::Urgente, DeliveryStatus::Entregue, true),
        (Decimal::new(15, 0), PaymentMethod::Dinheiro, Priority::Normal, DeliveryStatus::Pendente, true),
        (Decimal::new(50, 0), PaymentMethod::Cartao, Priority::Alta, DeliveryStatus::Cancelada, false),
    ];
    for (value, method, priority, status, assign) in rows {
        let mut payload = CreateDeliveryPayload::new("Rua X, 1", value, method);
        payload.priority = Some(priority);
        if assign {
            payload.assigned_to = Some(ana.clone());
        }
        let d = state
            .delivery_service
            .add_delivery(&mut state.db, &tenant, payload)
            .unwrap();
        state
            .delivery_service
            .update_status(&mut state.db, &tenant, d.id, status)
            .unwrap();
    }

    Fixture { state, tenant, ana }
}

#[test]
fn summary_counts_statuses_revenue_and_deliverers() {
    let Fixture { state, tenant, .. } = setup();

    let summary = state.dashboard_service.summary(&state.db, &tenant);

    assert_eq!(summary.total_deliveries, 4);
    assert_eq!(summary.delivered, 2);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.in_progress, 0);
    assert_eq!(summary.cancelled, 1);
    assert_eq!(summary.revenue, Decimal::new(50, 0));
    assert_eq!(summary.available_deliverers, 1);
    assert_eq!(summary.busy_deliverers, 1);
}

#[test]
fn entregador_summary_only_counts_own_deliveries() {
    let Fixture { state, tenant, ana } = setup();
    let session = state
        .auth_service
        .login_as_deliverer(&state.db, &tenant, &ana)
        .unwrap();

    let summary = state.dashboard_service.session_summary(&state.db, &session);

    assert_eq!(summary.total_deliveries, 3);
    assert_eq!(summary.delivered, 2);
    assert_eq!(summary.cancelled, 0);
}

#[test]
fn report_breaks_down_by_method_priority_and_deliverer() {
    let Fixture { state, tenant, .. } = setup();

    let report = state.dashboard_service.report(
        &state.db,
        &tenant,
        &DeliveryFilter {
            period: Some(ReportPeriod::Hoje),
            ..Default::default()
        },
        Utc::now(),
    );

    assert_eq!(report.total_deliveries, 4);
    assert_eq!(report.completed, 2);
    assert_eq!(report.total_revenue, Decimal::new(50, 0));
    assert_eq!(report.average_delivery_value, Decimal::new(25, 0));
    assert_eq!(report.completion_rate, Decimal::new(50, 0));

    let pix = &report.by_payment_method[0];
    assert_eq!(pix.method, PaymentMethod::Pix);
    assert_eq!(pix.count, 2);
    assert_eq!(pix.percentage, Decimal::new(50, 0));
    assert_eq!(report.by_payment_method.len(), 3);

    assert_eq!(report.by_priority[0].priority, Priority::Normal);
    assert_eq!(report.by_priority[0].count, 2);

    assert_eq!(report.by_deliverer.len(), 1);
    let ana = &report.by_deliverer[0];
    assert_eq!(ana.name, "Ana");
    assert_eq!(ana.total, 3);
    assert_eq!(ana.completed, 2);
    assert_eq!(ana.pending, 1);
    assert_eq!(ana.revenue, Decimal::new(50, 0));
    assert_eq!(ana.completion_rate, Decimal::new(6667, 2));
}

#[test]
fn empty_report_has_zero_rates() {
    let Fixture { state, tenant, .. } = setup();

    let report = state.dashboard_service.report(
        &state.db,
        &tenant,
        &DeliveryFilter {
            period: Some(ReportPeriod::Ontem),
            ..Default::default()
        },
        Utc::now(),
    );

    assert_eq!(report.total_deliveries, 0);
    assert_eq!(report.completion_rate, Decimal::ZERO);
    assert_eq!(report.average_delivery_value, Decimal::ZERO);
    assert!(report.by_payment_method.is_empty());
}
