// src/services/dashboard_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    db::Database,
    models::{
        auth::{Session, TenantContext},
        dashboard::{
            DashboardSummary, DelivererReportEntry, DeliveryFilter, PaymentMethodEntry,
            PriorityEntry, ReportSummary,
        },
        deliverer::DelivererStatus,
        delivery::{Delivery, DeliveryStatus},
    },
};

#[derive(Clone, Default)]
pub struct DashboardService;

impl DashboardService {
    pub fn new() -> Self {
        Self
    }

    /// Cards do topo: contagem por status, faturamento e entregadores livres.
    pub fn summary(&self, db: &Database, tenant: &TenantContext) -> DashboardSummary {
        let deliveries: Vec<&Delivery> = db.deliveries_of(tenant).collect();
        let mut summary = summarize(&deliveries);

        for deliverer in db.deliverers_of(tenant) {
            match deliverer.status {
                DelivererStatus::Disponivel => summary.available_deliverers += 1,
                DelivererStatus::Ocupado => summary.busy_deliverers += 1,
                _ => {}
            }
        }
        summary
    }

    /// "Minhas entregas" do entregador (para o vendedor, o mesmo que `summary`).
    pub fn session_summary(&self, db: &Database, session: &Session) -> DashboardSummary {
        let tenant = session.tenant();
        match session.deliverer_id() {
            Some(deliverer_id) => {
                let mine: Vec<&Delivery> = db
                    .deliveries_of(&tenant)
                    .filter(|d| d.is_assigned_to(deliverer_id))
                    .collect();
                summarize(&mine)
            }
            None => self.summary(db, &tenant),
        }
    }

    /// Relatório sobre as entregas que passam no filtro.
    pub fn report(
        &self,
        db: &Database,
        tenant: &TenantContext,
        filter: &DeliveryFilter,
        now: DateTime<Utc>,
    ) -> ReportSummary {
        let deliveries: Vec<&Delivery> = db
            .deliveries_of(tenant)
            .filter(|d| filter.matches(d, now))
            .collect();
        let total = deliveries.len();

        let counts = summarize(&deliveries);
        let average_delivery_value = if counts.delivered > 0 {
            (counts.revenue / Decimal::from(counts.delivered)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        // Quebras mantêm a ordem da primeira ocorrência
        let mut by_payment_method: Vec<PaymentMethodEntry> = Vec::new();
        let mut by_priority: Vec<PriorityEntry> = Vec::new();
        let mut by_deliverer: Vec<DelivererReportEntry> = Vec::new();

        for delivery in &deliveries {
            match by_payment_method
                .iter_mut()
                .find(|e| e.method == delivery.payment_method)
            {
                Some(entry) => entry.count += 1,
                None => by_payment_method.push(PaymentMethodEntry {
                    method: delivery.payment_method,
                    count: 1,
                    percentage: Decimal::ZERO,
                }),
            }

            match by_priority.iter_mut().find(|e| e.priority == delivery.priority) {
                Some(entry) => entry.count += 1,
                None => by_priority.push(PriorityEntry {
                    priority: delivery.priority,
                    count: 1,
                    percentage: Decimal::ZERO,
                }),
            }

            if let Some(name) = delivery.assigned_to_name.as_deref() {
                let position = match by_deliverer.iter().position(|e| e.name == name) {
                    Some(position) => position,
                    None => {
                        by_deliverer.push(DelivererReportEntry {
                            name: name.to_string(),
                            total: 0,
                            completed: 0,
                            pending: 0,
                            revenue: Decimal::ZERO,
                            completion_rate: Decimal::ZERO,
                        });
                        by_deliverer.len() - 1
                    }
                };
                let entry = &mut by_deliverer[position];
                entry.total += 1;
                match delivery.status {
                    DeliveryStatus::Entregue => {
                        entry.completed += 1;
                        entry.revenue += delivery.value;
                    }
                    DeliveryStatus::Pendente => entry.pending += 1,
                    _ => {}
                }
            }
        }

        for entry in &mut by_payment_method {
            entry.percentage = percentage(entry.count, total);
        }
        for entry in &mut by_priority {
            entry.percentage = percentage(entry.count, total);
        }
        for entry in &mut by_deliverer {
            entry.completion_rate = percentage(entry.completed, entry.total);
        }

        ReportSummary {
            total_deliveries: total,
            completed: counts.delivered,
            pending: counts.pending,
            in_progress: counts.in_progress,
            cancelled: counts.cancelled,
            total_revenue: counts.revenue,
            average_delivery_value,
            completion_rate: percentage(counts.delivered, total),
            by_payment_method,
            by_priority,
            by_deliverer,
        }
    }
}

fn summarize(deliveries: &[&Delivery]) -> DashboardSummary {
    let mut summary = DashboardSummary {
        total_deliveries: deliveries.len(),
        ..Default::default()
    };
    for delivery in deliveries {
        match delivery.status {
            DeliveryStatus::Pendente => summary.pending += 1,
            DeliveryStatus::EmAndamento => summary.in_progress += 1,
            DeliveryStatus::Entregue => {
                summary.delivered += 1;
                summary.revenue += delivery.value;
            }
            DeliveryStatus::Cancelada => summary.cancelled += 1,
        }
    }
    summary
}

fn percentage(part: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp(2)
}
