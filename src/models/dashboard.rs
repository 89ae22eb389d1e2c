// src/models/dashboard.rs

use chrono::{DateTime, Days, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::delivery::{Delivery, DeliveryStatus, PaymentMethod, Priority};

// 1. Cards do topo do painel
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_deliveries: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub delivered: usize,
    pub cancelled: usize,
    // Soma das entregas com status "entregue"
    pub revenue: Decimal,
    pub available_deliverers: usize,
    pub busy_deliverers: usize,
}

// 2. Relatório filtrado
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_deliveries: usize,
    pub completed: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub cancelled: usize,
    pub total_revenue: Decimal,
    pub average_delivery_value: Decimal,
    // Percentual (0-100), duas casas
    pub completion_rate: Decimal,
    pub by_payment_method: Vec<PaymentMethodEntry>,
    pub by_priority: Vec<PriorityEntry>,
    pub by_deliverer: Vec<DelivererReportEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodEntry {
    pub method: PaymentMethod,
    pub count: usize,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityEntry {
    pub priority: Priority,
    pub count: usize,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelivererReportEntry {
    pub name: String,
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub revenue: Decimal,
    pub completion_rate: Decimal,
}

// 3. Filtros (relatórios e busca avançada)

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    Hoje,
    Ontem,
    Semana,
    Mes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFilter {
    pub period: Option<ReportPeriod>,
    pub status: Option<DeliveryStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub priority: Option<Priority>,
    pub deliverer_id: Option<String>,
    pub min_value: Option<Decimal>,
    pub max_value: Option<Decimal>,
    // Busca livre em nome do cliente, endereço e telefone
    pub search: Option<String>,
    pub customer_name: Option<String>,
    pub address: Option<String>,
    pub only_with_observations: bool,
    pub only_urgent: bool,
    pub only_assigned: bool,
    pub only_unassigned: bool,
}

impl DeliveryFilter {
    /// Quantos filtros estão ativos (o badge do botão "Filtros").
    pub fn active_count(&self) -> usize {
        [
            self.period.is_some(),
            self.min_value.is_some() || self.max_value.is_some(),
            self.status.is_some(),
            self.priority.is_some(),
            self.payment_method.is_some(),
            self.deliverer_id.is_some(),
            self.search.as_deref().is_some_and(|s| !s.trim().is_empty()),
            self.customer_name.as_deref().is_some_and(|s| !s.trim().is_empty()),
            self.address.as_deref().is_some_and(|s| !s.trim().is_empty()),
            self.only_with_observations,
            self.only_urgent,
            self.only_assigned,
            self.only_unassigned,
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    /// Todos os filtros ativos precisam bater (E lógico).
    pub fn matches(&self, delivery: &Delivery, now: DateTime<Utc>) -> bool {
        if let Some(period) = self.period {
            if !period.contains(delivery.created_at, now) {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != delivery.status) {
            return false;
        }
        if self.payment_method.is_some_and(|m| m != delivery.payment_method) {
            return false;
        }
        if self.priority.is_some_and(|p| p != delivery.priority) {
            return false;
        }
        if let Some(deliverer_id) = self.deliverer_id.as_deref() {
            if !delivery.is_assigned_to(deliverer_id) {
                return false;
            }
        }
        if self.min_value.is_some_and(|min| delivery.value < min) {
            return false;
        }
        if self.max_value.is_some_and(|max| delivery.value > max) {
            return false;
        }
        if let Some(term) = non_blank_lower(self.search.as_deref()) {
            let hit = delivery.customer_name.to_lowercase().contains(&term)
                || delivery.address.to_lowercase().contains(&term)
                || delivery.phone.contains(&term);
            if !hit {
                return false;
            }
        }
        if let Some(name) = non_blank_lower(self.customer_name.as_deref()) {
            if !delivery.customer_name.to_lowercase().contains(&name) {
                return false;
            }
        }
        if let Some(address) = non_blank_lower(self.address.as_deref()) {
            if !delivery.address.to_lowercase().contains(&address) {
                return false;
            }
        }
        if self.only_with_observations && delivery.observations.trim().is_empty() {
            return false;
        }
        if self.only_urgent && delivery.priority != Priority::Urgente {
            return false;
        }
        if self.only_assigned && delivery.assigned_to.is_none() {
            return false;
        }
        if self.only_unassigned && delivery.assigned_to.is_some() {
            return false;
        }
        true
    }
}

impl ReportPeriod {
    /// Datas comparadas em UTC.
    pub fn contains(self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let today = now.date_naive();
        match self {
            ReportPeriod::Hoje => created_at.date_naive() == today,
            ReportPeriod::Ontem => today
                .checked_sub_days(Days::new(1))
                .is_some_and(|yesterday| created_at.date_naive() == yesterday),
            ReportPeriod::Semana => now
                .checked_sub_days(Days::new(7))
                .is_some_and(|start| created_at >= start),
            ReportPeriod::Mes => now
                .checked_sub_months(Months::new(1))
                .is_some_and(|start| created_at >= start),
        }
    }
}

fn non_blank_lower(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}
