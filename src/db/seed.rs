// src/db/seed.rs

// Dados de exemplo usados quando o armazenamento está vazio ou ilegível.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::models::{
    deliverer::{Deliverer, DelivererStatus, VehicleType},
    delivery::{Delivery, DeliveryStatus, PaymentMethod, Priority, DEFAULT_ESTIMATED_TIME},
    establishment::Establishment,
};

pub const DEMO_ESTABLISHMENT_ID: &str = "est_1";

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

pub fn establishments() -> Vec<Establishment> {
    vec![Establishment {
        id: DEMO_ESTABLISHMENT_ID.to_string(),
        name: "Restaurante Demo".to_string(),
        email: "admin@restaurante.com".to_string(),
        // Texto puro de propósito: vira hash no primeiro carregamento
        password: "123456".to_string(),
        created_at: at(2024, 6, 20, 10, 0),
    }]
}

pub fn deliverers() -> Vec<Deliverer> {
    vec![
        Deliverer {
            id: "1".to_string(),
            name: "Carlos Oliveira".to_string(),
            phone: "(11) 99999-1234".to_string(),
            email: "carlos@email.com".to_string(),
            vehicle: VehicleType::Moto,
            plate: "ABC-1234".to_string(),
            zone: "centro".to_string(),
            status: DelivererStatus::Disponivel,
            establishment_id: DEMO_ESTABLISHMENT_ID.to_string(),
            created_at: at(2024, 6, 20, 10, 0),
        },
        Deliverer {
            id: "2".to_string(),
            name: "Ana Silva".to_string(),
            phone: "(11) 99999-5678".to_string(),
            email: "ana@email.com".to_string(),
            vehicle: VehicleType::Bicicleta,
            plate: String::new(),
            zone: "zona_norte".to_string(),
            status: DelivererStatus::Ocupado,
            establishment_id: DEMO_ESTABLISHMENT_ID.to_string(),
            created_at: at(2024, 6, 19, 14, 30),
        },
    ]
}

pub fn deliveries() -> Vec<Delivery> {
    vec![Delivery {
        id: 1,
        customer_name: "João Silva".to_string(),
        address: "Rua das Flores, 123 - Centro".to_string(),
        phone: "(11) 99999-1234".to_string(),
        value: Decimal::new(4590, 2),
        payment_method: PaymentMethod::Pix,
        status: DeliveryStatus::Pendente,
        priority: Priority::Normal,
        estimated_time: DEFAULT_ESTIMATED_TIME.to_string(),
        observations: "Casa amarela, portão azul".to_string(),
        assigned_to: None,
        assigned_to_name: None,
        establishment_id: DEMO_ESTABLISHMENT_ID.to_string(),
        created_at: at(2024, 6, 22, 10, 30),
        completed_at: None,
    }]
}
