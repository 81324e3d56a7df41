// src/models/appointment.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::offering::OfferingKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Stripe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "appointment_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "paid_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaidStatus {
    Paid,
    Unpaid,
}

// A reserva persistida: uma linha por horário confirmado.
// A tupla (offering_id, client_id, date, time_label) tem índice único no
// banco — reenviar a mesma reserva nunca cria uma segunda linha.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,

    pub offering_id: Uuid,
    pub offering_kind: OfferingKind,
    pub client_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2026-03-02")]
    pub date: NaiveDate,
    #[schema(example = "09:00 - 10:00")]
    pub time_label: String,

    // Preço unitário congelado no momento da reserva (sem imposto)
    #[schema(example = "80.00")]
    pub price: Decimal,

    pub payment_method: PaymentMethod,
    pub status: AppointmentStatus,
    pub paid_status: PaidStatus,

    pub created_at: Option<DateTime<Utc>>,
}

// Dados que o coordenador envia ao repositório para criar uma linha.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub offering_id: Uuid,
    pub offering_kind: OfferingKind,
    pub client_id: Uuid,
    pub date: NaiveDate,
    pub time_label: String,
    pub price: Decimal,
    pub payment_method: PaymentMethod,
}
