// src/handlers/bookings.rs

use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        appointment::PaymentMethod,
        booking::{BatchStatus, BookingReport, Slot},
        offering::{BillingPeriod, OfferingKind},
    },
    services::BookingInput,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub offering_id: Uuid,
    pub offering_kind: OfferingKind,
    pub client_id: Uuid,

    pub payment_method: PaymentMethod,

    #[validate(length(min = 1, message = "O código do cupom não pode ser vazio."))]
    pub discount_code: Option<String>,

    // Pré-condição: todo par já vem com horário. Pacote/plano: exatamente um.
    #[validate(length(min = 1, message = "Selecione pelo menos um horário."))]
    pub slots: Vec<Slot>,

    pub billing_period: Option<BillingPeriod>,

    // Timeout por horário, em segundos (opcional)
    pub timeout_secs: Option<u64>,
}

// POST /api/bookings
#[utoipa::path(
    post,
    path = "/api/bookings",
    tag = "Booking",
    request_body = BookingPayload,
    responses(
        (status = 201, description = "Todos os horários reservados", body = BookingReport),
        (status = 200, description = "Desfecho parcial ou falho, detalhado por horário", body = BookingReport),
        (status = 404, description = "Oferta não encontrada"),
        (status = 422, description = "Seleção ou cupom inválido")
    )
)]
pub async fn create_booking(
    State(app_state): State<AppState>,
    Json(payload): Json<BookingPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let report = app_state
        .booking_service
        .book(BookingInput {
            offering_id: payload.offering_id,
            offering_kind: payload.offering_kind,
            client_id: payload.client_id,
            payment_method: payload.payment_method,
            discount_code: payload.discount_code,
            slots: payload.slots,
            billing_period: payload.billing_period,
            timeout: payload.timeout_secs.map(Duration::from_secs),
        })
        .await?;

    // O corpo carrega sempre o resumo completo; o status HTTP só sinaliza
    // o caso 100% criado.
    let status = match report.status {
        BatchStatus::FullSuccess => StatusCode::CREATED,
        BatchStatus::PartialSuccess | BatchStatus::TotalFailure => StatusCode::OK,
    };

    Ok((status, Json(report)))
}
