// src/handlers/quotes.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        booking::{Quote, SlotChoice, SlotSelection},
        offering::{BillingPeriod, OfferingKind},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    pub offering_id: Uuid,
    pub offering_kind: OfferingKind,

    #[validate(length(min = 1, message = "O código do cupom não pode ser vazio."))]
    pub discount_code: Option<String>,

    // Sessões: pares {data, horário?}. Pares sem horário ficam de fora do cálculo.
    #[serde(default)]
    pub slots: Vec<SlotChoice>,

    // Planos: período escolhido
    pub billing_period: Option<BillingPeriod>,
}

// POST /api/quotes
#[utoipa::path(
    post,
    path = "/api/quotes",
    tag = "Pricing",
    request_body = QuotePayload,
    responses(
        (status = 200, description = "Orçamento calculado", body = Quote),
        (status = 204, description = "Nada a orçar (nenhum horário com hora definida)"),
        (status = 404, description = "Oferta não encontrada"),
        (status = 422, description = "Seleção ou cupom inválido")
    )
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    Json(payload): Json<QuotePayload>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let selection = SlotSelection::new(payload.slots)?;

    // Sempre recalculado do estado atual — orçamento nunca é cacheado
    let prepared = app_state
        .booking_service
        .prepare_quote(
            payload.offering_id,
            payload.offering_kind,
            payload.discount_code.as_deref(),
            &selection,
            payload.billing_period,
        )
        .await?;

    Ok(match prepared {
        Some(prepared) => (StatusCode::OK, Json(prepared.quote)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
