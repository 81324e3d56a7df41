// src/handlers/discounts.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        discount::{Discount, DiscountType},
        offering::OfferingKind,
    },
    services::DiscountService,
};

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscountPayload {
    #[validate(length(min = 3, message = "O código precisa de pelo menos 3 caracteres."))]
    pub code: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub discount_type: DiscountType,

    #[validate(custom(function = "validate_not_negative"))]
    pub value: Decimal,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    pub usage_limit: Option<i32>,

    #[validate(custom(function = "validate_not_negative"))]
    pub min_amount: Option<Decimal>,

    #[serde(default)]
    pub applies_to_all: bool,
    #[serde(default)]
    pub package_ids: Vec<Uuid>,
    #[serde(default)]
    pub session_ids: Vec<Uuid>,
}

// POST /api/discounts
#[utoipa::path(
    post,
    path = "/api/discounts",
    tag = "Discounts",
    request_body = CreateDiscountPayload,
    responses(
        (status = 201, description = "Cupom criado", body = Discount),
        (status = 400, description = "Payload inválido"),
        (status = 422, description = "Invariante violada (janela, percentual)")
    )
)]
pub async fn create_discount(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateDiscountPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // Janela e faixa percentual são checadas no serviço (invariantes do domínio)
    let created = app_state
        .discount_service
        .create(Discount {
            id: Uuid::new_v4(),
            code: payload.code,
            name: payload.name,
            discount_type: payload.discount_type,
            value: payload.value,
            start_date: payload.start_date,
            end_date: payload.end_date,
            usage_limit: payload.usage_limit,
            current_usage: 0,
            min_amount: payload.min_amount,
            is_active: true,
            applies_to_all: payload.applies_to_all,
            package_ids: payload.package_ids,
            session_ids: payload.session_ids,
            created_at: None,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuery {
    pub offering_id: Uuid,
    pub offering_kind: OfferingKind,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscountPreview {
    pub code: String,
    pub original_amount: Decimal,
    pub discounted_amount: Decimal,
}

// GET /api/discounts/{code}/preview
// Mostra o preço com o cupom SEM consumir uso — uso só é gasto quando a
// reserva confirma.
#[utoipa::path(
    get,
    path = "/api/discounts/{code}/preview",
    tag = "Discounts",
    params(
        ("code" = String, Path, description = "Código do cupom"),
        ("offeringId" = Uuid, Query, description = "ID da oferta"),
        ("offeringKind" = OfferingKind, Query, description = "Tipo da oferta"),
        ("amount" = Decimal, Query, description = "Valor candidato (pós desconto do dono, se pacote)")
    ),
    responses(
        (status = 200, description = "Preço com o cupom aplicado", body = DiscountPreview),
        (status = 422, description = "Cupom rejeitado, com o motivo")
    )
)]
pub async fn preview_discount(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Result<impl IntoResponse, AppError> {
    let discount = app_state
        .discount_service
        .resolve(
            &code,
            query.offering_kind,
            query.offering_id,
            Utc::now(),
            query.amount,
        )
        .await?;

    let preview = DiscountPreview {
        code: discount.code.clone(),
        original_amount: query.amount,
        discounted_amount: DiscountService::apply_to(&discount, query.amount),
    };

    Ok((StatusCode::OK, Json(preview)))
}
