// src/models/discount.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "discount_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    Percentage, // value em 0..=100
    Fixed,      // value em moeda, resultado nunca negativo
}

// Cupom criado pelo treinador. Nunca é apagado enquanto houver agendamento
// antigo apontando para ele; sai de circulação via `is_active`.
// `current_usage` só é incrementado pelo repositório (incremento condicional
// atômico), nunca por read-modify-write no serviço.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub id: Uuid,

    #[schema(example = "VERAO20")]
    pub code: String,
    #[schema(example = "Promoção de Verão")]
    pub name: String,

    pub discount_type: DiscountType,

    #[schema(example = "20.00")]
    pub value: Decimal,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    pub usage_limit: Option<i32>,
    pub current_usage: i32,

    // Valor mínimo da compra para o cupom valer
    pub min_amount: Option<Decimal>,

    pub is_active: bool,

    // Escopo de aplicação: tudo, ou listas explícitas por tipo de oferta
    pub applies_to_all: bool,
    pub package_ids: Vec<Uuid>,
    pub session_ids: Vec<Uuid>,

    pub created_at: Option<DateTime<Utc>>,
}

impl Discount {
    pub fn applies_to(&self, kind: super::offering::OfferingKind, offering_id: Uuid) -> bool {
        if self.applies_to_all {
            return true;
        }
        match kind {
            super::offering::OfferingKind::Session => self.session_ids.contains(&offering_id),
            super::offering::OfferingKind::Package => self.package_ids.contains(&offering_id),
            // Mensalidades só entram via `applies_to_all`
            super::offering::OfferingKind::Membership => false,
        }
    }
}

// Motivos de rejeição do cupom, na ordem de avaliação do DiscountService.
// A mensagem é o texto que o cliente vê.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscountRejection {
    #[error("código não encontrado")]
    CodeNotFound,

    #[error("este cupom foi desativado")]
    Inactive,

    #[error("este cupom ainda não está valendo")]
    NotYetValid,

    #[error("este cupom expirou")]
    Expired,

    #[error("este cupom atingiu o limite de usos")]
    UsageLimitReached,

    #[error("este cupom não vale para o item selecionado")]
    NotApplicable,

    #[error("valor mínimo de {minimum} não atingido")]
    BelowMinimum { minimum: Decimal },
}
