// src/services/discount_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DiscountRepository, UsageCommit},
    models::{
        discount::{Discount, DiscountRejection, DiscountType},
        offering::OfferingKind,
    },
};

#[derive(Clone)]
pub struct DiscountService {
    repo: Arc<dyn DiscountRepository>,
}

impl DiscountService {
    pub fn new(repo: Arc<dyn DiscountRepository>) -> Self {
        Self { repo }
    }

    /// Decide se o código é resgatável agora, contra o item e o valor dados.
    /// O cupom é avaliado UMA vez por lote de reserva e vale uniformemente
    /// para todas as linhas do lote.
    pub async fn resolve(
        &self,
        code: &str,
        kind: OfferingKind,
        offering_id: Uuid,
        now: DateTime<Utc>,
        candidate_amount: Decimal,
    ) -> Result<Discount, AppError> {
        let discount = self
            .repo
            .get_by_code(code)
            .await?
            .ok_or(DiscountRejection::CodeNotFound)?;

        Self::evaluate(&discount, kind, offering_id, now, candidate_amount)?;
        Ok(discount)
    }

    // Checagens na ordem da spec de resgate: a primeira que falhar decide.
    fn evaluate(
        discount: &Discount,
        kind: OfferingKind,
        offering_id: Uuid,
        now: DateTime<Utc>,
        candidate_amount: Decimal,
    ) -> Result<(), DiscountRejection> {
        if !discount.is_active {
            return Err(DiscountRejection::Inactive);
        }
        if now < discount.start_date {
            return Err(DiscountRejection::NotYetValid);
        }
        if now > discount.end_date {
            return Err(DiscountRejection::Expired);
        }
        if let Some(limit) = discount.usage_limit {
            if discount.current_usage >= limit {
                return Err(DiscountRejection::UsageLimitReached);
            }
        }
        if !discount.applies_to(kind, offering_id) {
            return Err(DiscountRejection::NotApplicable);
        }
        if let Some(minimum) = discount.min_amount {
            if candidate_amount < minimum {
                return Err(DiscountRejection::BelowMinimum { minimum });
            }
        }
        Ok(())
    }

    // Preço unitário com o cupom aplicado. Nunca fica negativo.
    pub fn apply_to(discount: &Discount, unit_price: Decimal) -> Decimal {
        match discount.discount_type {
            DiscountType::Percentage => {
                unit_price * (Decimal::ONE - discount.value / Decimal::ONE_HUNDRED)
            }
            DiscountType::Fixed => (unit_price - discount.value).max(Decimal::ZERO),
        }
    }

    /// Consome um uso do cupom. Chamado só DEPOIS de a reserva confirmar —
    /// orçamento abandonado não gasta uso. Uma vez por lote, não por horário.
    pub async fn commit_usage(&self, id: Uuid) -> Result<UsageCommit, AppError> {
        let outcome = self.repo.commit_usage(id).await?;
        if outcome == UsageCommit::LimitExceeded {
            tracing::warn!(discount_id = %id, "cupom estourou o limite na hora do commit");
        }
        Ok(outcome)
    }

    /// Cadastro de cupom pelo treinador (invariantes além da validação de payload)
    pub async fn create(&self, discount: Discount) -> Result<Discount, AppError> {
        if discount.end_date <= discount.start_date {
            return Err(AppError::SelectionInvalid(
                "a validade do cupom precisa terminar depois de começar".to_string(),
            ));
        }
        if discount.discount_type == DiscountType::Percentage
            && (discount.value < Decimal::ZERO || discount.value > Decimal::ONE_HUNDRED)
        {
            return Err(AppError::SelectionInvalid(
                "cupom percentual precisa estar entre 0 e 100".to_string(),
            ));
        }
        self.repo.create(&discount).await
    }
}
