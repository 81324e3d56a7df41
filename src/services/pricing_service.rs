// src/services/pricing_service.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::{
        booking::{Quote, SlotSelection},
        discount::Discount,
        offering::{BillingPeriod, Membership, SessionPackage, TrainingSession},
    },
};

use super::discount_service::DiscountService;

// Compõe preço unitário, desconto opcional e imposto em um orçamento.
// Todo o cálculo é decimal e sem arredondamento intermediário — só o total
// final ganha 2 casas, para o erro não compor em lotes grandes.
#[derive(Clone)]
pub struct PricingService;

impl PricingService {
    pub fn new() -> Self {
        Self
    }

    // Imposto fixo de 10% sobre o subtotal JÁ descontado
    fn tax_rate() -> Decimal {
        Decimal::new(10, 2) // 0.10
    }

    // Preço base ausente vira zero, mas nunca em silêncio
    fn base_or_zero(price: Option<Decimal>, what: &str, warnings: &mut Vec<String>) -> Decimal {
        match price {
            Some(p) => p,
            None => {
                warnings.push(format!(
                    "{what} está sem preço cadastrado; cobrado como zero — corrija o cadastro"
                ));
                Decimal::ZERO
            }
        }
    }

    /// Sessão com N horários definidos. Pares sem horário ficam de fora sem
    /// derrubar o resto; N = 0 não gera orçamento (e bloqueia a reserva).
    pub fn quote_session(
        &self,
        session: &TrainingSession,
        selection: &SlotSelection,
        discount: Option<&Discount>,
    ) -> Option<Quote> {
        let line_count = selection.timed().len();
        if line_count == 0 {
            return None;
        }

        let mut warnings = Vec::new();
        let base = Self::base_or_zero(session.base_price, "a sessão", &mut warnings);

        let unit_price = match discount {
            Some(d) => DiscountService::apply_to(d, base),
            None => base,
        };

        let lines = Decimal::from(line_count as u64);
        let subtotal = unit_price * lines;
        let tax = subtotal * Self::tax_rate();

        Some(Quote {
            unit_price,
            discount_applied: (base - unit_price) * lines,
            subtotal,
            tax,
            total: (subtotal + tax).round_dp(2),
            line_count: line_count as u32,
            warnings,
        })
    }

    /// Pacote: linha única. Desconto do dono primeiro (derivado do preço base
    /// guardado), cupom por cima — os dois compõem multiplicativamente, em
    /// sequência. O cupom já foi validado contra o preço pós-desconto-do-dono.
    pub fn quote_package(&self, package: &SessionPackage, discount: Option<&Discount>) -> Quote {
        let mut warnings = Vec::new();
        let base = Self::base_or_zero(package.base_price, "o pacote", &mut warnings);

        let owner_discounted = package.discounted_base().unwrap_or(Decimal::ZERO);
        let unit_price = match discount {
            Some(d) => DiscountService::apply_to(d, owner_discounted),
            None => owner_discounted,
        };

        let tax = unit_price * Self::tax_rate();

        Quote {
            unit_price,
            discount_applied: base - unit_price,
            subtotal: unit_price,
            tax,
            total: (unit_price + tax).round_dp(2),
            line_count: 1,
            warnings,
        }
    }

    /// Mensalidade: o cliente escolhe um período suportado; o preço do período
    /// é a unidade. Cobrança recorrente por período — nunca multiplicada por
    /// quantidade de horários.
    pub fn quote_membership(
        &self,
        membership: &Membership,
        period: BillingPeriod,
        discount: Option<&Discount>,
    ) -> Result<Quote, AppError> {
        let base = membership.price_for(period).ok_or_else(|| {
            AppError::SelectionInvalid(format!(
                "o plano '{}' não oferece o período {:?}",
                membership.name, period
            ))
        })?;

        let unit_price = match discount {
            Some(d) => DiscountService::apply_to(d, base),
            None => base,
        };

        let tax = unit_price * Self::tax_rate();

        Ok(Quote {
            unit_price,
            discount_applied: base - unit_price,
            subtotal: unit_price,
            tax,
            total: (unit_price + tax).round_dp(2),
            line_count: 1,
            warnings: Vec::new(),
        })
    }
}

impl Default for PricingService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::SlotChoice;
    use crate::models::discount::DiscountType;
    use crate::models::offering::SessionFrequency;
    use chrono::{Duration, NaiveDate, Utc};
    use uuid::Uuid;

    fn session_priced(price: Option<Decimal>) -> TrainingSession {
        TrainingSession {
            id: Uuid::new_v4(),
            trainer_id: Uuid::new_v4(),
            name: "Treino Funcional".to_string(),
            description: None,
            duration_label: None,
            location: None,
            base_price: price,
            max_capacity: None,
            frequency: SessionFrequency::Recurring,
            date: None,
            start_date: NaiveDate::from_ymd_opt(2025, 6, 2),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30),
            created_at: None,
            schedule_rules: vec![],
        }
    }

    fn selection_of(n: usize) -> SlotSelection {
        let choices = (0..n)
            .map(|i| SlotChoice {
                date: NaiveDate::from_ymd_opt(2025, 6, 2)
                    .unwrap()
                    .checked_add_days(chrono::Days::new(i as u64))
                    .unwrap(),
                time_label: Some("09:00 - 10:00".to_string()),
            })
            .collect();
        SlotSelection::new(choices).unwrap()
    }

    fn percentage(value: u32) -> Discount {
        let now = Utc::now();
        Discount {
            id: Uuid::new_v4(),
            code: "VERAO20".to_string(),
            name: "Promoção".to_string(),
            discount_type: DiscountType::Percentage,
            value: Decimal::from(value),
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(30),
            usage_limit: None,
            current_usage: 0,
            min_amount: None,
            is_active: true,
            applies_to_all: true,
            package_ids: vec![],
            session_ids: vec![],
            created_at: None,
        }
    }

    #[test]
    fn session_three_slots_no_discount() {
        // base 100, 3 horários: subtotal 300, imposto 30, total 330
        let quote = PricingService::new()
            .quote_session(&session_priced(Some(Decimal::from(100u32))), &selection_of(3), None)
            .unwrap();

        assert_eq!(quote.unit_price, Decimal::from(100u32));
        assert_eq!(quote.subtotal, Decimal::from(300u32));
        assert_eq!(quote.tax, Decimal::from(30u32));
        assert_eq!(quote.total, Decimal::from(330u32));
        assert_eq!(quote.line_count, 3);
        assert!(quote.warnings.is_empty());
    }

    #[test]
    fn session_with_twenty_percent_code() {
        // unidade 80, subtotal 240, imposto 24, total 264
        let discount = percentage(20);
        let quote = PricingService::new()
            .quote_session(
                &session_priced(Some(Decimal::from(100u32))),
                &selection_of(3),
                Some(&discount),
            )
            .unwrap();

        assert_eq!(quote.unit_price, Decimal::from(80u32));
        assert_eq!(quote.subtotal, Decimal::from(240u32));
        assert_eq!(quote.tax, Decimal::from(24u32));
        assert_eq!(quote.total, Decimal::from(264u32));
        assert_eq!(quote.discount_applied, Decimal::from(60u32));
    }

    #[test]
    fn tax_is_ten_percent_of_discounted_subtotal() {
        let discount = percentage(35);
        let quote = PricingService::new()
            .quote_session(
                &session_priced(Some(Decimal::new(9990, 2))), // 99.90
                &selection_of(7),
                Some(&discount),
            )
            .unwrap();

        // Imposto exatamente 10% do subtotal pós-desconto, nunca do preço cheio
        assert_eq!(quote.tax, quote.subtotal * Decimal::new(10, 2));
        assert_eq!(quote.total, (quote.subtotal + quote.tax).round_dp(2));
    }

    #[test]
    fn no_timed_slot_means_no_quote() {
        let selection = SlotSelection::new(vec![SlotChoice {
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            time_label: None,
        }])
        .unwrap();

        let quote = PricingService::new().quote_session(
            &session_priced(Some(Decimal::from(100u32))),
            &selection,
            None,
        );
        assert!(quote.is_none());
    }

    #[test]
    fn missing_base_price_quotes_zero_with_warning() {
        let quote = PricingService::new()
            .quote_session(&session_priced(None), &selection_of(2), None)
            .unwrap();

        assert_eq!(quote.total, Decimal::ZERO);
        assert_eq!(quote.warnings.len(), 1);
    }

    #[test]
    fn package_owner_discount_derives_from_stored_base() {
        // base 200, desconto do dono 25%: exibido 150, imposto 15, total 165
        let package = SessionPackage {
            id: Uuid::new_v4(),
            trainer_id: Uuid::new_v4(),
            name: "Pacote 10 Treinos".to_string(),
            description: None,
            base_price: Some(Decimal::from(200u32)),
            discount_percent: Some(Decimal::from(25u32)),
            valid_days: 30,
            created_at: None,
        };

        let quote = PricingService::new().quote_package(&package, None);
        assert_eq!(quote.unit_price, Decimal::from(150u32));
        assert_eq!(quote.tax, Decimal::from(15u32));
        assert_eq!(quote.total, Decimal::from(165u32));
        // E o base guardado continua intocado
        assert_eq!(package.base_price, Some(Decimal::from(200u32)));
    }

    #[test]
    fn package_code_composes_on_top_of_owner_discount() {
        let package = SessionPackage {
            id: Uuid::new_v4(),
            trainer_id: Uuid::new_v4(),
            name: "Pacote".to_string(),
            description: None,
            base_price: Some(Decimal::from(200u32)),
            discount_percent: Some(Decimal::from(25u32)),
            valid_days: 30,
            created_at: None,
        };
        let discount = percentage(10);

        // 200 -> 150 (dono) -> 135 (cupom), multiplicativo em sequência
        let quote = PricingService::new().quote_package(&package, Some(&discount));
        assert_eq!(quote.unit_price, Decimal::from(135u32));
        assert_eq!(quote.discount_applied, Decimal::from(65u32));
    }

    #[test]
    fn membership_monthly_is_not_multiplied_by_slots() {
        let membership = Membership {
            id: Uuid::new_v4(),
            trainer_id: Uuid::new_v4(),
            name: "Plano Mensal".to_string(),
            weekly_price: None,
            monthly_price: Some(Decimal::from(50u32)),
            yearly_price: None,
            auto_renewal: true,
            created_at: None,
        };

        let quote = PricingService::new()
            .quote_membership(&membership, BillingPeriod::Monthly, None)
            .unwrap();
        assert_eq!(quote.unit_price, Decimal::from(50u32));
        assert_eq!(quote.tax, Decimal::from(5u32));
        assert_eq!(quote.total, Decimal::from(55u32));
        assert_eq!(quote.line_count, 1);
    }

    #[test]
    fn membership_unsupported_period_is_rejected() {
        let membership = Membership {
            id: Uuid::new_v4(),
            trainer_id: Uuid::new_v4(),
            name: "Plano Mensal".to_string(),
            weekly_price: None,
            monthly_price: Some(Decimal::from(50u32)),
            yearly_price: None,
            auto_renewal: false,
            created_at: None,
        };

        let result =
            PricingService::new().quote_membership(&membership, BillingPeriod::Yearly, None);
        assert!(matches!(result, Err(AppError::SelectionInvalid(_))));
    }
}
