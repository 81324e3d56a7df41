// src/services/booking_service.rs

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AppointmentRepository, CreateOutcome, OfferingRepository, UsageCommit},
    models::{
        appointment::{NewAppointment, PaymentMethod},
        booking::{BatchStatus, BookingReport, FailedSlot, Quote, Slot, SlotChoice, SlotSelection},
        discount::Discount,
        offering::{BillingPeriod, Offering, OfferingKind},
    },
};

use super::{
    discount_service::DiscountService, pricing_service::PricingService,
    schedule_service::ScheduleService,
};

// Timeout por chamada de criação quando o chamador não manda um
const DEFAULT_SLOT_TIMEOUT: Duration = Duration::from_secs(10);

// Entrada de uma reserva confirmada: pré-condição é todo horário definido.
#[derive(Debug, Clone)]
pub struct BookingInput {
    pub offering_id: Uuid,
    pub offering_kind: OfferingKind,
    pub client_id: Uuid,
    pub payment_method: PaymentMethod,
    pub discount_code: Option<String>,
    pub slots: Vec<Slot>,
    pub billing_period: Option<BillingPeriod>,
    pub timeout: Option<Duration>,
}

// Orçamento resolvido junto com tudo que a confirmação precisa reaproveitar.
#[derive(Debug, Clone)]
pub struct PreparedQuote {
    pub offering: Offering,
    pub discount: Option<Discount>,
    pub quote: Quote,
}

/// Transforma um orçamento confirmado em agendamentos persistidos e reporta
/// o desfecho horário a horário. O lote NÃO é transação: falha parcial é um
/// resultado de primeira classe, não um rollback.
#[derive(Clone)]
pub struct BookingService {
    offerings: Arc<dyn OfferingRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    discounts: DiscountService,
    schedule: ScheduleService,
    pricing: PricingService,
}

impl BookingService {
    pub fn new(
        offerings: Arc<dyn OfferingRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        discounts: DiscountService,
        schedule: ScheduleService,
        pricing: PricingService,
    ) -> Self {
        Self {
            offerings,
            appointments,
            discounts,
            schedule,
            pricing,
        }
    }

    /// Produz o orçamento para uma oferta + seleção (ou período de cobrança),
    /// resolvendo o cupom quando houver código. `Ok(None)` = nada a orçar
    /// (nenhum horário com hora definida) — a UI não mostra nada e a reserva
    /// fica bloqueada.
    pub async fn prepare_quote(
        &self,
        offering_id: Uuid,
        kind: OfferingKind,
        discount_code: Option<&str>,
        selection: &SlotSelection,
        billing_period: Option<BillingPeriod>,
    ) -> Result<Option<PreparedQuote>, AppError> {
        let now = Utc::now();

        match kind {
            OfferingKind::Session => {
                let session = self
                    .offerings
                    .get_session(offering_id)
                    .await?
                    .ok_or(AppError::OfferingNotFound)?;

                // Erros de cálculo puro saem ANTES de qualquer I/O de escrita
                self.schedule.validate_selection(&session, selection)?;

                let candidate = session.base_price.unwrap_or(Decimal::ZERO);
                let discount = self
                    .resolve_discount(discount_code, kind, offering_id, candidate)
                    .await?;

                let quote = self.pricing.quote_session(&session, selection, discount.as_ref());
                Ok(quote.map(|quote| PreparedQuote {
                    offering: Offering::Session(session),
                    discount,
                    quote,
                }))
            }

            OfferingKind::Package => {
                let package = self
                    .offerings
                    .get_package(offering_id)
                    .await?
                    .ok_or(AppError::OfferingNotFound)?;

                // O cupom é avaliado contra o preço JÁ com o desconto do dono
                let candidate = package.discounted_base().unwrap_or(Decimal::ZERO);
                let discount = self
                    .resolve_discount(discount_code, kind, offering_id, candidate)
                    .await?;

                let quote = self.pricing.quote_package(&package, discount.as_ref());
                Ok(Some(PreparedQuote {
                    offering: Offering::Package(package),
                    discount,
                    quote,
                }))
            }

            OfferingKind::Membership => {
                let membership = self
                    .offerings
                    .get_membership(offering_id)
                    .await?
                    .ok_or(AppError::OfferingNotFound)?;

                let period = billing_period.ok_or_else(|| {
                    AppError::SelectionInvalid(
                        "escolha um período de cobrança para o plano".to_string(),
                    )
                })?;

                let candidate = membership.price_for(period).unwrap_or(Decimal::ZERO);
                let discount = self
                    .resolve_discount(discount_code, kind, offering_id, candidate)
                    .await?;

                let quote =
                    self.pricing
                        .quote_membership(&membership, period, discount.as_ref())?;
                Ok(Some(PreparedQuote {
                    offering: Offering::Membership(membership),
                    discount,
                    quote,
                }))
            }
        }
    }

    async fn resolve_discount(
        &self,
        code: Option<&str>,
        kind: OfferingKind,
        offering_id: Uuid,
        candidate_amount: Decimal,
    ) -> Result<Option<Discount>, AppError> {
        match code {
            // Cupom inválido nunca é descartado em silêncio: o erro sobe e o
            // chamador decide se tenta de novo sem o código.
            Some(code) => Ok(Some(
                self.discounts
                    .resolve(code, kind, offering_id, Utc::now(), candidate_amount)
                    .await?,
            )),
            None => Ok(None),
        }
    }

    /// Máquina do lote: Pending → Validating → Committing → desfecho.
    /// Sem transição de volta — lote falhado é reenviado do zero pelo chamador.
    pub async fn book(&self, input: BookingInput) -> Result<BookingReport, AppError> {
        tracing::info!(
            offering_id = %input.offering_id,
            slots = input.slots.len(),
            state = "Validating",
            "lote de reserva recebido"
        );

        if input.slots.is_empty() {
            return Err(AppError::SelectionInvalid(
                "nenhum horário selecionado".to_string(),
            ));
        }
        if input.slots.iter().any(|s| s.time_label.trim().is_empty()) {
            return Err(AppError::SelectionInvalid(
                "todo horário selecionado precisa de hora definida".to_string(),
            ));
        }
        // Pacote e plano geram exatamente um agendamento (atômico por construção)
        if matches!(
            input.offering_kind,
            OfferingKind::Package | OfferingKind::Membership
        ) && input.slots.len() != 1
        {
            return Err(AppError::SelectionInvalid(
                "pacotes e planos usam exatamente um par data/horário".to_string(),
            ));
        }

        let selection = SlotSelection::new(
            input
                .slots
                .iter()
                .map(|s| SlotChoice {
                    date: s.date,
                    time_label: Some(s.time_label.clone()),
                })
                .collect(),
        )?;

        let prepared = self
            .prepare_quote(
                input.offering_id,
                input.offering_kind,
                input.discount_code.as_deref(),
                &selection,
                input.billing_period,
            )
            .await?
            .ok_or_else(|| {
                AppError::SelectionInvalid("não há nada a reservar nessa seleção".to_string())
            })?;

        tracing::info!(offering_id = %input.offering_id, state = "Committing", "gravando o lote");

        // Dispara as N criações de uma vez e espera TODAS assentarem antes de
        // classificar — a ordem entre elas não importa para a correção.
        let timeout = input.timeout.unwrap_or(DEFAULT_SLOT_TIMEOUT);
        let mut handles = Vec::with_capacity(input.slots.len());
        for slot in &input.slots {
            let repo = Arc::clone(&self.appointments);
            let new_appointment = NewAppointment {
                offering_id: input.offering_id,
                offering_kind: input.offering_kind,
                client_id: input.client_id,
                date: slot.date,
                time_label: slot.time_label.clone(),
                price: prepared.quote.unit_price,
                payment_method: input.payment_method,
            };
            handles.push((
                slot.clone(),
                tokio::spawn(async move {
                    tokio::time::timeout(timeout, repo.create(&new_appointment)).await
                }),
            ));
        }

        let mut created = Vec::new();
        let mut failed = Vec::new();
        let mut any_new_row = false;

        for (slot, handle) in handles {
            match handle.await {
                Ok(Ok(Ok(CreateOutcome::Created(appointment)))) => {
                    any_new_row = true;
                    created.push(appointment.id);
                }
                // Reenvio da mesma tupla: o agendamento existente É o resultado
                Ok(Ok(Ok(CreateOutcome::Duplicate(existing_id)))) => {
                    tracing::info!(appointment_id = %existing_id, "reserva duplicada absorvida");
                    created.push(existing_id);
                }
                Ok(Ok(Err(e))) => failed.push(FailedSlot {
                    date: slot.date,
                    time_label: slot.time_label,
                    reason: e.to_string(),
                }),
                // Timeout não é retentado: vira falha reportada do horário
                Ok(Err(_elapsed)) => failed.push(FailedSlot {
                    date: slot.date,
                    time_label: slot.time_label,
                    reason: "tempo esgotado ao gravar o agendamento".to_string(),
                }),
                Err(join_err) => failed.push(FailedSlot {
                    date: slot.date,
                    time_label: slot.time_label,
                    reason: format!("falha interna na tarefa de gravação: {join_err}"),
                }),
            }
        }

        // Uso do cupom: uma vez por LOTE, nunca por horário, e somente se
        // alguma linha nova de fato entrou (duplicata absorvida não conta).
        if any_new_row {
            if let Some(discount) = &prepared.discount {
                match self.discounts.commit_usage(discount.id).await {
                    Ok(UsageCommit::Committed) => {
                        tracing::info!(code = %discount.code, "uso do cupom consumido");
                    }
                    Ok(UsageCommit::LimitExceeded) => {
                        // A reserva já está de pé; o estouro fica registrado
                        tracing::warn!(code = %discount.code, "commit de uso além do limite");
                    }
                    Err(e) => {
                        tracing::error!(code = %discount.code, "falha ao consumir uso: {e}");
                    }
                }
            }
        }

        let status = if failed.is_empty() {
            BatchStatus::FullSuccess
        } else if created.is_empty() {
            BatchStatus::TotalFailure
        } else {
            BatchStatus::PartialSuccess
        };

        tracing::info!(
            offering_id = %input.offering_id,
            state = ?status,
            created = created.len(),
            failed = failed.len(),
            "lote de reserva encerrado"
        );

        Ok(BookingReport {
            status,
            created,
            failed,
        })
    }
}
