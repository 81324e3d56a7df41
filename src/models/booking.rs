// src/models/booking.rs

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// Um horário reservável concreto, derivado da agenda (nunca armazenado).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[schema(value_type = String, format = Date, example = "2026-03-02")]
    pub date: NaiveDate,
    #[schema(example = "09:00 - 10:00")]
    pub time_label: String,
}

// Item da lista de disponibilidade: sessões avulsas (OneTime) expõem a data
// sem horário, pois o horário é escolhido à parte.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenSlot {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub time_label: Option<String>,
}

// Um par {data, horário?} escolhido pelo cliente. Horário ausente = pendente:
// não entra no orçamento nem na reserva, mas por si só não é erro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotChoice {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub time_label: Option<String>,
}

// A seleção em andamento do cliente: valor imutável, passado inteiro para o
// cálculo de preço (nunca estado de formulário relido depois).
#[derive(Debug, Clone)]
pub struct SlotSelection {
    choices: Vec<SlotChoice>,
}

impl SlotSelection {
    // Invariante: no máximo um horário por data selecionada.
    pub fn new(choices: Vec<SlotChoice>) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        for choice in &choices {
            if !seen.insert(choice.date) {
                return Err(AppError::SelectionInvalid(format!(
                    "a data {} aparece mais de uma vez na seleção",
                    choice.date
                )));
            }
        }
        Ok(Self { choices })
    }

    pub fn choices(&self) -> &[SlotChoice] {
        &self.choices
    }

    // Somente os pares com horário definido — os que contam para preço e reserva
    pub fn timed(&self) -> Vec<Slot> {
        self.choices
            .iter()
            .filter_map(|c| {
                c.time_label.as_ref().map(|t| Slot {
                    date: c.date,
                    time_label: t.clone(),
                })
            })
            .collect()
    }

    pub fn is_fully_timed(&self) -> bool {
        self.choices.iter().all(|c| c.time_label.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

// Orçamento derivado, nunca persistido nem cacheado: recalculado a cada
// mudança que afete preço.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[schema(example = "80.00")]
    pub unit_price: Decimal,
    // Quanto foi abatido do subtotal (dono + cupom), zero quando não há desconto
    pub discount_applied: Decimal,
    pub subtotal: Decimal,
    pub tax: Decimal,
    // Único valor arredondado (2 casas); os intermediários ficam exatos
    pub total: Decimal,
    pub line_count: u32,
    // Ex.: preço base ausente cobrado como zero — o treinador precisa corrigir
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

// --- Resultado do lote de reservas ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum BatchStatus {
    FullSuccess,
    PartialSuccess,
    TotalFailure,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailedSlot {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub time_label: String,
    pub reason: String,
}

// O chamador sempre recebe o resumo completo — nunca silêncio parcial.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingReport {
    pub status: BatchStatus,
    pub created: Vec<Uuid>,
    pub failed: Vec<FailedSlot>,
}
