// src/handlers/catalog.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::offering::{ScheduleRule, SessionFrequency, TrainingSession, WeekDay},
};

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O preço não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleInput {
    pub weekday: WeekDay,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:00:00")]
    pub end_time: NaiveTime,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionPayload {
    pub trainer_id: Uuid,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub description: Option<String>,
    pub duration_label: Option<String>,
    pub location: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub base_price: Option<Decimal>,

    pub max_capacity: Option<i32>,

    pub frequency: SessionFrequency,

    // OneTime
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,

    // Recurring
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub rules: Vec<RuleInput>,
}

// Validação de consistência entre frequência e campos temporais.
// É aqui, no cadastro da oferta, que intervalo malformado é barrado —
// a expansão da agenda depois disso não tem como falhar.
impl CreateSessionPayload {
    fn validate_consistency(&self) -> Result<(), ValidationError> {
        match self.frequency {
            SessionFrequency::OneTime => {
                if self.date.is_none() {
                    return Err(ValidationError::new("DateRequiredForOneTime"));
                }
                if !self.rules.is_empty() {
                    return Err(ValidationError::new("RulesForbiddenForOneTime"));
                }
            }
            SessionFrequency::Recurring => {
                let (Some(start), Some(end)) = (self.start_date, self.end_date) else {
                    return Err(ValidationError::new("RangeRequiredForRecurring"));
                };
                if start >= end {
                    return Err(ValidationError::new("RangeMustEndAfterStart"));
                }
                if self.rules.is_empty() {
                    return Err(ValidationError::new("AtLeastOneRuleRequired"));
                }
                if self.rules.iter().any(|r| r.start_time >= r.end_time) {
                    return Err(ValidationError::new("RuleWindowMustEndAfterStart"));
                }
            }
        }
        Ok(())
    }
}

// POST /api/sessions
#[utoipa::path(
    post,
    path = "/api/sessions",
    tag = "Catalog",
    request_body = CreateSessionPayload,
    responses(
        (status = 201, description = "Sessão publicada", body = TrainingSession),
        (status = 400, description = "Payload inconsistente com a frequência")
    )
)]
pub async fn create_session(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateSessionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    payload.validate_consistency().map_err(|e| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("frequency", e);
        AppError::ValidationError(errors)
    })?;

    // Ids e posições definitivas saem do banco; os daqui são descartados no INSERT
    let session = TrainingSession {
        id: Uuid::nil(),
        trainer_id: payload.trainer_id,
        name: payload.name,
        description: payload.description,
        duration_label: payload.duration_label,
        location: payload.location,
        base_price: payload.base_price,
        max_capacity: payload.max_capacity,
        frequency: payload.frequency,
        date: payload.date,
        start_date: payload.start_date,
        end_date: payload.end_date,
        created_at: None,
        schedule_rules: payload
            .rules
            .into_iter()
            .enumerate()
            .map(|(i, r)| ScheduleRule {
                id: Uuid::nil(),
                session_id: Uuid::nil(),
                weekday: r.weekday,
                start_time: r.start_time,
                end_time: r.end_time,
                position: i as i32,
            })
            .collect(),
    };

    let created = app_state.offering_repo.create_session(&session).await?;

    Ok((StatusCode::CREATED, Json(created)))
}
