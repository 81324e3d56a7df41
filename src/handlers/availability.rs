// src/handlers/availability.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::booking::OpenSlot};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsQuery {
    // Corta a expansão depois de N horários (a sequência é finita de qualquer jeito)
    pub limit: Option<usize>,
}

// GET /api/sessions/{id}/slots
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/slots",
    tag = "Availability",
    params(
        ("id" = Uuid, Path, description = "ID da Sessão"),
        ("limit" = Option<usize>, Query, description = "Máximo de horários retornados")
    ),
    responses(
        (status = 200, description = "Horários reserváveis da sessão", body = Vec<OpenSlot>),
        (status = 404, description = "Sessão não encontrada")
    )
)]
pub async fn list_session_slots(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let session = app_state
        .offering_repo
        .get_session(id)
        .await?
        .ok_or(AppError::OfferingNotFound)?;

    // Derivado sob demanda — horários de sessão recorrente nunca são armazenados
    let slots: Vec<OpenSlot> = app_state
        .schedule_service
        .expand(&session, query.limit)
        .collect();

    Ok((StatusCode::OK, Json(slots)))
}
