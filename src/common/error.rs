// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::discount::DiscountRejection;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Erros de cálculo puro (seleção, agenda, cupom) são devolvidos ANTES de
// qualquer I/O; erros de persistência ficam confinados no BookingService.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Seleção malformada: sem horário, data duplicada, período não suportado...
    #[error("Seleção inválida: {0}")]
    SelectionInvalid(String),

    // Data selecionada fora da agenda da sessão
    #[error("Horário fora da agenda: {0}")]
    SlotOutOfRange(String),

    #[error("Cupom inválido: {0}")]
    DiscountInvalid(#[from] DiscountRejection),

    #[error("Oferta não encontrada")]
    OfferingNotFound,

    // Falha de I/O no repositório (timeout, constraint que não é duplicata)
    #[error("Falha de persistência: {0}")]
    PersistenceError(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::SelectionInvalid(ref msg) | AppError::SlotOutOfRange(ref msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
            }

            AppError::DiscountInvalid(ref reason) => {
                (StatusCode::UNPROCESSABLE_ENTITY, reason.to_string())
            }

            AppError::OfferingNotFound => {
                (StatusCode::NOT_FOUND, "Oferta não encontrada.".to_string())
            }

            // Todos os outros (Persistence, Database, Internal) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
