// src/db/appointment_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::appointment::{Appointment, NewAppointment},
};

// Uma criação pode "bater" em uma reserva que já existe (reenvio da mesma
// tupla): isso não é erro, é o agendamento existente valendo como resultado.
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    Created(Appointment),
    Duplicate(Uuid),
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, new: &NewAppointment) -> Result<CreateOutcome, AppError>;
}

#[derive(Clone)]
pub struct PgAppointmentRepository {
    pool: PgPool,
}

impl PgAppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PgAppointmentRepository {
    async fn create(&self, new: &NewAppointment) -> Result<CreateOutcome, AppError> {
        let inserted = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (
                offering_id, offering_kind, client_id,
                date, time_label, price, payment_method
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(new.offering_id)
        .bind(new.offering_kind)
        .bind(new.client_id)
        .bind(new.date)
        .bind(&new.time_label)
        .bind(new.price)
        .bind(new.payment_method)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(appointment) => Ok(CreateOutcome::Created(appointment)),

            // 23505 = violação do índice único da tupla de reserva.
            // Resolve para a linha que já existe, sem retentativa.
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                let (existing_id,): (Uuid,) = sqlx::query_as(
                    r#"
                    SELECT id FROM appointments
                     WHERE offering_id = $1 AND client_id = $2
                       AND date = $3 AND time_label = $4
                    "#,
                )
                .bind(new.offering_id)
                .bind(new.client_id)
                .bind(new.date)
                .bind(&new.time_label)
                .fetch_one(&self.pool)
                .await?;

                Ok(CreateOutcome::Duplicate(existing_id))
            }

            Err(e) => Err(e.into()),
        }
    }
}
