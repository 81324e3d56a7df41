// src/db/offering_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::offering::{Membership, ScheduleRule, SessionPackage, TrainingSession},
};

// Contrato estreito que o motor consome: buscar por id, criar sessão.
// A spec de cada variante mora no modelo; aqui é só persistência.
#[async_trait]
pub trait OfferingRepository: Send + Sync {
    async fn get_session(&self, id: Uuid) -> Result<Option<TrainingSession>, AppError>;
    async fn get_package(&self, id: Uuid) -> Result<Option<SessionPackage>, AppError>;
    async fn get_membership(&self, id: Uuid) -> Result<Option<Membership>, AppError>;

    // Cria a sessão já com suas regras de agenda (tudo ou nada)
    async fn create_session(
        &self,
        session: &TrainingSession,
    ) -> Result<TrainingSession, AppError>;
}

#[derive(Clone)]
pub struct PgOfferingRepository {
    pool: PgPool,
}

impl PgOfferingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfferingRepository for PgOfferingRepository {
    async fn get_session(&self, id: Uuid) -> Result<Option<TrainingSession>, AppError> {
        let session = sqlx::query_as::<_, TrainingSession>(
            "SELECT * FROM training_sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut session) = session else {
            return Ok(None);
        };

        // Regras na ordem de cadastro: a primeira cadastrada vence empates
        session.schedule_rules = sqlx::query_as::<_, ScheduleRule>(
            "SELECT * FROM schedule_rules WHERE session_id = $1 ORDER BY position ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(session))
    }

    async fn get_package(&self, id: Uuid) -> Result<Option<SessionPackage>, AppError> {
        let package = sqlx::query_as::<_, SessionPackage>(
            "SELECT * FROM session_packages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(package)
    }

    async fn get_membership(&self, id: Uuid) -> Result<Option<Membership>, AppError> {
        let membership =
            sqlx::query_as::<_, Membership>("SELECT * FROM memberships WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(membership)
    }

    async fn create_session(
        &self,
        session: &TrainingSession,
    ) -> Result<TrainingSession, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut created = sqlx::query_as::<_, TrainingSession>(
            r#"
            INSERT INTO training_sessions (
                trainer_id, name, description, duration_label, location,
                base_price, max_capacity, frequency, date, start_date, end_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(session.trainer_id)
        .bind(&session.name)
        .bind(&session.description)
        .bind(&session.duration_label)
        .bind(&session.location)
        .bind(session.base_price)
        .bind(session.max_capacity)
        .bind(session.frequency)
        .bind(session.date)
        .bind(session.start_date)
        .bind(session.end_date)
        .fetch_one(&mut *tx)
        .await?;

        for (position, rule) in session.schedule_rules.iter().enumerate() {
            let saved = sqlx::query_as::<_, ScheduleRule>(
                r#"
                INSERT INTO schedule_rules (session_id, weekday, start_time, end_time, position)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(created.id)
            .bind(rule.weekday)
            .bind(rule.start_time)
            .bind(rule.end_time)
            .bind(position as i32)
            .fetch_one(&mut *tx)
            .await?;

            created.schedule_rules.push(saved);
        }

        tx.commit().await?;
        Ok(created)
    }
}
