// src/db/discount_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::discount::Discount};

// Resultado do incremento de uso: ou gravou, ou o limite já tinha estourado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageCommit {
    Committed,
    LimitExceeded,
}

#[async_trait]
pub trait DiscountRepository: Send + Sync {
    async fn get_by_code(&self, code: &str) -> Result<Option<Discount>, AppError>;

    async fn create(&self, discount: &Discount) -> Result<Discount, AppError>;

    // Incremento condicional ATÔMICO no banco. Dois clientes resgatando o
    // mesmo código ao mesmo tempo nunca passam do limite — a decisão é do
    // UPDATE, não de uma leitura velha no serviço.
    async fn commit_usage(&self, id: Uuid) -> Result<UsageCommit, AppError>;
}

#[derive(Clone)]
pub struct PgDiscountRepository {
    pool: PgPool,
}

impl PgDiscountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DiscountRepository for PgDiscountRepository {
    async fn get_by_code(&self, code: &str) -> Result<Option<Discount>, AppError> {
        let discount =
            sqlx::query_as::<_, Discount>("SELECT * FROM discounts WHERE code = $1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;

        Ok(discount)
    }

    async fn create(&self, discount: &Discount) -> Result<Discount, AppError> {
        let created = sqlx::query_as::<_, Discount>(
            r#"
            INSERT INTO discounts (
                code, name, discount_type, value, start_date, end_date,
                usage_limit, min_amount, is_active,
                applies_to_all, package_ids, session_ids
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&discount.code)
        .bind(&discount.name)
        .bind(discount.discount_type)
        .bind(discount.value)
        .bind(discount.start_date)
        .bind(discount.end_date)
        .bind(discount.usage_limit)
        .bind(discount.min_amount)
        .bind(discount.is_active)
        .bind(discount.applies_to_all)
        .bind(&discount.package_ids)
        .bind(&discount.session_ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn commit_usage(&self, id: Uuid) -> Result<UsageCommit, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE discounts
               SET current_usage = current_usage + 1
             WHERE id = $1
               AND is_active
               AND (usage_limit IS NULL OR current_usage < usage_limit)
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(UsageCommit::LimitExceeded)
        } else {
            Ok(UsageCommit::Committed)
        }
    }
}
