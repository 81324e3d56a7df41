// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AppointmentRepository, DiscountRepository, OfferingRepository, PgAppointmentRepository,
        PgDiscountRepository, PgOfferingRepository,
    },
    services::{BookingService, DiscountService, PricingService, ScheduleService},
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub offering_repo: Arc<dyn OfferingRepository>,
    pub schedule_service: ScheduleService,
    pub pricing_service: PricingService,
    pub discount_service: DiscountService,
    pub booking_service: BookingService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let offering_repo: Arc<dyn OfferingRepository> =
            Arc::new(PgOfferingRepository::new(db_pool.clone()));
        let discount_repo: Arc<dyn DiscountRepository> =
            Arc::new(PgDiscountRepository::new(db_pool.clone()));
        let appointment_repo: Arc<dyn AppointmentRepository> =
            Arc::new(PgAppointmentRepository::new(db_pool.clone()));

        let schedule_service = ScheduleService::new();
        let pricing_service = PricingService::new();
        let discount_service = DiscountService::new(Arc::clone(&discount_repo));
        let booking_service = BookingService::new(
            Arc::clone(&offering_repo),
            appointment_repo,
            discount_service.clone(),
            schedule_service.clone(),
            pricing_service.clone(),
        );

        Ok(Self {
            db_pool,
            offering_repo,
            schedule_service,
            pricing_service,
            discount_service,
            booking_service,
        })
    }
}
