// src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use coachfit_backend::{config::AppState, docs::ApiDoc, handlers};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Sessões: publicação e disponibilidade
    let session_routes = Router::new()
        .route("/", post(handlers::catalog::create_session))
        .route("/{id}/slots", get(handlers::availability::list_session_slots));

    let quote_routes = Router::new().route("/", post(handlers::quotes::create_quote));

    let booking_routes = Router::new().route("/", post(handlers::bookings::create_booking));

    let discount_routes = Router::new()
        .route("/", post(handlers::discounts::create_discount))
        .route("/{code}/preview", get(handlers::discounts::preview_discount));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/sessions", session_routes)
        .nest("/api/quotes", quote_routes)
        .nest("/api/bookings", booking_routes)
        .nest("/api/discounts", discount_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
