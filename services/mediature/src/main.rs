use sea_orm::Database;
use tracing::info;

use mediature::config::MediatureConfig;
use mediature::router::build_router;
use mediature::state::AppState;

#[tokio::main]
async fn main() {
    mediature_core::tracing::init_tracing();

    let config = MediatureConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        front_base_url: config.front_base_url,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.mediature_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("mediature service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
