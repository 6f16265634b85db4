use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use scholaris::logging::init_tracing;
use scholaris::metrics::init_metrics;
use scholaris::router::init_router;
use scholaris::state::init_app_state;
use scholaris_config::ServerConfig;
use scholaris_db::run_migrations;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let server_config = ServerConfig::from_env();
    let metrics = init_metrics();
    let state = init_app_state(metrics)
        .await
        .context("Failed to initialize application state")?;

    if std::env::var("RUN_MIGRATIONS").map_or(true, |v| v != "false") {
        run_migrations(&state.db)
            .await
            .context("Failed to run migrations")?;
    }

    let app = init_router(state);

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(
        address = %address,
        environment = %server_config.environment,
        "Server running; docs at /swagger-ui and /scalar"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
