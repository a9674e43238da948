//! academy-server: HTTP entry point

use academy_server::utils::logger;
use academy_server::{Backend, Config, api};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    logger::init_logger(config.log_level.as_deref(), config.log_dir.as_deref());

    tracing::info!(
        "Starting academy-server (env: {}, heal: {:?})",
        config.environment,
        config.heal_policy
    );

    let app = match Backend::from_config(&config).await? {
        Backend::Memory(state) => api::create_router(state),
        Backend::Postgres(state) => api::create_router(state),
    };

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("academy-server HTTP listening on {http_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("academy-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
