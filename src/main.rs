use fintwin::api::{self, app_state::AppState};
use fintwin::config::ConfigLoader;
use fintwin::config::loader::{config_exists, default_config_path};
use fintwin::llm::LlmBackend;
use fintwin::observability::{
    AppMetrics, ObservabilityState, create_observability_router, init_logging,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load()?;
    ConfigLoader::validate(&config)?;

    // guard 必须持有到进程结束，否则文件日志会丢失
    let _log_guard = init_logging(&config.logging);
    info!(
        "Starting {} ({} environment)...",
        config.app_name, config.environment
    );
    if !config_exists() {
        info!(
            "{} not found, using defaults and environment variables",
            default_config_path().display()
        );
    }

    let llm_backend = LlmBackend::from_config(&config.llm)?;
    info!("LLM backend initialized: {}", llm_backend.mode());

    let metrics = Arc::new(AppMetrics::default());
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION"),
        llm_backend.mode(),
        metrics.clone(),
    ));

    let app_state = AppState::in_memory(config, llm_backend, metrics);
    info!("Application state created");

    let router = create_observability_router(observability_state).merge(api::create_router(app_state));
    info!("API router created with observability endpoints");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
