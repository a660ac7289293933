use catalog_service::config::CatalogConfig;
use catalog_service::services::init_metrics;
use catalog_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CatalogConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    init_tracing("catalog-service", "info", config.otlp_endpoint.as_deref());

    // Recorder must be installed before any metric is recorded
    if let Err(e) = init_metrics() {
        tracing::warn!("Failed to install Prometheus recorder: {}", e);
    }

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    tracing::info!("Server stopped");
    Ok(())
}
