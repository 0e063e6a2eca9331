use service_core::observability::{init_tracing, shutdown_tracing};
use vote_service::config::VoteConfig;
use vote_service::services::init_metrics;
use vote_service::startup::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = VoteConfig::load().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        &config.telemetry.service_name,
        &config.telemetry.log_level,
        config.telemetry.otlp_endpoint.as_deref(),
    );

    init_metrics();

    tracing::info!(
        option_a = %config.ballot.option_a,
        option_b = %config.ballot.option_b,
        hostname = %config.hostname,
        "Loaded vote configuration"
    );

    let app = Application::build(config).await?;
    let result = app.run_until_stopped().await;

    shutdown_tracing();
    result.map_err(Into::into)
}
