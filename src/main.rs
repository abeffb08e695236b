//! Gateway server binary.

use llmgate::config::ConfigLoader;
use llmgate::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading any configuration
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "llmgate=info,tower_http=info".into()),
        )
        .init();

    let config = ConfigLoader::new()?.into_config()?;
    tracing::info!(
        app = %config.server.app_name,
        models = config.models.len(),
        services = config.services.len(),
        "configuration loaded"
    );

    server::serve(config).await?;
    Ok(())
}
