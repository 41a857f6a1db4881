use consent_url_service::{server::start_server, ConsentUrlBuilder, EnvSource, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "consent_url_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let source = EnvSource::from_env()?;
    let builder = ConsentUrlBuilder::from_source(Some(&source))?;
    if builder.identity().tenant_id().is_empty() || builder.identity().client_id().is_empty() {
        tracing::warn!("AzureAd:TenantId or MicrosoftAppId is not set, consent URLs will be incomplete");
    }

    let server_config = ServerConfig::from_env()?;

    start_server(server_config, builder).await?;

    Ok(())
}
