use anyhow::Context;
use clap::Parser;
use genai_relay::{router, Relay, RelayConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Relay chat widget requests to generative-AI providers
#[derive(Debug, Parser)]
#[command(name = "genai-relay", version, about)]
struct Args {
    /// Address to bind
    #[arg(long, env = "RELAY_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "RELAY_PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before clap reads env defaults
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,genai_relay=debug")),
        )
        .init();

    let config = RelayConfig::from_env().context("invalid relay configuration")?;

    // Missing credentials are reported per request, not fatal at startup
    if let Err(e) = config.chat.validate() {
        warn!(provider = config.chat.provider_name(), error = %e, "Chat requests will fail until fixed");
    }
    if let Err(e) = config.image.validate() {
        warn!(provider = config.image.provider_name(), error = %e, "Image requests will fail until fixed");
    }

    let relay = Arc::new(Relay::from_config(&config)?);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        %addr,
        chat_provider = relay.chat_provider_name(),
        image_provider = relay.image_provider_name(),
        timeout_seconds = config.request_timeout.as_secs(),
        "Relay listening"
    );

    axum::serve(listener, router(relay))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
