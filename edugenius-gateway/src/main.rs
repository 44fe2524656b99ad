use anyhow::Context;
use edugenius_core::{GeminiClient, StudyEngine, WikipediaClient};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

mod config;
mod routes;

use config::GatewayConfig;
use routes::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "edugenius_gateway=info,edugenius_core=info,tower_http=info".into()
            }),
        )
        .init();

    let config = GatewayConfig::from_env().map_err(|e| {
        error!(error = %e, "Error initializing APIs");
        e
    })?;

    info!(
        host = %config.host,
        port = config.port,
        model = edugenius_core::llm::GEMINI_MODEL,
        "Initializing EduGenius API"
    );

    // API clients are built once and shared read-only by every request.
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .context("Failed to create HTTP client")?;

    let llm = Arc::new(GeminiClient::new(
        http_client.clone(),
        config.gemini_api_key.clone(),
    ));
    let knowledge = Arc::new(WikipediaClient::new(http_client));

    let app_state = Arc::new(AppState {
        engine: StudyEngine::new(llm, knowledge),
    });

    let app = build_router(app_state);

    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_addr()))?;

    info!(addr = %addr, "Starting EduGenius API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
