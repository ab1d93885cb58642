use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use askdata::config::Config;
use askdata::llm::GeminiClient;
use askdata::models::AppState;
use askdata::routes::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askdata=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; a missing credential is fatal before the server binds
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    let generator = Arc::new(GeminiClient::new(
        &config.llm.google_api_key,
        &config.llm.model,
    ));
    info!(model = %config.llm.model, "Gemini client ready");

    let state = AppState::new(config.clone(), generator);
    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
