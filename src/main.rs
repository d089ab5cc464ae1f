use tracing_subscriber::EnvFilter;

use medai::api;
use medai::config::Config;
use medai::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Index file: {}", config.index_file().display());
    tracing::info!(
        "LLM provider: {} ({}), embeddings: {} ({})",
        config.llm.provider,
        config.llm.chat_model,
        config.embedding.provider,
        config.embedding.model
    );

    let state = AppState::new(config.clone())?;
    state.logger.info(format!("{} started", config.service_name));

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
