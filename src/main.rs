use doc_qa::api::{create_router, AppState};
use doc_qa::domain::ports::EmbeddingService;
use doc_qa::infrastructure::{embedding, AppConfig, GroqLlm};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,doc_qa=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    info!(model = %config.config.llm.model, "configuration loaded");

    let embedding_config = config.config.embedding.clone();
    let embedder =
        tokio::task::spawn_blocking(move || embedding::from_config(&embedding_config)).await??;
    info!(
        provider = ?config.config.embedding.provider,
        dimension = embedder.dimension(),
        "embedding provider ready"
    );

    let llm = Arc::new(GroqLlm::from_config(&config.config.llm));
    info!(model = llm.model(), "Groq client initialized");

    let addr = SocketAddr::new(
        config.config.server.host.parse()?,
        config.config.server.port,
    );

    let state = AppState::new(config, embedder, llm);
    let app = create_router(state);

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
