use std::sync::Arc;

use crate::application::{DocumentService, RagService};
use crate::domain::ports::{EmbeddingService, LlmService};
use crate::infrastructure::{AppConfig, ChunkStore};

/// Shared handler context. Cloning is cheap; every clone sees the same store.
#[derive(Clone)]
pub struct AppState {
    pub document_service: Arc<DocumentService>,
    pub rag_service: Arc<RagService>,
    pub store: Arc<ChunkStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wires both services to a fresh, empty chunk store sized for `embedding`.
    pub fn new(
        config: AppConfig,
        embedding: Arc<dyn EmbeddingService>,
        llm: Arc<dyn LlmService>,
    ) -> Self {
        let store = Arc::new(ChunkStore::new(embedding.dimension()));
        let cfg = &config.config;

        let document_service = DocumentService::new(embedding.clone(), store.clone())
            .with_chunk_size(cfg.rag.chunk_size)
            .with_timeout(cfg.embedding.timeout());

        let rag_service = RagService::new(embedding, llm, store.clone())
            .with_top_k(cfg.rag.top_k)
            .with_prompts(config.prompts.rag.clone())
            .with_completion_options(cfg.llm.completion_options())
            .with_timeouts(cfg.embedding.timeout(), cfg.llm.timeout());

        Self {
            document_service: Arc::new(document_service),
            rag_service: Arc::new(rag_service),
            store,
            config: Arc::new(config),
        }
    }
}
