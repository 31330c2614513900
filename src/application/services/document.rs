use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::domain::{
    chunk_text, ports::EmbeddingService, Chunk, DomainError, DEFAULT_CHUNK_SIZE,
};
use crate::infrastructure::ChunkStore;

pub const UNSUPPORTED_ENCODING: &str = "Only UTF-8 text files supported";

const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(120);

/// Upload pipeline: decode, chunk, embed, then commit to the chunk store.
pub struct DocumentService {
    embedding: Arc<dyn EmbeddingService>,
    store: Arc<ChunkStore>,
    chunk_size: usize,
    timeout: Duration,
}

impl DocumentService {
    pub fn new(embedding: Arc<dyn EmbeddingService>, store: Arc<ChunkStore>) -> Self {
        Self {
            embedding,
            store,
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout: DEFAULT_EMBED_TIMEOUT,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ingests raw upload bytes. Returns the number of chunks added.
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub async fn ingest(&self, source: &str, bytes: &[u8]) -> Result<usize, DomainError> {
        let text =
            std::str::from_utf8(bytes).map_err(|_| DomainError::validation(UNSUPPORTED_ENCODING))?;
        self.ingest_text(source, text).await
    }

    /// Nothing reaches the store unless every chunk was embedded.
    #[instrument(skip(self, text))]
    pub async fn ingest_text(&self, source: &str, text: &str) -> Result<usize, DomainError> {
        let texts = chunk_text(text, self.chunk_size);
        if texts.is_empty() {
            return Ok(0);
        }

        let embeddings = tokio::time::timeout(self.timeout, self.embedding.embed_batch(&texts))
            .await
            .map_err(|_| DomainError::timeout("Embedding request timed out"))??;

        let chunks: Vec<Chunk> = texts
            .into_iter()
            .map(|text| Chunk::new(text, source))
            .collect();
        let added = chunks.len();

        self.store.append(chunks, &embeddings)?;

        tracing::info!(source, chunks = added, "document indexed");
        Ok(added)
    }
}
