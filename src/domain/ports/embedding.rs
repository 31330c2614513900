use crate::domain::{errors::DomainError, Embedding};
use async_trait::async_trait;

/// Turns text into fixed-length vectors.
///
/// `embed_batch` returns exactly one vector per input, in input order.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, DomainError>;

    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::internal("No embedding returned"))
    }

    fn dimension(&self) -> usize;
}
