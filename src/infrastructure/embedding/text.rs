use async_trait::async_trait;
use rig::client::{EmbeddingsClient, ProviderClient};
use rig::embeddings::EmbeddingsBuilder;
use rig::providers::openai;

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;

/// Remote embeddings from the OpenAI API. Reads `OPENAI_API_KEY`.
pub struct TextEmbedding {
    client: openai::Client,
    model: String,
    dimension: usize,
}

impl TextEmbedding {
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self {
            client: openai::Client::from_env(),
            model: config.model.clone(),
            dimension: config.dimension,
        }
    }
}

#[async_trait]
impl EmbeddingService for TextEmbedding {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.client.embedding_model(&self.model);
        let embedded = EmbeddingsBuilder::new(model)
            .documents(texts.iter().cloned())
            .map_err(|e| DomainError::external(e.to_string()))?
            .build()
            .await
            .map_err(|e| DomainError::external(format!("OpenAI embedding failed: {e}")))?;

        if embedded.len() != texts.len() {
            return Err(DomainError::external(format!(
                "OpenAI returned {} embeddings for {} texts",
                embedded.len(),
                texts.len()
            )));
        }

        Ok(embedded
            .into_iter()
            .map(|(_text, vectors)| {
                Embedding::new(vectors.first().vec.into_iter().map(|x| x as f32).collect())
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
