use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions};
use std::sync::{Arc, Mutex};

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;

/// Sentence-transformer embeddings computed in-process with fastembed.
///
/// The ONNX model is downloaded from Hugging Face on first use and cached. Inference
/// is CPU bound, so it runs on the blocking thread pool.
pub struct LocalEmbedding {
    model: Arc<Mutex<fastembed::TextEmbedding>>,
    dimension: usize,
    batch_size: usize,
}

impl LocalEmbedding {
    pub fn try_new(config: &EmbeddingConfig) -> Result<Self, DomainError> {
        let (model, dimension) = resolve_model(&config.model)?;
        if dimension != config.dimension {
            return Err(DomainError::validation(format!(
                "Model {} produces {} dimensions, configured {}",
                config.model, dimension, config.dimension
            )));
        }

        let mut options = InitOptions::new(model).with_show_download_progress(true);
        if let Some(dir) = &config.cache_dir {
            options = options.with_cache_dir(dir.clone());
        }

        let text_embedding = fastembed::TextEmbedding::try_new(options).map_err(|e| {
            DomainError::external(format!("Failed to initialize embedding model: {e}"))
        })?;

        tracing::info!(model = %config.model, dimension, "local embedding model loaded");

        Ok(Self {
            model: Arc::new(Mutex::new(text_embedding)),
            dimension,
            batch_size: config.batch_size,
        })
    }
}

fn resolve_model(name: &str) -> Result<(EmbeddingModel, usize), DomainError> {
    match name {
        "all-minilm-l6-v2" => Ok((EmbeddingModel::AllMiniLML6V2, 384)),
        "bge-small-en-v1.5" => Ok((EmbeddingModel::BGESmallENV15, 384)),
        "bge-base-en-v1.5" => Ok((EmbeddingModel::BGEBaseENV15, 768)),
        other => Err(DomainError::validation(format!(
            "Unknown local embedding model: '{other}'. Supported models: \
             all-minilm-l6-v2, bge-small-en-v1.5, bge-base-en-v1.5"
        ))),
    }
}

#[async_trait]
impl EmbeddingService for LocalEmbedding {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.model.clone();
        let texts = texts.to_vec();
        let batch_size = self.batch_size;

        let vectors = tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|e| DomainError::internal(e.to_string()))?;
            model
                .embed(texts, Some(batch_size))
                .map_err(|e| DomainError::external(format!("Local embedding failed: {e}")))
        })
        .await
        .map_err(|e| DomainError::internal(format!("Embedding task panicked: {e}")))??;

        Ok(vectors.into_iter().map(Embedding::new).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_models() {
        assert_eq!(resolve_model("all-minilm-l6-v2").unwrap().1, 384);
        assert_eq!(resolve_model("bge-base-en-v1.5").unwrap().1, 768);
    }

    #[test]
    fn test_resolve_unknown_model() {
        let err = resolve_model("word2vec").unwrap_err();
        assert!(err.to_string().contains("word2vec"));
    }
}
