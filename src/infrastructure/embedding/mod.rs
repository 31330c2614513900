mod local;
mod text;

pub use local::LocalEmbedding;
pub use text::TextEmbedding;

use std::sync::Arc;

use crate::domain::{ports::EmbeddingService, DomainError};
use crate::infrastructure::config::{EmbeddingConfig, EmbeddingProvider};

/// Builds the embedding provider selected by `embedding.provider`.
///
/// The local model is loaded eagerly so a bad model name or a failed download
/// surfaces at startup rather than on the first upload.
pub fn from_config(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingService>, DomainError> {
    match config.provider {
        EmbeddingProvider::Local => Ok(Arc::new(LocalEmbedding::try_new(config)?)),
        EmbeddingProvider::Openai => Ok(Arc::new(TextEmbedding::from_config(config))),
    }
}
