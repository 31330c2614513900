mod embedding;
mod llm;
mod vector_index;

pub use embedding::EmbeddingService;
pub use llm::{CompletionOptions, LlmService};
pub use vector_index::VectorIndex;
