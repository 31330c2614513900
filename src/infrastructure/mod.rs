pub mod config;
pub mod embedding;
pub mod llm;
pub mod vector_store;

pub use config::{AppConfig, Config, ConfigError, PromptsConfig};
pub use embedding::{LocalEmbedding, TextEmbedding};
pub use llm::GroqLlm;
pub use vector_store::{ChunkStore, FlatL2Index};
