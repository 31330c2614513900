mod chunk;
mod embedding;
mod message;

pub use chunk::{chunk_text, Chunk, SearchHit, DEFAULT_CHUNK_SIZE};
pub use embedding::Embedding;
pub use message::{Message, MessageRole};
