mod flat;
mod in_memory;

pub use flat::FlatL2Index;
pub use in_memory::ChunkStore;
