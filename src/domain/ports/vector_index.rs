use crate::domain::{errors::DomainError, Embedding, SearchHit};

/// Append-only collection of fixed-dimension vectors with nearest-neighbour search.
///
/// Positions are assigned in insertion order starting at 0 and never change.
pub trait VectorIndex: Send + Sync {
    fn dimension(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends all vectors or none of them.
    fn add(&mut self, vectors: &[Embedding]) -> Result<(), DomainError>;

    /// Returns up to `k` hits ordered by ascending squared Euclidean distance.
    fn search(&self, query: &Embedding, k: usize) -> Result<Vec<SearchHit>, DomainError>;
}
