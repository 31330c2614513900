use std::sync::RwLock;

use crate::domain::{ports::VectorIndex, Chunk, DomainError, Embedding};
use crate::infrastructure::vector_store::FlatL2Index;

struct Inner {
    chunks: Vec<Chunk>,
    index: Box<dyn VectorIndex>,
}

/// Process-wide chunk list kept positionally aligned with a vector index.
///
/// Position `i` in the chunk list always describes vector `i` in the index. Both
/// sides are only ever mutated together, under the same write lock.
pub struct ChunkStore {
    inner: RwLock<Inner>,
}

impl ChunkStore {
    pub fn new(dimension: usize) -> Self {
        Self::with_index(Box::new(FlatL2Index::new(dimension)))
    }

    pub fn with_index(index: Box<dyn VectorIndex>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                chunks: Vec::new(),
                index,
            }),
        }
    }

    pub fn len(&self) -> Result<usize, DomainError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        Ok(inner.chunks.len())
    }

    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len()? == 0)
    }

    /// Number of vectors held by the index. Equal to `len()` at all times.
    pub fn indexed_len(&self) -> Result<usize, DomainError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        Ok(inner.index.len())
    }

    /// Appends chunks and their embeddings together, or leaves the store untouched.
    pub fn append(&self, chunks: Vec<Chunk>, embeddings: &[Embedding]) -> Result<(), DomainError> {
        if chunks.len() != embeddings.len() {
            return Err(DomainError::internal(format!(
                "Got {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }
        if chunks.is_empty() {
            return Ok(());
        }

        let mut inner = self
            .inner
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        inner.index.add(embeddings)?;
        inner.chunks.extend(chunks);
        Ok(())
    }

    /// Returns up to `k` chunks nearest to `query`, closest first, with their distances.
    pub fn search(&self, query: &Embedding, k: usize) -> Result<Vec<(Chunk, f32)>, DomainError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        inner
            .index
            .search(query, k)?
            .into_iter()
            .map(|hit| {
                inner
                    .chunks
                    .get(hit.position)
                    .map(|chunk| (chunk.clone(), hit.distance))
                    .ok_or_else(|| {
                        DomainError::internal(format!(
                            "Index returned position {} outside chunk store",
                            hit.position
                        ))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts.iter().map(|t| Chunk::new(*t, "notes.txt")).collect()
    }

    fn embeddings(values: &[f32]) -> Vec<Embedding> {
        values.iter().map(|v| Embedding::new(vec![*v, 0.0])).collect()
    }

    #[test]
    fn test_append_keeps_alignment_across_batches() {
        let store = ChunkStore::new(2);

        store.append(chunks(&["a", "b"]), &embeddings(&[1.0, 2.0])).unwrap();
        store.append(chunks(&["c"]), &embeddings(&[3.0])).unwrap();

        assert_eq!(store.len().unwrap(), 3);
        assert_eq!(store.indexed_len().unwrap(), 3);
    }

    #[test]
    fn test_search_maps_positions_to_chunks() {
        let store = ChunkStore::new(2);
        store
            .append(chunks(&["far", "near", "middle"]), &embeddings(&[9.0, 1.0, 4.0]))
            .unwrap();

        let results = store.search(&Embedding::new(vec![0.0, 0.0]), 2).unwrap();
        let texts: Vec<&str> = results.iter().map(|(c, _)| c.text.as_str()).collect();

        assert_eq!(texts, vec!["near", "middle"]);
        assert_eq!(results[0].1, 1.0);
    }

    #[test]
    fn test_append_rejects_count_mismatch() {
        let store = ChunkStore::new(2);
        let err = store.append(chunks(&["a", "b"]), &embeddings(&[1.0]));

        assert!(err.is_err());
        assert!(store.is_empty().unwrap());
        assert_eq!(store.indexed_len().unwrap(), 0);
    }

    #[test]
    fn test_append_rejects_bad_dimension_without_partial_commit() {
        let store = ChunkStore::new(2);
        store.append(chunks(&["a"]), &embeddings(&[1.0])).unwrap();

        let bad = vec![Embedding::new(vec![1.0, 1.0]), Embedding::new(vec![1.0, 1.0, 1.0])];
        assert!(store.append(chunks(&["b", "c"]), &bad).is_err());

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.indexed_len().unwrap(), 1);
    }

    #[test]
    fn test_append_empty_batch_is_noop() {
        let store = ChunkStore::new(2);
        store.append(Vec::new(), &[]).unwrap();
        assert!(store.is_empty().unwrap());
    }
}
