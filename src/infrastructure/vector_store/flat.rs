use crate::domain::{ports::VectorIndex, DomainError, Embedding, SearchHit};

/// Exact nearest-neighbour index over squared Euclidean distance.
///
/// Vectors are stored back to back in a single buffer; search is a linear scan.
pub struct FlatL2Index {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    fn vector(&self, position: usize) -> &[f32] {
        let start = position * self.dimension;
        &self.data[start..start + self.dimension]
    }
}

impl VectorIndex for FlatL2Index {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        if self.dimension == 0 {
            return 0;
        }
        self.data.len() / self.dimension
    }

    fn add(&mut self, vectors: &[Embedding]) -> Result<(), DomainError> {
        if let Some(bad) = vectors.iter().find(|v| v.dimension() != self.dimension) {
            return Err(DomainError::internal(format!(
                "Embedding dimension {} does not match index dimension {}",
                bad.dimension(),
                self.dimension
            )));
        }

        self.data.reserve(vectors.len() * self.dimension);
        for vector in vectors {
            self.data.extend_from_slice(vector.as_slice());
        }
        Ok(())
    }

    fn search(&self, query: &Embedding, k: usize) -> Result<Vec<SearchHit>, DomainError> {
        if query.dimension() != self.dimension {
            return Err(DomainError::internal(format!(
                "Query dimension {} does not match index dimension {}",
                query.dimension(),
                self.dimension
            )));
        }

        let mut hits: Vec<SearchHit> = (0..self.len())
            .map(|position| SearchHit {
                position,
                distance: query.squared_l2(self.vector(position)),
            })
            .collect();

        // Stable sort keeps insertion order among equal distances.
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);

        Ok(hits)
    }
}
