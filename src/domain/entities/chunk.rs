use serde::{Deserialize, Serialize};

pub const DEFAULT_CHUNK_SIZE: usize = 300;

/// A slice of an uploaded document, the unit of retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub source: String,
}

impl Chunk {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

/// A ranked match returned by a vector index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub position: usize,
    pub distance: f32,
}

/// Splits text into consecutive slices of at most `chunk_size` characters.
///
/// Boundaries are counted in characters, not bytes, and ignore word or sentence
/// structure. Concatenating the result yields the input unchanged. Empty input
/// produces no chunks.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == chunk_size {
            chunks.push(text[start..offset].to_string());
            start = offset;
            count = 0;
        }
        count += 1;
    }
    chunks.push(text[start..].to_string());

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_text_empty() {
        assert!(chunk_text("", DEFAULT_CHUNK_SIZE).is_empty());
    }

    #[test]
    fn test_chunk_text_shorter_than_chunk() {
        let chunks = chunk_text("Hello world.", DEFAULT_CHUNK_SIZE);
        assert_eq!(chunks, vec!["Hello world.".to_string()]);
    }

    #[test]
    fn test_chunk_text_650_chars() {
        let text: String = (0..650).map(|i| (b'a' + (i % 26) as u8) as char).collect();
        let chunks = chunk_text(&text, DEFAULT_CHUNK_SIZE);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 300);
        assert_eq!(chunks[1].chars().count(), 300);
        assert_eq!(chunks[2].chars().count(), 50);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_chunk_text_exact_multiple() {
        let text = "x".repeat(600);
        let chunks = chunk_text(&text, DEFAULT_CHUNK_SIZE);

        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == 300));
    }

    #[test]
    fn test_chunk_text_counts_characters_not_bytes() {
        let text = "é".repeat(7);
        let chunks = chunk_text(&text, 3);

        assert_eq!(chunks, vec!["ééé", "ééé", "é"]);
    }

    #[test]
    fn test_chunk_text_splits_mid_word() {
        let chunks = chunk_text("hello world", 4);
        assert_eq!(chunks, vec!["hell", "o wo", "rld"]);
    }

    #[test]
    fn test_chunk_count_is_ceiling() {
        for len in [1usize, 299, 300, 301, 899, 900, 901] {
            let text = "z".repeat(len);
            let expected = len.div_ceil(DEFAULT_CHUNK_SIZE);
            assert_eq!(chunk_text(&text, DEFAULT_CHUNK_SIZE).len(), expected, "len {len}");
        }
    }
}
