//! Deterministic provider fakes for tests. No network or model downloads.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::{
    ports::{CompletionOptions, EmbeddingService, LlmService},
    DomainError, Embedding, Message,
};

pub const FAKE_DIMENSION: usize = 16;

/// Character-histogram embedding: identical texts map to identical vectors.
#[derive(Default)]
pub struct HashEmbedding {
    calls: AtomicUsize,
}

impl HashEmbedding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn vector_for(text: &str) -> Embedding {
        let mut buckets = vec![0.0f32; FAKE_DIMENSION];
        for c in text.chars() {
            buckets[c as u32 as usize % FAKE_DIMENSION] += 1.0;
        }
        Embedding::new(buckets)
    }
}

#[async_trait]
impl EmbeddingService for HashEmbedding {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
    }

    fn dimension(&self) -> usize {
        FAKE_DIMENSION
    }
}

pub struct FailingEmbedding {
    dimension: usize,
}

impl FailingEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl EmbeddingService for FailingEmbedding {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Embedding>, DomainError> {
        Err(DomainError::external("embedding backend unavailable"))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

pub struct SlowEmbedding {
    delay: Duration,
    inner: HashEmbedding,
}

impl SlowEmbedding {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: HashEmbedding::new(),
        }
    }
}

#[async_trait]
impl EmbeddingService for SlowEmbedding {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, DomainError> {
        tokio::time::sleep(self.delay).await;
        self.inner.embed_batch(texts).await
    }

    fn dimension(&self) -> usize {
        FAKE_DIMENSION
    }
}

/// Returns a fixed completion and records every request it receives.
pub struct ScriptedLlm {
    reply: Option<String>,
    requests: Mutex<Vec<(Vec<Message>, CompletionOptions)>>,
}

impl ScriptedLlm {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn last_request(&self) -> Option<(Vec<Message>, CompletionOptions)> {
        self.requests.lock().ok()?.last().cloned()
    }
}

#[async_trait]
impl LlmService for ScriptedLlm {
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<String, DomainError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((messages.to_vec(), *options));
        }
        self.reply
            .clone()
            .ok_or_else(|| DomainError::external("rate limit exceeded"))
    }
}

pub struct SlowLlm {
    delay: Duration,
}

impl SlowLlm {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl LlmService for SlowLlm {
    async fn complete(
        &self,
        _messages: &[Message],
        _options: &CompletionOptions,
    ) -> Result<String, DomainError> {
        tokio::time::sleep(self.delay).await;
        Ok("late".to_string())
    }
}
