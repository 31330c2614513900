use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::domain::{
    ports::{CompletionOptions, EmbeddingService, LlmService},
    Chunk, DomainError, Message,
};
use crate::infrastructure::{config::RagPrompts, ChunkStore};

pub const QUESTION_REQUIRED: &str = "Question required";
pub const EMPTY_STORE: &str = "Upload documents first";

const DEFAULT_TOP_K: usize = 3;
const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
    pub sources: Vec<String>,
}

/// Query pipeline: embed the question, retrieve the nearest chunks and ask the LLM.
pub struct RagService {
    embedding: Arc<dyn EmbeddingService>,
    llm: Arc<dyn LlmService>,
    store: Arc<ChunkStore>,
    top_k: usize,
    prompts: RagPrompts,
    options: CompletionOptions,
    embed_timeout: Duration,
    llm_timeout: Duration,
}

impl RagService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        llm: Arc<dyn LlmService>,
        store: Arc<ChunkStore>,
    ) -> Self {
        Self {
            embedding,
            llm,
            store,
            top_k: DEFAULT_TOP_K,
            prompts: RagPrompts::default(),
            options: CompletionOptions::default(),
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
            llm_timeout: DEFAULT_LLM_TIMEOUT,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_prompts(mut self, prompts: RagPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_completion_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_timeouts(mut self, embed: Duration, llm: Duration) -> Self {
        self.embed_timeout = embed;
        self.llm_timeout = llm;
        self
    }

    /// Returns the chunks nearest to `question`, closest first.
    ///
    /// Fails with a validation error before touching any provider when the
    /// question is empty or nothing has been uploaded yet.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, question: &str) -> Result<Vec<Chunk>, DomainError> {
        if question.is_empty() {
            return Err(DomainError::validation(QUESTION_REQUIRED));
        }

        let stored = self.store.len()?;
        if stored == 0 {
            return Err(DomainError::validation(EMPTY_STORE));
        }

        let query = tokio::time::timeout(self.embed_timeout, self.embedding.embed(question))
            .await
            .map_err(|_| DomainError::timeout("Embedding request timed out"))??;

        let k = self.top_k.min(stored);
        let hits = self.store.search(&query, k)?;

        tracing::debug!(k, hits = hits.len(), "retrieved context");
        Ok(hits.into_iter().map(|(chunk, _distance)| chunk).collect())
    }

    #[instrument(skip(self))]
    pub async fn answer(&self, question: &str) -> Result<Answer, DomainError> {
        let sources: Vec<String> = self
            .retrieve(question)
            .await?
            .into_iter()
            .map(|chunk| chunk.text)
            .collect();

        let messages = self.build_messages(question, &sources);

        let completion =
            tokio::time::timeout(self.llm_timeout, self.llm.complete(&messages, &self.options))
                .await
                .map_err(|_| DomainError::timeout("LLM request timed out"))??;

        Ok(Answer {
            question: question.to_string(),
            answer: completion.trim().to_string(),
            sources,
        })
    }

    pub fn build_messages(&self, question: &str, context: &[String]) -> Vec<Message> {
        let context = context.join("\n\n");
        vec![
            Message::system(self.prompts.system.clone()),
            Message::user(render_template(
                &self.prompts.user_template,
                &context,
                question,
            )),
        ]
    }
}

/// Substitutes `{context}` and `{question}` in one pass so placeholder text inside
/// either value is left alone.
fn render_template(template: &str, context: &str, question: &str) -> String {
    const CONTEXT: &str = "{context}";
    const QUESTION: &str = "{question}";

    let mut out = String::with_capacity(template.len() + context.len() + question.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix(CONTEXT) {
            out.push_str(context);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(QUESTION) {
            out.push_str(question);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);

    out
}
