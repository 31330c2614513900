use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::groq;

use crate::domain::{
    ports::{CompletionOptions, LlmService},
    DomainError, Message, MessageRole,
};
use crate::infrastructure::config::LlmConfig;

/// Chat completions served by Groq. Reads `GROQ_API_KEY`.
pub struct GroqLlm {
    client: groq::Client,
    model: String,
}

impl GroqLlm {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: groq::Client::from_env(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.model.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmService for GroqLlm {
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<String, DomainError> {
        let (preamble, prompt) = split_messages(messages)?;

        let agent = self
            .client
            .agent(&self.model)
            .preamble(&preamble)
            .temperature(options.temperature)
            .max_tokens(options.max_tokens)
            .build();

        agent
            .prompt(prompt.as_str())
            .await
            .map_err(|e| DomainError::external(format!("Groq completion failed: {e}")))
    }
}

/// Joins system messages into the preamble; the single user message becomes the prompt.
fn split_messages(messages: &[Message]) -> Result<(String, String), DomainError> {
    let preamble = messages
        .iter()
        .filter(|m| m.role == MessageRole::System)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut users = messages.iter().filter(|m| m.role == MessageRole::User);
    match (users.next(), users.next()) {
        (Some(user), None) => Ok((preamble, user.content.clone())),
        (None, _) => Err(DomainError::validation(
            "Completion needs a user message",
        )),
        (Some(_), Some(_)) => Err(DomainError::validation(
            "Completion takes a single user message",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_system_and_user() {
        let messages = vec![Message::system("Be brief."), Message::user("What is Rust?")];
        let (preamble, prompt) = split_messages(&messages).unwrap();

        assert_eq!(preamble, "Be brief.");
        assert_eq!(prompt, "What is Rust?");
    }

    #[test]
    fn test_split_requires_user_turn() {
        let messages = vec![Message::system("Be brief.")];
        assert!(split_messages(&messages).is_err());
    }

    #[test]
    fn test_split_rejects_multiple_user_turns() {
        let messages = vec![Message::user("Hi"), Message::user("What is Rust?")];
        assert!(split_messages(&messages).is_err());
    }
}
