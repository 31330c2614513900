use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{ports::CompletionOptions, DEFAULT_CHUNK_SIZE};

pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

const DEFAULT_CONFIG_PATH: &str = "config/app.yaml";
const DEFAULT_PROMPTS_PATH: &str = "config/prompts.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingEnv(&'static str),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: PromptsConfig,
}

impl AppConfig {
    /// Loads configuration files and environment overrides, then checks required secrets.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("APP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let prompts_path =
            std::env::var("PROMPTS_CONFIG").unwrap_or_else(|_| DEFAULT_PROMPTS_PATH.into());

        let mut config: Config = read_yaml_or_default(Path::new(&config_path))?;
        let prompts: PromptsConfig = read_yaml_or_default(Path::new(&prompts_path))?;

        if let Ok(host) = std::env::var("SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("SERVER_PORT '{port}' is not a port")))?;
        }

        let app = Self { config, prompts };
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.config.rag.chunk_size == 0 {
            return Err(ConfigError::Invalid("rag.chunk_size must be positive".into()));
        }
        if self.config.rag.top_k == 0 {
            return Err(ConfigError::Invalid("rag.top_k must be positive".into()));
        }
        if self.config.embedding.dimension == 0 {
            return Err(ConfigError::Invalid(
                "embedding.dimension must be positive".into(),
            ));
        }

        require_env(GROQ_API_KEY_ENV)?;
        if self.config.embedding.provider == EmbeddingProvider::Openai {
            require_env(OPENAI_API_KEY_ENV)?;
        }
        Ok(())
    }
}

fn require_env(name: &'static str) -> Result<(), ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(ConfigError::MissingEnv(name)),
    }
}

fn read_yaml_or_default<T>(path: &Path) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de> + Default,
{
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(T::default());
    }

    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub rag: RagConfig,
    pub upload: UploadConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u64,
    pub timeout_seconds: u64,
}

impl LlmConfig {
    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.2,
            max_tokens: 300,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    Local,
    Openai,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub dimension: usize,
    pub batch_size: usize,
    pub timeout_seconds: u64,
    pub cache_dir: Option<PathBuf>,
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::Local,
            model: "all-minilm-l6-v2".to_string(),
            dimension: 384,
            batch_size: 32,
            timeout_seconds: 120,
            cache_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub chunk_size: usize,
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            top_k: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub rag: RagPrompts,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub system: String,
    /// `{context}` and `{question}` are substituted at query time.
    pub user_template: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            system: "You are a helpful workspace assistant. Answer clearly and concisely using the provided context.".to_string(),
            user_template: "\nContext:\n{context}\n\nQuestion:\n{question}\n".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.config.llm.model, "llama-3.1-8b-instant");
        assert_eq!(config.config.llm.completion_options().max_tokens, 300);
        assert_eq!(config.config.embedding.dimension, 384);
        assert_eq!(config.config.rag.chunk_size, 300);
        assert_eq!(config.config.rag.top_k, 3);
        assert!(config.prompts.rag.user_template.contains("{context}"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str(
            "llm:\n  model: llama-3.3-70b-versatile\nrag:\n  top_k: 5\n",
        )
        .unwrap();

        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(config.llm.temperature, 0.2);
        assert_eq!(config.rag.top_k, 5);
        assert_eq!(config.rag.chunk_size, 300);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_embedding_provider_parses_lowercase() {
        let config: EmbeddingConfig =
            serde_yaml::from_str("provider: openai\nmodel: text-embedding-3-small\ndimension: 1536\n")
                .unwrap();

        assert_eq!(config.provider, EmbeddingProvider::Openai);
        assert_eq!(config.dimension, 1536);
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let mut config = AppConfig::default();
        config.config.rag.chunk_size = 0;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let prompts: PromptsConfig =
            read_yaml_or_default(Path::new("does/not/exist.yaml")).unwrap();
        assert!(prompts.rag.system.starts_with("You are a helpful workspace assistant"));
    }
}
