use nt_core::{Error, Result};

pub mod models;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_CHAT_MODEL: &str = "deepseek/deepseek-chat-v3-0324:free";
pub const DEFAULT_EMBEDDING_URL: &str = "http://localhost:11434/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";

/// Which model implementation `create_model` builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    #[default]
    OpenRouter,
    Dummy,
}

impl std::str::FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openrouter" | "deepseek" => Ok(ModelKind::OpenRouter),
            "dummy" => Ok(ModelKind::Dummy),
            other => Err(Error::Inference(format!(
                "Unknown model: {}. Available models: openrouter (default), dummy",
                other
            ))),
        }
    }
}

/// Where and how to reach the OpenAI-compatible embeddings endpoint.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub url: String,
    pub model_name: String,
    pub api_key: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_EMBEDDING_URL.to_string(),
            model_name: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelKind,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model_name: String,
    pub temperature: f32,
    pub embedding: EmbeddingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelKind::default(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model_name: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.0,
            embedding: EmbeddingConfig::default(),
        }
    }
}

pub mod prelude {
    pub use super::{Config, EmbeddingConfig, ModelKind};
    pub use super::models::create_model;
    pub use nt_core::{ArticleAnalysis, ExtractedArticle, InferenceModel, Result, Error};
}

pub use models::create_model;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_parsing() {
        assert_eq!("OpenRouter".parse::<ModelKind>().unwrap(), ModelKind::OpenRouter);
        assert_eq!("deepseek".parse::<ModelKind>().unwrap(), ModelKind::OpenRouter);
        assert_eq!("dummy".parse::<ModelKind>().unwrap(), ModelKind::Dummy);
        assert!("gpt".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model, ModelKind::OpenRouter);
        assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.embedding.model_name, "all-minilm");
    }
}
