use std::fmt;
use std::sync::Arc;

use nt_core::{ArticleAnalysis, Error, ExtractedArticle, InferenceModel, Result};
use reqwest::Client;
use tracing::debug;

use super::{
    parse_analysis, ChatMessage, ChatRequest, ChatResponse, EmbeddingRequest, EmbeddingResponse,
    ResponseFormat,
};
use crate::{Config, EmbeddingConfig};

const SCHEMA_HINT: &str = r#"{
  "translated_title": "the original title translated into English, at most 20 words",
  "long_summary": "a detailed 5-8 sentence English summary of the full article text",
  "sentiment": "Positive | Neutral | Negative",
  "entities": {"companies": ["..."], "persons": ["..."], "areas": ["..."]}
}"#;

/// Chat analysis through an OpenAI-compatible chat completions API
/// (OpenRouter by default), embeddings through an OpenAI-compatible
/// `/embeddings` endpoint.
pub struct OpenRouterModel {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    model_name: String,
    temperature: f32,
    embedding: EmbeddingConfig,
}

impl fmt::Debug for OpenRouterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .field("embedding_url", &self.embedding.url)
            .field("embedding_model", &self.embedding.model_name)
            .finish()
    }
}

impl OpenRouterModel {
    pub fn new(config: Config) -> Result<Self> {
        let api_key = config
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Inference("OPENROUTER_API_KEY is required".to_string()))?;
        Ok(Self {
            client: Arc::new(Client::new()),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_name: config.model_name,
            temperature: config.temperature,
            embedding: config.embedding,
        })
    }

    pub(crate) fn build_prompt(article: &ExtractedArticle) -> String {
        format!(
            "You are a professional news analysis assistant. Always respond in ENGLISH ONLY.\n\n\
             Original Title:\n{}\n\n\
             Full Article Text:\n{}\n\n\
             Return JSON only, following this schema:\n{}",
            article.title, article.body, SCHEMA_HINT
        )
    }

    fn chat_request(&self, article: &ExtractedArticle) -> ChatRequest {
        ChatRequest {
            model: self.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::build_prompt(article),
            }],
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
        }
    }
}

#[async_trait::async_trait]
impl InferenceModel for OpenRouterModel {
    fn name(&self) -> &str {
        "OpenRouter"
    }

    async fn analyze_article(&self, article: &ExtractedArticle) -> Result<ArticleAnalysis> {
        let request = self.chat_request(article);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Inference("AI analysis failed: no choices returned".to_string()))?;
        debug!("Analysis reply: {}", content);

        parse_analysis(&content)
    }

    async fn generate_embeddings(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            input: text.to_string(),
            model: self.embedding.model_name.clone(),
        };

        let mut builder = self
            .client
            .post(format!("{}/embeddings", self.embedding.url.trim_end_matches('/')))
            .json(&request);
        if let Some(key) = &self.embedding.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await?
            .error_for_status()?
            .json::<EmbeddingResponse>()
            .await?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::Inference("Embedding generation failed: empty response".to_string()))
    }
}
