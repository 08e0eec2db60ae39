use std::sync::Arc;

use nt_core::{ArticleAnalysis, Error, InferenceModel, Result};
use serde::{Deserialize, Serialize};

use crate::{Config, ModelKind};

pub mod dummy;
pub mod openrouter;

pub use dummy::DummyModel;
pub use openrouter::OpenRouterModel;

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: Message,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Message {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmbeddingRequest {
    pub input: String,
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingResponse {
    pub data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingData {
    pub embedding: Vec<f32>,
}

/// Parses the model's reply into an analysis. Accepts a bare JSON object or
/// one wrapped in a Markdown code fence or surrounding prose.
pub fn parse_analysis(content: &str) -> Result<ArticleAnalysis> {
    let start = content.find('{');
    let end = content.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => {
            return Err(Error::Inference(format!(
                "Model reply contains no JSON object: {}",
                content.chars().take(200).collect::<String>()
            )))
        }
    };
    serde_json::from_str(json).map_err(|e| Error::Inference(format!("AI analysis failed: {}", e)))
}

pub async fn create_model(config: Option<Config>) -> Result<Arc<dyn InferenceModel>> {
    let config = config.unwrap_or_default();
    match config.model {
        ModelKind::OpenRouter => Ok(Arc::new(OpenRouterModel::new(config)?)),
        ModelKind::Dummy => Ok(Arc::new(DummyModel::new())),
    }
}
