use async_trait::async_trait;
use crate::types::{ArticleAnalysis, ExtractedArticle};
use crate::Result;

#[async_trait]
pub trait InferenceModel: Send + Sync {
    /// Short human readable name, used in logs
    fn name(&self) -> &str;

    /// Translate the title, summarize, classify sentiment and pull out named entities
    async fn analyze_article(&self, article: &ExtractedArticle) -> Result<ArticleAnalysis>;

    /// Generate embeddings for a piece of text
    async fn generate_embeddings(&self, text: &str) -> Result<Vec<f32>>;
}
