use std::fmt;

use nt_core::{ArticleAnalysis, Entities, ExtractedArticle, InferenceModel, Result, Sentiment};

const DIMENSION: usize = 64;

/// Offline model for tests and local runs. Deterministic: the same input
/// always produces the same analysis and embedding.
#[derive(Default)]
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn analyze_article(&self, article: &ExtractedArticle) -> Result<ArticleAnalysis> {
        // First three sentences stand in for the summary
        let sentences: Vec<&str> = article
            .body
            .split_inclusive(|c: char| matches!(c, '.' | '!' | '?'))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .take(3)
            .collect();

        Ok(ArticleAnalysis {
            translated_title: article.title.clone(),
            long_summary: sentences.join(" "),
            sentiment: Sentiment::Neutral,
            entities: Entities::default(),
        })
    }

    async fn generate_embeddings(&self, text: &str) -> Result<Vec<f32>> {
        // Bag of lowercase characters, bucketed by code point
        let mut embedding = vec![0.0; DIMENSION];
        for c in text.chars().filter(|c| c.is_alphanumeric()) {
            for lower in c.to_lowercase() {
                embedding[lower as u32 as usize % DIMENSION] += 1.0;
            }
        }
        Ok(embedding)
    }
}
