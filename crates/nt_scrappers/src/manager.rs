use std::sync::Arc;

use nt_core::{
    encode_vector, ArticleCreated, ArticleDetail, ArticleListItem, ArticleStorage, Error,
    InferenceModel, NewArticle, RankCandidate, Result, SimilarityRanker, SimilarityResponse,
};
use tracing::info;

use crate::extractor::Extractor;
use crate::fetch::{parse_url, Fetcher};

/// Drives an article from URL to stored record, and answers the read-side
/// queries (list, detail, similar).
pub struct ArticlePipeline {
    fetcher: Arc<dyn Fetcher>,
    extractor: Extractor,
    inference: Arc<dyn InferenceModel>,
    storage: Arc<dyn ArticleStorage>,
    ranker: SimilarityRanker,
}

impl ArticlePipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extractor: Extractor,
        inference: Arc<dyn InferenceModel>,
        storage: Arc<dyn ArticleStorage>,
        ranker: SimilarityRanker,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            inference,
            storage,
            ranker,
        }
    }

    /// Fetch, extract, analyze, embed and store one article.
    pub async fn create_from_url(&self, url: &str) -> Result<ArticleCreated> {
        parse_url(url)?;

        info!("🦗 Fetching {}", url);
        let page = self.fetcher.fetch(url).await?;

        let extracted = self.extractor.extract_page(&page)?;
        info!(
            "📰 Extracted \"{}\" ({} chars of text)",
            extracted.title,
            extracted.body.chars().count()
        );

        info!("🤖 Analyzing article with {}", self.inference.name());
        let analysis = self.inference.analyze_article(&extracted).await?;

        info!("🔢 Generating summary embedding");
        let embedding = self.inference.generate_embeddings(&analysis.long_summary).await?;
        if embedding.is_empty() {
            return Err(Error::Inference("Embedding model returned an empty vector".to_string()));
        }

        let new_article = NewArticle {
            original_url: url.to_string(),
            translated_title: analysis.translated_title.clone(),
            long_summary: analysis.long_summary.clone(),
            sentiment: analysis.sentiment,
            entities: serde_json::to_string(&analysis.entities)?,
            embedding: encode_vector(&embedding)?,
        };
        let record = self.storage.insert_article(&new_article).await?;
        info!("✨ Stored article {} ({})", record.id, record.original_url);

        Ok(ArticleCreated {
            id: record.id,
            original_url: record.original_url,
            translated_title: analysis.translated_title,
            publication_date: record.publication_date,
            long_summary: analysis.long_summary,
            sentiment: analysis.sentiment,
            entities: analysis.entities,
            embedding,
        })
    }

    /// Newest first.
    pub async fn list(&self) -> Result<Vec<ArticleListItem>> {
        self.storage
            .list_articles()
            .await?
            .iter()
            .map(|record| record.to_list_item())
            .collect()
    }

    pub async fn get(&self, id: i64) -> Result<ArticleDetail> {
        self.storage
            .get_article(id)
            .await?
            .ok_or(Error::NotFound(id))?
            .to_detail()
    }

    pub async fn similar(&self, id: i64) -> Result<SimilarityResponse> {
        let target = self.storage.get_article(id).await?.ok_or(Error::NotFound(id))?;
        let others = self.storage.list_articles_except(id).await?;

        let similar_articles = self
            .ranker
            .rank_encoded(target.embedding.as_deref(), others.iter().map(RankCandidate::from))?;
        info!("🔍 Found {} articles similar to {}", similar_articles.len(), id);

        Ok(SimilarityResponse {
            target_id: target.id,
            similar_articles,
        })
    }
}
