use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use nt_core::{ArticleRecord, ArticleStorage, NewArticle, Result};
use tokio::sync::RwLock;

/// Rows kept in insertion (and therefore id) order.
#[derive(Debug)]
pub struct MemoryStore {
    articles: Vec<ArticleRecord>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            articles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn insert_article(&mut self, article: &NewArticle) -> ArticleRecord {
        let record = ArticleRecord {
            id: self.next_id,
            original_url: article.original_url.clone(),
            translated_title: Some(article.translated_title.clone()),
            publication_date: Utc::now(),
            long_summary: Some(article.long_summary.clone()),
            sentiment: Some(article.sentiment.to_string()),
            entities: Some(article.entities.clone()),
            embedding: Some(article.embedding.clone()),
        };
        self.next_id += 1;
        self.articles.push(record.clone());
        record
    }

    pub fn list_articles(&self) -> Vec<ArticleRecord> {
        let mut articles = self.articles.clone();
        articles.sort_by(|a, b| {
            b.publication_date
                .cmp(&a.publication_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        articles
    }

    pub fn get_article(&self, id: i64) -> Option<ArticleRecord> {
        self.articles.iter().find(|a| a.id == id).cloned()
    }

    pub fn list_articles_except(&self, id: i64) -> Vec<ArticleRecord> {
        self.articles.iter().filter(|a| a.id != id).cloned().collect()
    }
}

pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub async fn new() -> Result<Self> {
        Ok(Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
        })
    }

    /// Inserts a row as-is, keeping its id and date. Used to seed fixtures.
    pub async fn insert_record(&self, record: ArticleRecord) {
        let mut store = self.store.write().await;
        store.next_id = store.next_id.max(record.id + 1);
        store.articles.push(record);
        store.articles.sort_by_key(|a| a.id);
    }
}

#[async_trait]
impl ArticleStorage for MemoryStorage {
    async fn insert_article(&self, article: &NewArticle) -> Result<ArticleRecord> {
        let mut store = self.store.write().await;
        Ok(store.insert_article(article))
    }

    async fn list_articles(&self) -> Result<Vec<ArticleRecord>> {
        let store = self.store.read().await;
        Ok(store.list_articles())
    }

    async fn get_article(&self, id: i64) -> Result<Option<ArticleRecord>> {
        let store = self.store.read().await;
        Ok(store.get_article(id))
    }

    async fn list_articles_except(&self, id: i64) -> Result<Vec<ArticleRecord>> {
        let store = self.store.read().await;
        Ok(store.list_articles_except(id))
    }
}
