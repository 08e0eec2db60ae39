use async_trait::async_trait;
use crate::types::{ArticleRecord, NewArticle};
use crate::Result;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Store a new article; the backend assigns the id and publication date
    async fn insert_article(&self, article: &NewArticle) -> Result<ArticleRecord>;

    /// All articles, newest publication date first
    async fn list_articles(&self) -> Result<Vec<ArticleRecord>>;

    async fn get_article(&self, id: i64) -> Result<Option<ArticleRecord>>;

    /// Every article except `id`, in ascending id order
    async fn list_articles_except(&self, id: i64) -> Result<Vec<ArticleRecord>>;
}
