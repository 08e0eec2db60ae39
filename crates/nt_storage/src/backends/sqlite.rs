use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use nt_core::{ArticleRecord, ArticleStorage, Error, NewArticle, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        original_url TEXT NOT NULL,
        translated_title TEXT,
        publication_date TEXT NOT NULL,
        long_summary TEXT,
        sentiment TEXT,
        entities TEXT,
        embedding TEXT
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_articles_publication_date
    ON articles (publication_date)
    "#,
    // Add future migrations here
];

const SELECT_COLUMNS: &str = "id, original_url, translated_title, publication_date, long_summary, sentiment, entities, embedding";

pub struct SQLiteStorage {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

fn db_error(context: &str) -> impl FnOnce(sqlx::Error) -> Error + '_ {
    move |e| Error::Database(format!("{}: {}", context, e))
}

/// Fixed-width UTC timestamps so text ordering matches time ordering.
fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn record_from_row(row: &SqliteRow) -> Result<ArticleRecord> {
    let date: String = row.try_get("publication_date").map_err(db_error("Failed to read row"))?;
    let publication_date = DateTime::parse_from_rfc3339(&date)
        .map_err(|e| Error::Database(format!("Failed to parse date {}: {}", date, e)))?
        .with_timezone(&Utc);

    Ok(ArticleRecord {
        id: row.try_get("id").map_err(db_error("Failed to read row"))?,
        original_url: row.try_get("original_url").map_err(db_error("Failed to read row"))?,
        translated_title: row.try_get("translated_title").map_err(db_error("Failed to read row"))?,
        publication_date,
        long_summary: row.try_get("long_summary").map_err(db_error("Failed to read row"))?,
        sentiment: row.try_get("sentiment").map_err(db_error("Failed to read row"))?,
        entities: row.try_get("entities").map_err(db_error("Failed to read row"))?,
        embedding: row.try_get("embedding").map_err(db_error("Failed to read row"))?,
    })
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(db_error("Failed to connect to database"))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &PathBuf {
        &self.db_path
    }
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    async fn insert_article(&self, article: &NewArticle) -> Result<ArticleRecord> {
        let publication_date = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO articles
            (original_url, translated_title, publication_date, long_summary, sentiment, entities, embedding)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.original_url)
        .bind(&article.translated_title)
        .bind(format_date(&publication_date))
        .bind(&article.long_summary)
        .bind(article.sentiment.as_str())
        .bind(&article.entities)
        .bind(&article.embedding)
        .execute(&*self.pool)
        .await
        .map_err(db_error("Failed to store article"))?;

        let id = result.last_insert_rowid();
        self.get_article(id)
            .await?
            .ok_or_else(|| Error::Database(format!("Article {} missing after insert", id)))
    }

    async fn list_articles(&self) -> Result<Vec<ArticleRecord>> {
        let sql = format!(
            "SELECT {} FROM articles ORDER BY publication_date DESC, id DESC",
            SELECT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(db_error("Failed to list articles"))?;
        rows.iter().map(record_from_row).collect()
    }

    async fn get_article(&self, id: i64) -> Result<Option<ArticleRecord>> {
        let sql = format!("SELECT {} FROM articles WHERE id = ?", SELECT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(db_error("Failed to get article"))?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn list_articles_except(&self, id: i64) -> Result<Vec<ArticleRecord>> {
        let sql = format!("SELECT {} FROM articles WHERE id != ? ORDER BY id ASC", SELECT_COLUMNS);
        let rows = sqlx::query(&sql)
            .bind(id)
            .fetch_all(&*self.pool)
            .await
            .map_err(db_error("Failed to list articles"))?;
        rows.iter().map(record_from_row).collect()
    }
}
