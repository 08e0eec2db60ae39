use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A fetched HTML document and the URL it came from.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub url: String,
    pub html: String,
}

/// Title and main text pulled out of an HTML page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedArticle {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(alias = "positive", alias = "POSITIVE")]
    Positive,
    #[default]
    #[serde(alias = "neutral", alias = "NEUTRAL")]
    Neutral,
    #[serde(alias = "negative", alias = "NEGATIVE")]
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }

    /// Reads a stored column value; a missing or blank value counts as neutral.
    pub fn from_column(value: Option<&str>) -> Result<Self> {
        match value.map(str::trim) {
            None | Some("") => Ok(Sentiment::Neutral),
            Some(s) => s.parse(),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(Error::Storage(format!("Unknown sentiment: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub persons: Vec<String>,
    #[serde(default)]
    pub areas: Vec<String>,
}

/// Output of the language model for one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleAnalysis {
    pub translated_title: String,
    pub long_summary: String,
    pub sentiment: Sentiment,
    #[serde(default)]
    pub entities: Entities,
}

/// An article ready to be inserted. `entities` and `embedding` are already
/// serialized to JSON text.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub original_url: String,
    pub translated_title: String,
    pub long_summary: String,
    pub sentiment: Sentiment,
    pub entities: String,
    pub embedding: String,
}

/// A stored row as the backends return it.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    pub id: i64,
    pub original_url: String,
    pub translated_title: Option<String>,
    pub publication_date: DateTime<Utc>,
    pub long_summary: Option<String>,
    pub sentiment: Option<String>,
    pub entities: Option<String>,
    pub embedding: Option<String>,
}

impl ArticleRecord {
    pub fn decode_entities(&self) -> Result<Entities> {
        match self.entities.as_deref().map(str::trim) {
            None | Some("") => Ok(Entities::default()),
            Some(raw) => Ok(serde_json::from_str(raw)?),
        }
    }

    pub fn sentiment(&self) -> Result<Sentiment> {
        Sentiment::from_column(self.sentiment.as_deref())
    }

    pub fn to_list_item(&self) -> Result<ArticleListItem> {
        Ok(ArticleListItem {
            id: self.id,
            translated_title: self.translated_title.clone().unwrap_or_default(),
            publication_date: self.publication_date,
            sentiment: self.sentiment()?,
        })
    }

    pub fn to_detail(&self) -> Result<ArticleDetail> {
        Ok(ArticleDetail {
            id: self.id,
            original_url: self.original_url.clone(),
            translated_title: self.translated_title.clone().unwrap_or_default(),
            publication_date: self.publication_date,
            long_summary: self.long_summary.clone().unwrap_or_default(),
            sentiment: self.sentiment()?,
            entities: self.decode_entities()?,
        })
    }
}

/// Full record returned after ingesting a URL, embedding included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleCreated {
    pub id: i64,
    pub original_url: String,
    pub translated_title: String,
    pub publication_date: DateTime<Utc>,
    pub long_summary: String,
    pub sentiment: Sentiment,
    pub entities: Entities,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleListItem {
    pub id: i64,
    pub translated_title: String,
    pub publication_date: DateTime<Utc>,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDetail {
    pub id: i64,
    pub original_url: String,
    pub translated_title: String,
    pub publication_date: DateTime<Utc>,
    pub long_summary: String,
    pub sentiment: Sentiment,
    pub entities: Entities,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub id: i64,
    pub original_url: String,
    pub translated_title: String,
    pub similarity_score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResponse {
    pub target_id: i64,
    pub similar_articles: Vec<SimilarityResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ArticleRecord {
        ArticleRecord {
            id: 7,
            original_url: "https://example.com/news".to_string(),
            translated_title: None,
            publication_date: Utc::now(),
            long_summary: None,
            sentiment: None,
            entities: None,
            embedding: None,
        }
    }

    #[test]
    fn test_sentiment_parsing() {
        assert_eq!("Positive".parse::<Sentiment>().unwrap(), Sentiment::Positive);
        assert_eq!("negative".parse::<Sentiment>().unwrap(), Sentiment::Negative);
        assert!("angry".parse::<Sentiment>().is_err());
        assert_eq!(Sentiment::from_column(None).unwrap(), Sentiment::Neutral);
        assert_eq!(Sentiment::from_column(Some("  ")).unwrap(), Sentiment::Neutral);
    }

    #[test]
    fn test_sentiment_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&Sentiment::Negative).unwrap(), "\"Negative\"");
    }

    #[test]
    fn test_missing_columns_fall_back() {
        let detail = record().to_detail().unwrap();
        assert_eq!(detail.translated_title, "");
        assert_eq!(detail.long_summary, "");
        assert_eq!(detail.sentiment, Sentiment::Neutral);
        assert_eq!(detail.entities, Entities::default());
    }

    #[test]
    fn test_entities_decode() {
        let mut row = record();
        row.entities = Some(r#"{"companies":["Acme"],"persons":[]}"#.to_string());
        let entities = row.decode_entities().unwrap();
        assert_eq!(entities.companies, vec!["Acme".to_string()]);
        assert!(entities.areas.is_empty());

        row.entities = Some("not json".to_string());
        assert!(matches!(row.decode_entities(), Err(Error::Serialization(_))));
    }
}
