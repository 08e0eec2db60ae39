use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Could not extract sufficient article text from {url}")]
    Extraction { url: String },

    #[error("Failed to decode embedding: {0}")]
    VectorDecode(String),

    #[error("Article not found: {0}")]
    NotFound(i64),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Errors caused by a collaborator outside this process (remote site, model API).
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Scraping(_) | Error::Http(_) | Error::Inference(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_carries_url() {
        let err = Error::Extraction {
            url: "https://example.com/a".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Could not extract sufficient article text from https://example.com/a"
        );
        assert!(!err.is_upstream());
    }

    #[test]
    fn test_upstream_classification() {
        assert!(Error::Scraping("503".to_string()).is_upstream());
        assert!(Error::Inference("bad json".to_string()).is_upstream());
        assert!(!Error::NotFound(1).is_upstream());
        assert!(!Error::VectorDecode("x".to_string()).is_upstream());
    }
}
