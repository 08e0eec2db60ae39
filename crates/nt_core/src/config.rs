use serde::{Deserialize, Serialize};

/// Thresholds and keywords used by the HTML extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Candidate paragraphs shorter than this (in characters) are treated as boilerplate.
    pub min_paragraph_chars: usize,
    /// Bodies shorter than this (in characters) fail extraction.
    pub min_body_chars: usize,
    /// Lowercase substrings that mark a `div` class as a content container.
    pub container_keywords: Vec<String>,
    pub fallback_title: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_paragraph_chars: 40,
            min_body_chars: 300,
            container_keywords: ["content", "main", "body", "post", "article"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            fallback_title: "Untitled".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Maximum number of similar articles returned per query.
    pub top_k: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.min_paragraph_chars, 40);
        assert_eq!(config.min_body_chars, 300);
        assert_eq!(config.container_keywords.len(), 5);
        assert_eq!(config.fallback_title, "Untitled");
        assert_eq!(SimilarityConfig::default().top_k, 3);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ExtractionConfig =
            serde_json::from_str(r#"{"min_body_chars": 500}"#).unwrap();
        assert_eq!(config.min_body_chars, 500);
        assert_eq!(config.min_paragraph_chars, 40);
        assert_eq!(config.fallback_title, "Untitled");
    }
}
