use tracing::debug;

use crate::config::SimilarityConfig;
use crate::types::{ArticleRecord, SimilarityResult};
use crate::{Error, Result};

/// Cosine similarity between two vectors.
///
/// Returns a value in `[-1.0, 1.0]`. A zero-norm vector, or a pair of vectors
/// with different lengths, has similarity `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0) as f32
}

/// Parses a stored embedding blob (a JSON array of numbers).
pub fn decode_vector(raw: &str) -> Result<Vec<f32>> {
    let vector: Vec<f32> = serde_json::from_str(raw)
        .map_err(|e| Error::VectorDecode(format!("not a numeric array: {}", e)))?;
    if let Some(pos) = vector.iter().position(|v| !v.is_finite()) {
        return Err(Error::VectorDecode(format!("non-finite value at index {}", pos)));
    }
    Ok(vector)
}

pub fn encode_vector(vector: &[f32]) -> Result<String> {
    Ok(serde_json::to_string(vector)?)
}

/// One stored article competing for a place in the similarity ranking.
#[derive(Debug, Clone, Copy)]
pub struct RankCandidate<'a> {
    pub id: i64,
    pub original_url: &'a str,
    pub translated_title: &'a str,
    pub embedding: Option<&'a str>,
}

impl<'a> From<&'a ArticleRecord> for RankCandidate<'a> {
    fn from(record: &'a ArticleRecord) -> Self {
        Self {
            id: record.id,
            original_url: &record.original_url,
            translated_title: record.translated_title.as_deref().unwrap_or_default(),
            embedding: record.embedding.as_deref(),
        }
    }
}

impl RankCandidate<'_> {
    fn decode(&self, dimension: usize) -> Result<Vec<f32>> {
        let raw = self
            .embedding
            .ok_or_else(|| Error::VectorDecode(format!("article {} has no embedding", self.id)))?;
        let vector = decode_vector(raw)?;
        if vector.len() != dimension {
            return Err(Error::VectorDecode(format!(
                "dimension {} does not match target dimension {}",
                vector.len(),
                dimension
            )));
        }
        Ok(vector)
    }
}

/// Ranks stored articles by cosine similarity to a target embedding.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityRanker {
    top_k: usize,
}

impl Default for SimilarityRanker {
    fn default() -> Self {
        Self::new(&SimilarityConfig::default())
    }
}

impl SimilarityRanker {
    pub fn new(config: &SimilarityConfig) -> Self {
        Self { top_k: config.top_k }
    }

    /// Scores every candidate against `target` and keeps the best `top_k`,
    /// highest score first.
    ///
    /// Candidates whose embedding is missing, unparseable or of a different
    /// dimension are skipped. Equal scores keep their input order.
    pub fn rank<'a, I>(&self, target: &[f32], candidates: I) -> Vec<SimilarityResult>
    where
        I: IntoIterator<Item = RankCandidate<'a>>,
    {
        let mut scored: Vec<SimilarityResult> = candidates
            .into_iter()
            .filter_map(|candidate| match candidate.decode(target.len()) {
                Ok(vector) => Some(SimilarityResult {
                    id: candidate.id,
                    original_url: candidate.original_url.to_string(),
                    translated_title: candidate.translated_title.to_string(),
                    similarity_score: cosine_similarity(target, &vector),
                }),
                Err(e) => {
                    debug!("Skipping article {} in similarity ranking: {}", candidate.id, e);
                    None
                }
            })
            .collect();

        // sort_by is stable, so ties stay in input order
        scored.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        scored.truncate(self.top_k);
        scored
    }

    /// Like [`rank`](Self::rank), but decodes the target blob first. A target
    /// that cannot be decoded fails the whole call.
    pub fn rank_encoded<'a, I>(&self, target: Option<&str>, candidates: I) -> Result<Vec<SimilarityResult>>
    where
        I: IntoIterator<Item = RankCandidate<'a>>,
    {
        let raw = target.ok_or_else(|| Error::VectorDecode("target article has no embedding".to_string()))?;
        let target = decode_vector(raw)?;
        Ok(self.rank(&target, candidates))
    }
}
