pub mod config;
pub mod error;
pub mod models;
pub mod similarity;
pub mod storage;
pub mod types;

pub use config::{ExtractionConfig, SimilarityConfig};
pub use error::Error;
pub use models::InferenceModel;
pub use similarity::{cosine_similarity, decode_vector, encode_vector, RankCandidate, SimilarityRanker};
pub use storage::ArticleStorage;
pub use types::*;

pub type Result<T> = std::result::Result<T, Error>;
