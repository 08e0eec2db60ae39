pub mod extractor;
pub mod fetch;
pub mod manager;

pub use extractor::{Extractor, TitleRule, TitleStrategy};
pub use fetch::{Fetcher, HttpFetcher};
pub use manager::ArticlePipeline;

pub mod prelude {
    pub use super::extractor::Extractor;
    pub use super::fetch::Fetcher;
    pub use super::manager::ArticlePipeline;
    pub use nt_core::{ExtractedArticle, Result, Error};
}
