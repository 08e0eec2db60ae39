use std::sync::Arc;
use nt_scrappers::ArticlePipeline;

pub struct AppState {
    pub pipeline: Arc<ArticlePipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<ArticlePipeline>) -> Self {
        Self { pipeline }
    }
}
