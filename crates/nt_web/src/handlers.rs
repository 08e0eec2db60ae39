use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use nt_core::{ArticleCreated, ArticleDetail, ArticleListItem, SimilarityResponse};
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub url: String,
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ArticleListItem>>, ApiError> {
    Ok(Json(state.pipeline.list().await?))
}

pub async fn create_article(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<Json<ArticleCreated>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.pipeline.create_from_url(request.url.trim()).await?))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ArticleDetail>, ApiError> {
    Ok(Json(state.pipeline.get(id).await?))
}

pub async fn get_similar_articles(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SimilarityResponse>, ApiError> {
    Ok(Json(state.pipeline.similar(id).await?))
}
