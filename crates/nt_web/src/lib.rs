use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Origins of the dashboard dev server.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:5173", "http://127.0.0.1:5173"];

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter(|origin| {
            // A wildcard cannot be combined with credentials
            if origin.trim() == "*" {
                warn!("Ignoring wildcard CORS origin; list explicit origins instead");
                return false;
            }
            true
        })
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub async fn create_app(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/articles", get(handlers::list_articles).post(handlers::create_article))
        .route("/articles/:id", get(handlers::get_article))
        .route("/articles/:id/similar", get(handlers::get_similar_articles))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use nt_core::{Result, Error};
    pub use crate::{create_app, AppState, DEFAULT_ALLOWED_ORIGINS};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use nt_core::{Error, ExtractionConfig, RawPage, Result, SimilarityRanker};
    use nt_inference::models::DummyModel;
    use nt_scrappers::{ArticlePipeline, Extractor, Fetcher};
    use nt_storage::MemoryStorage;
    use serde_json::Value;
    use tower::ServiceExt;

    struct FakeFetcher;

    #[async_trait]
    impl Fetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<RawPage> {
            if url.contains("missing") {
                return Err(Error::Scraping(format!("{} returned 404 Not Found", url)));
            }
            if url.contains("thin") {
                return Ok(RawPage {
                    url: url.to_string(),
                    html: "<p>Nothing to see.</p>".to_string(),
                });
            }
            let paragraphs: String = (1..=5)
                .map(|n| format!("<p>Paragraph {} about {} goes on for long enough to keep.</p>", n, url))
                .collect();
            Ok(RawPage {
                url: url.to_string(),
                html: format!("<html><head><title>Story at {}</title></head><body>{}</body></html>", url, paragraphs),
            })
        }
    }

    async fn app() -> Router {
        let pipeline = ArticlePipeline::new(
            Arc::new(FakeFetcher),
            Extractor::new(ExtractionConfig::default()).unwrap(),
            Arc::new(DummyModel::new()),
            Arc::new(MemoryStorage::new().await.unwrap()),
            SimilarityRanker::default(),
        );
        let origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect();
        create_app(AppState::new(Arc::new(pipeline)), &origins).await
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_article(url: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/articles")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({ "url": url }).to_string()))
            .unwrap()
    }

    fn post_article_raw(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/articles")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let app = app().await;

        let (status, created) = send(&app, post_article("https://example.com/one")).await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["original_url"], "https://example.com/one");
        assert_eq!(created["translated_title"], "Story at https://example.com/one");
        assert!(created["embedding"].as_array().is_some_and(|e| !e.is_empty()));
        assert_eq!(created["entities"]["companies"], serde_json::json!([]));

        let (status, list) = send(&app, get("/articles")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["sentiment"], "Neutral");
        assert!(list[0].get("long_summary").is_none());

        let (status, detail) = send(&app, get(&format!("/articles/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(detail.get("embedding").is_none());
        assert_eq!(detail["long_summary"], created["long_summary"]);
    }

    #[tokio::test]
    async fn test_similar_endpoint() {
        let app = app().await;
        let mut ids = Vec::new();
        for path in ["a", "b", "c", "d", "e"] {
            let (_, created) = send(&app, post_article(&format!("https://example.com/{}", path))).await;
            ids.push(created["id"].as_i64().unwrap());
        }

        let (status, body) = send(&app, get(&format!("/articles/{}/similar", ids[0]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["target_id"], ids[0]);
        let similar = body["similar_articles"].as_array().unwrap();
        assert_eq!(similar.len(), 3);
        assert!(similar.iter().all(|a| a["id"] != ids[0]));
        assert!(similar.iter().all(|a| a["similarity_score"].is_number()));
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let app = app().await;

        let (status, body) = send(&app, post_article("not a url")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("Invalid URL"));

        let (status, _) = send(&app, post_article("https://example.com/thin")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&app, post_article("https://example.com/missing")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, body) = send(&app, get("/articles/41")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Article not found: 41");

        let (status, _) = send(&app, get("/articles/41/similar")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_body_gets_detail() {
        let app = app().await;
        for body in ["{}", "not json", r#"{"url": 42}"#] {
            let request = Request::builder()
                .method("POST")
                .uri("/articles")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(
                response.headers().get("content-type").unwrap(),
                "application/json"
            );
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json: Value = serde_json::from_slice(&bytes).unwrap();
            assert!(json["detail"].is_string());
        }

        let (status, body) = send(&app, post_article_raw("{}")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("url"));
    }

    #[tokio::test]
    async fn test_wildcard_origin_is_ignored() {
        let pipeline = ArticlePipeline::new(
            Arc::new(FakeFetcher),
            Extractor::new(ExtractionConfig::default()).unwrap(),
            Arc::new(DummyModel::new()),
            Arc::new(MemoryStorage::new().await.unwrap()),
            SimilarityRanker::default(),
        );
        let origins = vec!["*".to_string(), "http://localhost:5173".to_string()];
        let app = create_app(AppState::new(Arc::new(pipeline)), &origins).await;

        let request = Request::builder()
            .uri("/articles")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );

        let request = Request::builder()
            .uri("/articles")
            .header("origin", "http://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn test_cors_allows_dashboard_origin() {
        let app = app().await;
        let request = Request::builder()
            .uri("/articles")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
    }
}
