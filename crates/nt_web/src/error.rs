use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nt_core::Error;
use serde_json::json;
use tracing::{error, warn};

/// Maps pipeline errors and rejected request bodies onto HTTP responses
/// with a `{"detail": ...}` body.
#[derive(Debug)]
pub enum ApiError {
    Pipeline(Error),
    /// The request body was not the JSON the endpoint expects.
    InvalidBody(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self::Pipeline(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Pipeline(err) => match err {
                Error::InvalidUrl(_) | Error::Extraction { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                Error::NotFound(_) => StatusCode::NOT_FOUND,
                err if err.is_upstream() => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::Pipeline(err) => err.to_string(),
            ApiError::InvalidBody(message) => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        if status.is_server_error() {
            error!("❌ {}", detail);
        } else {
            warn!("⚠️ {}", detail);
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
