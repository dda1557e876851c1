//! HTTP API module - REST endpoints

mod generate;
mod images;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::gemini::{GeminiClient, GeminiError};
use crate::images::ImageStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub images: Arc<ImageStore>,
    pub gemini: Arc<GeminiClient>,
}

/// Errors surfaced at the HTTP boundary
///
/// Converted to a status code and a generic `{error}` JSON body exactly once,
/// here; internal detail is logged, not leaked.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("prompt parameter is required")]
    MissingPrompt,

    #[error("image not found")]
    NotFound,

    #[error("image generation failed: {0}")]
    Generation(#[from] GeminiError),

    #[error("cached image data is corrupt: {0}")]
    Corrupt(#[from] base64::DecodeError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingPrompt => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Generation(_) | ApiError::Corrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::MissingPrompt => "Prompt parameter is required",
            ApiError::NotFound => "Image not found",
            ApiError::Generation(_) => "Failed to generate image",
            ApiError::Corrupt(_) => "Failed to load image",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(generate::router())
        .merge(images::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        name: "imaged",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        generator: if state.gemini.is_configured() {
            "configured"
        } else {
            "unconfigured"
        },
        images: state.images.len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    generator: &'static str,
    images: usize,
}
