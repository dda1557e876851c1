//! Image generation endpoint
//!
//! GET /image?prompt=... - Generate an image and cache it

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ApiError, AppState};

/// Build the generation router
pub fn router() -> Router<AppState> {
    Router::new().route("/image", get(generate_image))
}

#[derive(Debug, Deserialize)]
struct GenerateParams {
    #[serde(default)]
    prompt: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    success: bool,
    image: String,
    prompt: String,
}

/// Generate an image from the `prompt` query parameter
///
/// On success the image is cached and the response carries an absolute URL
/// where it can be fetched.
async fn generate_image(
    Query(params): Query<GenerateParams>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<GenerateResponse>, ApiError> {
    let prompt = match params.prompt.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ApiError::MissingPrompt),
    };

    let image = state.gemini.generate_image(prompt).await?;
    let id = state.images.put(image.data);

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let url = format!("http://{}/generated/{}.png", host, id);

    info!("generated image {} for a {}-char prompt", id, prompt.len());

    Ok(Json(GenerateResponse {
        success: true,
        image: url,
        prompt: prompt.to_string(),
    }))
}
