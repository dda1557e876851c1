//! Image serving endpoint
//!
//! GET /generated/{id}.png - Serve a cached image

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::{ApiError, AppState};

/// Build the serving router
pub fn router() -> Router<AppState> {
    Router::new().route("/generated/{image}", get(get_image))
}

/// Serve a cached image as PNG
async fn get_image(
    Path(image): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    // Only `<id>.png` paths are valid; the id itself carries no extension.
    let id = image.strip_suffix(".png").ok_or(ApiError::NotFound)?;

    let cached = state.images.get(id).ok_or(ApiError::NotFound)?;
    let bytes = BASE64.decode(cached.data.as_bytes())?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_LENGTH, bytes.len().to_string()),
        ],
        bytes,
    ))
}
