//! Gemini API integration
//!
//! Image generation via the `generateContent` endpoint, requesting both text
//! and image response modalities. The response is a list of content parts;
//! the first part carrying inline data is the image.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Model used for image generation
const IMAGE_MODEL: &str = "gemini-2.0-flash-exp";

/// Default API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API errors
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Gemini API key not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(reqwest::StatusCode),

    #[error("no image data in response")]
    NoImage,
}

/// An inline image returned by the model
///
/// The payload stays base64-encoded as received; it is decoded at serve time.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

/// Gemini API client
#[derive(Debug)]
pub struct GeminiClient {
    /// HTTP client
    client: Client,
    /// API key
    api_key: Option<String>,
    /// API base URL
    base_url: String,
}

impl GeminiClient {
    /// Create a new client from `GEMINI_API_KEY` / `GEMINI_API_URL`
    pub fn new() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        let base_url =
            std::env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_config(api_key, base_url)
    }

    /// Create a client with an explicit key and base URL
    pub fn with_config(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        // No request timeout: a slow provider call stalls only its own request.
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into(),
        }
    }

    /// Check if an API key is configured
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate an image from a prompt
    ///
    /// Single attempt; any provider failure surfaces immediately.
    pub async fn generate_image(&self, prompt: &str) -> Result<InlineImage, GeminiError> {
        let api_key = self.api_key.as_ref().ok_or(GeminiError::NotConfigured)?;

        let request = GenerateContentRequest::for_prompt(prompt);

        debug!("requesting image generation from Gemini");

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, IMAGE_MODEL
            ))
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API error: {} - {}", status, body);
            return Err(GeminiError::Api(status));
        }

        let body: GenerateContentResponse = response.json().await?;
        let image = extract_inline_image(body)?;

        debug!(
            "Gemini returned {} ({} base64 chars)",
            image.mime_type,
            image.data.len()
        );
        Ok(image)
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the first inline-data part from the response, in order
fn extract_inline_image(response: GenerateContentResponse) -> Result<InlineImage, GeminiError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|content| content.parts.into_iter().find_map(|p| p.inline_data))
        .map(|d| InlineImage {
            mime_type: d.mime_type,
            data: d.data,
        })
        .ok_or(GeminiError::NoImage)
}

/// Generation request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

impl GenerateContentRequest {
    fn for_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![TextPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT", "IMAGE"],
            },
        }
    }
}

/// Generation response
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_uses_camel_case() {
        let request = GenerateContentRequest::for_prompt("a red barn");
        let json = serde_json::to_value(&request).unwrap();

        assert!(json.get("generationConfig").is_some());
        assert!(json.get("generation_config").is_none());
        assert_eq!(
            json["generationConfig"]["responseModalities"],
            serde_json::json!(["TEXT", "IMAGE"])
        );
        assert_eq!(json["contents"][0]["parts"][0]["text"], "a red barn");
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": {
                            "mimeType": "image/png",
                            "data": "iVBORw0KGgo="
                        }
                    }]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let image = extract_inline_image(response).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "iVBORw0KGgo=");
    }

    #[test]
    fn test_first_inline_part_wins() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "here you go"},
                        {"inlineData": {"mimeType": "image/png", "data": "Zmlyc3Q="}},
                        {"inlineData": {"mimeType": "image/png", "data": "c2Vjb25k"}}
                    ]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let image = extract_inline_image(response).unwrap();
        assert_eq!(image.data, "Zmlyc3Q=");
    }

    #[test]
    fn test_text_only_response_is_no_image() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "sorry, no image"}]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            extract_inline_image(response),
            Err(GeminiError::NoImage)
        ));
    }

    #[test]
    fn test_empty_response_is_no_image() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            extract_inline_image(response),
            Err(GeminiError::NoImage)
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_client_fails() {
        let client = GeminiClient::with_config(None, DEFAULT_BASE_URL);
        assert!(!client.is_configured());

        let result = client.generate_image("a red barn").await;
        assert!(matches!(result, Err(GeminiError::NotConfigured)));
    }
}
