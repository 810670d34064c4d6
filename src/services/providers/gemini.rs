//! Gemini image provider implementation.
//!
//! Sends a single synchronous `generateContent` call and extracts the
//! first inline-data part from the first candidate.

use super::{GeneratedImage, ImageProvider, ImageRequest, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Server-side API key; callers may still supply their own per request.
    pub api_key: Option<Secret<String>>,
}

/// Gemini image provider.
pub struct GeminiImageProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiImageProvider {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn api_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", GEMINI_API_BASE, model, method)
    }
}

#[async_trait]
impl ImageProvider for GeminiImageProvider {
    async fn generate(
        &self,
        api_key: &Secret<String>,
        request: &ImageRequest,
    ) -> Result<GeneratedImage, ProviderError> {
        let wire_request = build_wire_request(request);
        let url = self.api_url(&request.model, "generateContent");

        tracing::debug!(
            model = %request.model,
            prompt_len = request.prompt.len(),
            aspect_ratio = %request.aspect_ratio,
            search_grounding = request.search_grounding,
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status, &error_text));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Api(format!("Failed to parse response: {}", e)))?;

        extract_image(api_response)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        let Some(api_key) = &self.config.api_key else {
            // Keyless deployments rely on caller-supplied keys.
            return Ok(());
        };

        let url = format!("{}/models", GEMINI_API_BASE);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", api_key.expose_secret())
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::Api(format!(
                "Health check failed: {}",
                response.status()
            )))
        }
    }
}

/// Build the wire-level request for one finalized image request.
fn build_wire_request(request: &ImageRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![ContentPart::Text {
                text: request.prompt.clone(),
            }],
        }],
        generation_config: Some(GenerationConfig {
            image_config: Some(ImageConfig {
                aspect_ratio: request.aspect_ratio.as_str().to_string(),
                image_size: request.resolution.map(|r| r.as_str().to_string()),
            }),
        }),
        tools: request.search_grounding.then(|| {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        }),
    }
}

/// Scan the first candidate's parts for inline image data.
///
/// The first inline-data part wins; textual parts before it are skipped.
fn extract_image(response: GenerateContentResponse) -> Result<GeneratedImage, ProviderError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(ProviderError::NoCandidates);
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    for part in parts {
        if let ContentPart::InlineData { inline_data } = part {
            return Ok(GeneratedImage {
                base64: inline_data.data,
            });
        }
    }

    Err(ProviderError::NoImageData)
}

/// Normalize authorization failures to `KeyRequired`; pass everything else
/// through with the provider's own message.
fn classify_api_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let detail = serde_json::from_str::<GeminiErrorBody>(body)
        .ok()
        .map(|b| b.error);

    let grpc_status = detail
        .as_ref()
        .and_then(|d| d.status.as_deref())
        .unwrap_or_default();
    let message = detail
        .as_ref()
        .and_then(|d| d.message.clone())
        .unwrap_or_else(|| body.to_string());

    if matches!(status.as_u16(), 401 | 403 | 404)
        || matches!(grpc_status, "PERMISSION_DENIED" | "UNAUTHENTICATED" | "NOT_FOUND")
    {
        return ProviderError::KeyRequired;
    }

    // Substring match is a fallback for errors that arrive without a
    // structured status; it is brittle against provider wording changes.
    if message.contains("Requested entity was not found") || message.contains("API key") {
        return ProviderError::KeyRequired;
    }

    ProviderError::Api(message)
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
    // Parts this gateway does not consume (thoughts, function calls).
    Other(serde_json::Value),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_size: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AspectRatio, Resolution};

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn extract_fails_with_no_candidates() {
        let response = parse(r#"{"candidates":[]}"#);
        assert!(matches!(
            extract_image(response),
            Err(ProviderError::NoCandidates)
        ));
    }

    #[test]
    fn extract_fails_when_no_part_carries_image_data() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"sorry, text only"}]}}]}"#,
        );
        assert!(matches!(
            extract_image(response),
            Err(ProviderError::NoImageData)
        ));
    }

    #[test]
    fn extract_returns_first_inline_data_part() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"here you go"},
                {"inlineData":{"mimeType":"image/png","data":"Zmlyc3Q="}},
                {"inlineData":{"mimeType":"image/png","data":"c2Vjb25k"}}
            ]}}]}"#,
        );
        let image = extract_image(response).unwrap();
        assert_eq!(image.base64, "Zmlyc3Q=");
    }

    #[test]
    fn wire_request_for_pro_tier_sets_resolution_and_grounding() {
        let request = ImageRequest {
            model: "gemini-3-pro-image-preview".to_string(),
            prompt: "a cat".to_string(),
            aspect_ratio: AspectRatio::Widescreen,
            resolution: Some(Resolution::K4),
            search_grounding: true,
        };
        let wire = serde_json::to_value(build_wire_request(&request)).unwrap();

        assert_eq!(wire["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");
        assert_eq!(wire["generationConfig"]["imageConfig"]["imageSize"], "4K");
        assert!(wire["tools"][0]["googleSearch"].is_object());
    }

    #[test]
    fn wire_request_for_standard_tier_omits_resolution_and_tools() {
        let request = ImageRequest {
            model: "gemini-2.5-flash-image".to_string(),
            prompt: "a cat".to_string(),
            aspect_ratio: AspectRatio::Square,
            resolution: None,
            search_grounding: false,
        };
        let wire = serde_json::to_value(build_wire_request(&request)).unwrap();

        assert_eq!(
            wire["generationConfig"]["imageConfig"]
                .get("imageSize")
                .cloned(),
            None
        );
        assert_eq!(wire.get("tools").cloned(), None);
    }

    #[test]
    fn permission_denied_normalizes_to_key_required() {
        let body = r#"{"error":{"code":403,"status":"PERMISSION_DENIED","message":"The caller does not have permission"}}"#;
        assert!(matches!(
            classify_api_error(reqwest::StatusCode::FORBIDDEN, body),
            ProviderError::KeyRequired
        ));
    }

    #[test]
    fn entity_not_found_message_normalizes_to_key_required() {
        let body = r#"{"error":{"code":400,"status":"INVALID_ARGUMENT","message":"Requested entity was not found."}}"#;
        assert!(matches!(
            classify_api_error(reqwest::StatusCode::BAD_REQUEST, body),
            ProviderError::KeyRequired
        ));
    }

    #[test]
    fn other_errors_pass_through_verbatim() {
        let body = r#"{"error":{"code":400,"status":"INVALID_ARGUMENT","message":"Unsupported aspect ratio"}}"#;
        match classify_api_error(reqwest::StatusCode::BAD_REQUEST, body) {
            ProviderError::Api(message) => assert_eq!(message, "Unsupported aspect ratio"),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn unparseable_error_body_passes_through_raw() {
        match classify_api_error(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") {
            ProviderError::Api(message) => assert_eq!(message, "upstream exploded"),
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
