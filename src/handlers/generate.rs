use crate::error::AppError;
use crate::models::{
    AspectRatio, GenerationRequest, GenerationResult, ImageStyle, ModelTier, Resolution,
};
use crate::services::request_builder;
use crate::utils::ApiJson;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Request body for `POST /api/generate`.
///
/// Everything except the prompt is optional; option defaults come from the
/// data model so the CLI and this adapter stay in agreement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub style: ImageStyle,
    #[serde(default)]
    pub model: ModelTier,
    #[serde(default)]
    pub resolution: Resolution,
}

/// Success body for `POST /api/generate`.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    /// Data-URI form, renderable directly.
    pub image_url: String,
    /// Raw base64 payload for callers that store or re-encode the image.
    pub base64: String,
    /// The prompt actually used, after style enhancement.
    pub prompt: String,
}

/// Stateless generation endpoint for external callers.
///
/// The prompt is validated before credential resolution, so a request
/// missing both fails with 400, not 401.
pub async fn generate(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<GenerateBody>,
) -> Result<impl IntoResponse, AppError> {
    let request = GenerationRequest {
        prompt: body.prompt.unwrap_or_default(),
        aspect_ratio: body.aspect_ratio,
        style: body.style,
        model: body.model,
        resolution: body.resolution,
    };
    let image_request = request_builder::build_image_request(&request)?;

    let api_key = body
        .api_key
        .filter(|key| !key.trim().is_empty())
        .map(Secret::new)
        .or_else(|| state.config.google.api_key.clone())
        .ok_or(AppError::MissingCredential)?;

    let image = state.provider.generate(&api_key, &image_request).await?;
    let result = GenerationResult::new(image.base64, image_request.prompt);

    tracing::info!(
        model = %image_request.model,
        aspect_ratio = %request.aspect_ratio,
        style = %request.style,
        "Image generated"
    );

    Ok((
        StatusCode::OK,
        Json(GenerateResponse {
            success: true,
            image_url: result.image_data_uri,
            base64: result.raw_base64,
            prompt: result.prompt_used,
        }),
    ))
}

/// Fallback for non-POST methods on the generate route.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Only POST requests allowed" })),
    )
}
