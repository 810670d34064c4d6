//! Request construction: prompt enhancement and provider configuration.

use crate::error::AppError;
use crate::models::{GenerationRequest, ImageStyle, ModelTier};
use crate::services::providers::ImageRequest;

/// Append the style suffix to a prompt.
///
/// The exact wording matters for reproducibility of provider behavior:
/// `, in <style> style, high resolution, detailed.`
pub fn enhance_prompt(prompt: &str, style: ImageStyle) -> String {
    match style {
        ImageStyle::None => prompt.to_string(),
        style => format!("{}, in {} style, high resolution, detailed.", prompt, style),
    }
}

/// Finalize a generation request into a provider call.
///
/// The only local validation is the non-blank prompt check; everything
/// deeper is delegated to the provider. Pro tier additionally carries the
/// requested resolution and enables search grounding.
pub fn build_image_request(request: &GenerationRequest) -> Result<ImageRequest, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::EmptyPrompt);
    }

    let (resolution, search_grounding) = match request.model {
        ModelTier::Standard => (None, false),
        ModelTier::Pro => (Some(request.resolution), true),
    };

    Ok(ImageRequest {
        model: request.model.model_id().to_string(),
        prompt: enhance_prompt(&request.prompt, request.style),
        aspect_ratio: request.aspect_ratio,
        resolution,
        search_grounding,
    })
}
