//! Core data model: request options, generation results, history entries.
//!
//! Wire names follow the provider's vocabulary exactly (`"16:9"`,
//! `"Oil Painting"`, model identifiers). Defaulting for absent options
//! lives here, on the serde derives, so the HTTP adapter and the CLI
//! never duplicate default values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width:height tag constraining generated image framing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "9:16")]
    Mobile,
    #[serde(rename = "16:9")]
    Widescreen,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Mobile => "9:16",
            AspectRatio::Widescreen => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1:1" => Ok(AspectRatio::Square),
            "3:4" => Ok(AspectRatio::Portrait),
            "4:3" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Mobile),
            "16:9" => Ok(AspectRatio::Widescreen),
            other => Err(format!("unknown aspect ratio: {}", other)),
        }
    }
}

/// Aesthetic descriptor appended to the prompt as a natural-language suffix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageStyle {
    #[default]
    None,
    Cinematic,
    Cyberpunk,
    Anime,
    #[serde(rename = "Oil Painting")]
    OilPainting,
    Photorealistic,
    #[serde(rename = "Pixel Art")]
    PixelArt,
    Dreamy,
    Vintage,
    Sketch,
}

impl ImageStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageStyle::None => "None",
            ImageStyle::Cinematic => "Cinematic",
            ImageStyle::Cyberpunk => "Cyberpunk",
            ImageStyle::Anime => "Anime",
            ImageStyle::OilPainting => "Oil Painting",
            ImageStyle::Photorealistic => "Photorealistic",
            ImageStyle::PixelArt => "Pixel Art",
            ImageStyle::Dreamy => "Dreamy",
            ImageStyle::Vintage => "Vintage",
            ImageStyle::Sketch => "Sketch",
        }
    }
}

impl fmt::Display for ImageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace(['-', '_'], " ").to_lowercase();
        match normalized.as_str() {
            "none" => Ok(ImageStyle::None),
            "cinematic" => Ok(ImageStyle::Cinematic),
            "cyberpunk" => Ok(ImageStyle::Cyberpunk),
            "anime" => Ok(ImageStyle::Anime),
            "oil painting" => Ok(ImageStyle::OilPainting),
            "photorealistic" => Ok(ImageStyle::Photorealistic),
            "pixel art" => Ok(ImageStyle::PixelArt),
            "dreamy" => Ok(ImageStyle::Dreamy),
            "vintage" => Ok(ImageStyle::Vintage),
            "sketch" => Ok(ImageStyle::Sketch),
            other => Err(format!("unknown style: {}", other)),
        }
    }
}

/// Generation backend tier. The wire form is the provider model identifier;
/// `standard`/`pro` are accepted as shorthand on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelTier {
    #[default]
    #[serde(rename = "gemini-2.5-flash-image", alias = "standard")]
    Standard,
    #[serde(rename = "gemini-3-pro-image-preview", alias = "pro")]
    Pro,
}

impl ModelTier {
    /// Provider model identifier for this tier.
    pub fn model_id(&self) -> &'static str {
        match self {
            ModelTier::Standard => "gemini-2.5-flash-image",
            ModelTier::Pro => "gemini-3-pro-image-preview",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_id())
    }
}

impl FromStr for ModelTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "flash" | "gemini-2.5-flash-image" => Ok(ModelTier::Standard),
            "pro" | "gemini-3-pro-image-preview" => Ok(ModelTier::Pro),
            other => Err(format!("unknown model tier: {}", other)),
        }
    }
}

/// Output resolution. Only honored by the pro tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "1K")]
    K1,
    #[serde(rename = "2K")]
    K2,
    #[serde(rename = "4K")]
    K4,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::K1 => "1K",
            Resolution::K2 => "2K",
            Resolution::K4 => "4K",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "1K" => Ok(Resolution::K1),
            "2K" => Ok(Resolution::K2),
            "4K" => Ok(Resolution::K4),
            other => Err(format!("unknown resolution: {}", other)),
        }
    }
}

/// A single generation request as submitted by a caller.
///
/// Invariant: `prompt` must be non-blank before the request reaches the
/// provider; the request builder enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub style: ImageStyle,
    #[serde(default)]
    pub model: ModelTier,
    #[serde(default)]
    pub resolution: Resolution,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::default(),
            style: ImageStyle::default(),
            model: ModelTier::default(),
            resolution: Resolution::default(),
        }
    }
}

/// Result of one successful generation. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// `data:image/png;base64,<payload>` form, ready for rendering.
    pub image_data_uri: String,
    /// The raw base64 payload as returned by the provider.
    pub raw_base64: String,
    /// The prompt actually sent, after style enhancement.
    pub prompt_used: String,
}

impl GenerationResult {
    pub fn new(raw_base64: String, prompt_used: String) -> Self {
        let image_data_uri = format!("data:image/png;base64,{}", raw_base64);
        Self {
            image_data_uri,
            raw_base64,
            prompt_used,
        }
    }
}

/// One persisted history record: the result plus a snapshot of the request
/// that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Time-based identifier, unique within a store.
    pub id: String,
    pub result: GenerationResult,
    pub request: GenerationRequest,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(result: GenerationResult, request: GenerationRequest) -> Self {
        let created_at = Utc::now();
        Self {
            id: created_at.timestamp_millis().to_string(),
            result,
            request,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_round_trip_wire_names() {
        let ratio: AspectRatio = serde_json::from_str("\"16:9\"").unwrap();
        assert_eq!(ratio, AspectRatio::Widescreen);
        assert_eq!(serde_json::to_string(&ratio).unwrap(), "\"16:9\"");

        let style: ImageStyle = serde_json::from_str("\"Oil Painting\"").unwrap();
        assert_eq!(style, ImageStyle::OilPainting);
    }

    #[test]
    fn model_tier_accepts_shorthand_and_full_id() {
        let tier: ModelTier = serde_json::from_str("\"pro\"").unwrap();
        assert_eq!(tier, ModelTier::Pro);
        let tier: ModelTier = serde_json::from_str("\"gemini-2.5-flash-image\"").unwrap();
        assert_eq!(tier, ModelTier::Standard);
        assert_eq!("PRO".parse::<ModelTier>().unwrap(), ModelTier::Pro);
    }

    #[test]
    fn request_defaults_absent_options() {
        let req: GenerationRequest = serde_json::from_str(r#"{"prompt":"a cat"}"#).unwrap();
        assert_eq!(req.aspect_ratio, AspectRatio::Square);
        assert_eq!(req.style, ImageStyle::None);
        assert_eq!(req.model, ModelTier::Standard);
        assert_eq!(req.resolution, Resolution::K1);
    }

    #[test]
    fn result_builds_png_data_uri() {
        let result = GenerationResult::new("QUJD".to_string(), "a cat".to_string());
        assert_eq!(result.image_data_uri, "data:image/png;base64,QUJD");
        assert_eq!(result.raw_base64, "QUJD");
    }
}
