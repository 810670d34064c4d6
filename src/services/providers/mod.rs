//! Image provider abstraction and implementations.
//!
//! The provider boundary is a narrow trait so the gateway and the HTTP
//! adapter can be tested against a mock without touching the network.

pub mod gemini;
pub mod mock;

use crate::models::{AspectRatio, Resolution};
use async_trait::async_trait;
use secrecy::Secret;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Provider responded without any candidate.
    #[error("no image was generated; try a different prompt")]
    NoCandidates,

    /// A candidate came back, but none of its parts carried image data.
    #[error("no image data found in the provider response")]
    NoImageData,

    /// The provider rejected the credential (invalid, expired, or the
    /// keyed project cannot see the requested model).
    #[error("API key was rejected by the provider")]
    KeyRequired,

    /// Any other provider-side failure; the message is passed through
    /// verbatim.
    #[error("{0}")]
    Api(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Finalized provider call, as produced by the request builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Provider model identifier.
    pub model: String,
    /// Prompt after style enhancement.
    pub prompt: String,
    /// Aspect ratio, always set.
    pub aspect_ratio: AspectRatio,
    /// Output resolution; pro tier only.
    pub resolution: Option<Resolution>,
    /// Whether to enable provider-side search grounding; pro tier only.
    pub search_grounding: bool,
}

/// Raw image payload extracted from a provider response.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Base64-encoded image bytes, exactly as the provider returned them.
    pub base64: String,
}

/// Trait for image generation providers.
///
/// Implementations are stateless per call and safe to invoke concurrently;
/// each invocation is an independent request with no ordering guarantees.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Send one generation request and return one image, or fail.
    async fn generate(
        &self,
        api_key: &Secret<String>,
        request: &ImageRequest,
    ) -> Result<GeneratedImage, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
