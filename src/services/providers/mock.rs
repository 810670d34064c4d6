//! Mock provider implementation for testing.

use super::{GeneratedImage, ImageProvider, ImageRequest, ProviderError};
use async_trait::async_trait;
use secrecy::Secret;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// What the mock should do on the next `generate` call.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Succeed with the given base64 payload.
    Succeed(String),
    /// Fail as if the provider returned no candidates.
    NoCandidates,
    /// Fail as if the candidate carried no inline image data.
    NoImageData,
    /// Fail as if the provider rejected the credential.
    KeyRequired,
    /// Fail with a passthrough provider message.
    Api(String),
}

/// Mock image provider with a scripted behavior.
///
/// Records how many times `generate` was invoked and the last request it
/// saw, so tests can assert that validation short-circuits before any
/// provider call.
pub struct MockImageProvider {
    behavior: MockBehavior,
    healthy: bool,
    calls: AtomicUsize,
    last_request: Mutex<Option<ImageRequest>>,
}

impl MockImageProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            healthy: true,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A mock whose health check fails, for readiness-probe tests.
    pub fn unhealthy(behavior: MockBehavior) -> Self {
        Self {
            healthy: false,
            ..Self::new(behavior)
        }
    }

    /// Number of `generate` invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request passed to `generate`, if any.
    pub fn last_request(&self) -> Option<ImageRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate(
        &self,
        _api_key: &Secret<String>,
        request: &ImageRequest,
    ) -> Result<GeneratedImage, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        match &self.behavior {
            MockBehavior::Succeed(base64) => Ok(GeneratedImage {
                base64: base64.clone(),
            }),
            MockBehavior::NoCandidates => Err(ProviderError::NoCandidates),
            MockBehavior::NoImageData => Err(ProviderError::NoImageData),
            MockBehavior::KeyRequired => Err(ProviderError::KeyRequired),
            MockBehavior::Api(message) => Err(ProviderError::Api(message.clone())),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.healthy {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock image provider not enabled".to_string(),
            ))
        }
    }
}
