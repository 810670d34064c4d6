use crate::services::history::HistoryError;
use crate::services::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Empty or whitespace-only prompt; caught before any network call.
    #[error("Prompt is required")]
    EmptyPrompt,

    /// Request body failed to parse as the expected JSON shape.
    #[error("Json parse error: {0}")]
    InvalidBody(String),

    /// No API key in the request body and none in server configuration.
    #[error("API Key is required")]
    MissingCredential,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("Configuration error: {0}")]
    Config(anyhow::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl AppError {
    /// HTTP status this error maps to.
    ///
    /// `KeyRequired` maps to 401 like `MissingCredential`, but keeps a
    /// distinct message so callers can tell "no key given" from "key
    /// given but rejected".
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmptyPrompt | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::MissingCredential => StatusCode::UNAUTHORIZED,
            AppError::Provider(ProviderError::KeyRequired) => StatusCode::UNAUTHORIZED,
            AppError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::History(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_taxonomy_maps_to_expected_statuses() {
        assert_eq!(AppError::EmptyPrompt.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::MissingCredential.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Provider(ProviderError::KeyRequired).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Provider(ProviderError::NoCandidates).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Provider(ProviderError::Api("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn provider_messages_pass_through_verbatim() {
        let err = AppError::Provider(ProviderError::Api("Unsupported aspect ratio".into()));
        assert_eq!(err.to_string(), "Unsupported aspect ratio");
    }
}
