use crate::error::AppError;
use config::{Config as Cfg, File};
use secrecy::Secret;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub google: GoogleConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleConfig {
    /// Server-side API key. Optional: callers may supply their own key
    /// per request, so a keyless deployment is valid.
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
}

fn default_port() -> u16 {
    8080
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            google: GoogleConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional `configuration` file, then
    /// `APP__`-prefixed environment variables, then the conventional
    /// `GEMINI_API_KEY`/`GOOGLE_API_KEY` fallbacks.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        if app_config.google.api_key.is_none() {
            let fallback = env::var("GEMINI_API_KEY").or_else(|_| env::var("GOOGLE_API_KEY"));
            if let Ok(key) = fallback {
                if !key.trim().is_empty() {
                    app_config.google.api_key = Some(Secret::new(key));
                }
            }
        }

        Ok(app_config)
    }
}
