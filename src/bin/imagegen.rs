//! Command-line client for the image generation gateway.
//!
//! Covers the interactive path: build the request, call the provider
//! directly, write the image to disk, and record a local history entry.

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use imagegen_service::config::AppConfig;
use imagegen_service::error::AppError;
use imagegen_service::models::{
    AspectRatio, GenerationRequest, GenerationResult, HistoryEntry, ImageStyle, ModelTier,
    Resolution,
};
use imagegen_service::services::history::HistoryStore;
use imagegen_service::services::providers::gemini::{GeminiConfig, GeminiImageProvider};
use imagegen_service::services::providers::{ImageProvider, ProviderError};
use imagegen_service::services::request_builder;
use secrecy::Secret;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imagegen", about = "Generate images via the Gemini API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one image and record it in the local history.
    Generate {
        /// Image description.
        prompt: String,

        /// Aspect ratio: 1:1, 3:4, 4:3, 9:16, or 16:9.
        #[arg(long, default_value = "1:1")]
        aspect_ratio: AspectRatio,

        /// Style appended to the prompt, e.g. "cinematic" or "pixel-art".
        #[arg(long, default_value = "none")]
        style: ImageStyle,

        /// Model tier: "standard" or "pro".
        #[arg(long, default_value = "standard")]
        model: ModelTier,

        /// Output resolution (pro tier only): 1K, 2K, or 4K.
        #[arg(long, default_value = "1K")]
        resolution: Resolution,

        /// API key; falls back to configuration / GEMINI_API_KEY.
        #[arg(long)]
        api_key: Option<String>,

        /// Where to write the image; defaults to imagegen-<id>.png.
        #[arg(long)]
        output: Option<PathBuf>,

        /// History file location.
        #[arg(long)]
        history_file: Option<PathBuf>,
    },

    /// Print the local generation history, most recent first.
    History {
        /// Show at most this many entries.
        #[arg(long)]
        limit: Option<usize>,

        /// History file location.
        #[arg(long)]
        history_file: Option<PathBuf>,
    },
}

fn default_history_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("imagegen")
        .join("history.json")
}

async fn run_generate(
    request: GenerationRequest,
    api_key: Option<String>,
    output: Option<PathBuf>,
    history_file: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Prompt is validated before the key is resolved or any call is made.
    let image_request = request_builder::build_image_request(&request)?;

    let config = AppConfig::load()?;
    let api_key = api_key
        .filter(|key| !key.trim().is_empty())
        .map(Secret::new)
        .or_else(|| config.google.api_key.clone())
        .ok_or(AppError::MissingCredential)
        .context("pass --api-key or set GEMINI_API_KEY")?;

    let provider = GeminiImageProvider::new(GeminiConfig {
        api_key: config.google.api_key,
    });

    let image = match provider.generate(&api_key, &image_request).await {
        Ok(image) => image,
        Err(ProviderError::KeyRequired) => {
            anyhow::bail!("the provider rejected the API key; re-authenticate with a valid key")
        }
        Err(e) => return Err(e.into()),
    };

    let result = GenerationResult::new(image.base64, image_request.prompt);
    let entry = HistoryEntry::new(result.clone(), request);

    let output = output.unwrap_or_else(|| PathBuf::from(format!("imagegen-{}.png", entry.id)));
    let bytes = STANDARD
        .decode(result.raw_base64.as_bytes())
        .context("provider returned invalid base64 image data")?;
    fs::write(&output, bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    let mut history = HistoryStore::load(history_file.unwrap_or_else(default_history_path))?;
    history.append(entry)?;

    println!("Saved {}", output.display());
    println!("Prompt used: {}", result.prompt_used);
    Ok(())
}

fn run_history(limit: Option<usize>, history_file: Option<PathBuf>) -> anyhow::Result<()> {
    let history = HistoryStore::load(history_file.unwrap_or_else(default_history_path))?;
    let entries = history.entries();

    if entries.is_empty() {
        println!("No history yet at {}", history.path().display());
        return Ok(());
    }

    for entry in entries.iter().take(limit.unwrap_or(entries.len())) {
        println!(
            "{}  {}  {}  {}",
            entry.id,
            entry.created_at.format("%Y-%m-%d %H:%M:%S"),
            entry.request.model,
            entry.request.prompt
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            prompt,
            aspect_ratio,
            style,
            model,
            resolution,
            api_key,
            output,
            history_file,
        } => {
            let request = GenerationRequest {
                prompt,
                aspect_ratio,
                style,
                model,
                resolution,
            };
            run_generate(request, api_key, output, history_file).await
        }
        Command::History {
            limit,
            history_file,
        } => run_history(limit, history_file),
    }
}
