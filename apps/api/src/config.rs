use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// How a résumé is tailored: two focused prompts run concurrently, or one prompt
/// for the whole document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TailorMode {
    #[default]
    Split,
    WholeDocument,
}

impl FromStr for TailorMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "split" => Ok(TailorMode::Split),
            "whole" | "whole_document" | "whole-document" => Ok(TailorMode::WholeDocument),
            other => bail!("unknown tailor mode '{other}' (expected 'split' or 'whole')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_url: String,
    pub ollama_model: String,
    pub temperature: f32,
    pub model_timeout: Duration,
    pub base_resume_path: PathBuf,
    pub tailor_mode: TailorMode,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let temperature = var("MODEL_TEMPERATURE", "0.7")
            .parse::<f32>()
            .context("MODEL_TEMPERATURE must be a number")?;
        if !(0.0..=2.0).contains(&temperature) {
            bail!("MODEL_TEMPERATURE must be between 0.0 and 2.0, got {temperature}");
        }

        Ok(Config {
            ollama_url: var("OLLAMA_URL", "http://localhost:11434/api/generate"),
            ollama_model: var("OLLAMA_MODEL", "llama3"),
            temperature,
            model_timeout: Duration::from_secs(
                var("MODEL_TIMEOUT_SECS", "120")
                    .parse::<u64>()
                    .context("MODEL_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            base_resume_path: PathBuf::from(var("BASE_RESUME_PATH", "data/base_resume.json")),
            tailor_mode: var("TAILOR_MODE", "split").parse()?,
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
        })
    }
}
