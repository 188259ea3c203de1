use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_OUTPUT_PATH: &str = "fortune.json";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Runtime configuration loaded from environment variables.
/// Only `from_env` touches process-wide state; everything downstream receives a `Config`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the inference service. Empty when `HF_TOKEN` is unset.
    pub hf_token: String,
    pub api_url: String,
    /// Model id appended as `/models/<id>`. Left unset unless configured.
    pub model: Option<String>,
    pub output_path: PathBuf,
    pub request_timeout: Duration,
    /// Check the twelve-sign ranking shape before writing.
    pub validate: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Blank values count as unset, except for the token.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Passed through as-is, blanks included. Missing is not fatal: the request
        // goes out with an empty bearer token.
        let hf_token = lookup("HF_TOKEN").unwrap_or_default();

        let request_timeout = match get("FORTUNE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .context("FORTUNE_TIMEOUT_SECS must be a whole number of seconds")?;
                anyhow::ensure!(secs > 0, "FORTUNE_TIMEOUT_SECS must be greater than zero");
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let validate = match get("FORTUNE_VALIDATE") {
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("FORTUNE_VALIDATE has unrecognised value '{raw}'"))?,
            None => false,
        };

        Ok(Config {
            hf_token,
            api_url: get("FORTUNE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model: get("FORTUNE_MODEL").map(|m| m.trim().to_string()),
            output_path: get("FORTUNE_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            request_timeout,
            validate,
        })
    }

    /// Full inference URL: the base URL, plus `/models/<id>` when a model is configured.
    pub fn endpoint(&self) -> String {
        let base = self.api_url.trim_end_matches('/');
        match &self.model {
            Some(model) => format!("{base}/models/{}", model.trim_matches('/')),
            None => base.to_string(),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
