//! Daily fortune run: fetch once, write once.
//!
//! Flow: fetch_fortune → (validate_fortune) → write_fortune.
//! The output file is only touched after a usable fortune is in hand.

pub mod output;
pub mod schema;

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::Config;
use crate::errors::FortuneError;
use crate::llm_client::{LlmClient, LlmError};
use output::write_fortune;
use schema::validate_fortune;

#[derive(Debug)]
pub enum RunOutcome {
    Written { path: PathBuf, bytes: usize },
    /// No fortune today; the previous file was left alone.
    Unavailable(LlmError),
}

/// Fetches today's fortune and overwrites the configured output file with it.
///
/// Transport failures and non-200 answers come back as `Unavailable`.
/// A 200 whose body can't be read, a failed validation, or a failed write is an error.
pub async fn run(config: &Config, llm: &LlmClient) -> Result<RunOutcome, FortuneError> {
    info!("Requesting fortune from {}", llm.endpoint());

    let text = match llm.fetch_fortune().await {
        Ok(text) => text,
        Err(e) if e.is_unavailable() => {
            warn!("No fortune available: {e}");
            return Ok(RunOutcome::Unavailable(e));
        }
        Err(e) => return Err(e.into()),
    };

    if text.is_empty() {
        warn!("Model returned an empty fortune; leaving output untouched");
        return Ok(RunOutcome::Unavailable(LlmError::EmptyContent));
    }

    let contents = if config.validate {
        let validated = validate_fortune(&text)?;
        info!("Fortune ranking validated ({} signs)", validated.entries.len());
        validated.json
    } else {
        text.as_str()
    };

    let bytes = write_fortune(&config.output_path, contents)?;
    info!("Wrote {} bytes to {}", bytes, config.output_path.display());

    Ok(RunOutcome::Written {
        path: config.output_path.clone(),
        bytes,
    })
}
