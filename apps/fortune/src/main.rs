mod config;
mod errors;
mod fortune;
mod llm_client;

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::fortune::RunOutcome;
use crate::llm_client::LlmClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logging comes up before config so configuration errors are reported too.
    // RUST_LOG from a .env file is not seen here; set it in the process environment.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_PKG_NAME")))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    ExitCode::from(report(&try_main().await))
}

async fn try_main() -> Result<RunOutcome> {
    info!("Starting fortune v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    if config.hf_token.trim().is_empty() {
        warn!("HF_TOKEN is empty; the inference API will likely reject the request");
    }

    let llm = LlmClient::new(&config).context("Failed to build HTTP client")?;

    Ok(fortune::run(&config, &llm).await?)
}

/// Logs how the run ended and picks the process exit status.
///
/// 0 when a fortune was written or the service simply had none today;
/// 1 when config was bad, the service answered with something unusable, or the write failed.
fn report(result: &Result<RunOutcome>) -> u8 {
    match result {
        Ok(RunOutcome::Written { path, bytes }) => {
            info!("Fortune updated: {} ({} bytes)", path.display(), bytes);
            0
        }
        Ok(RunOutcome::Unavailable(reason)) => {
            warn!("No fortune today ({reason}); output left unchanged");
            0
        }
        Err(e) => {
            error!("Fortune update failed: {e:#}");
            1
        }
    }
}
