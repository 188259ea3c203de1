use std::path::PathBuf;

use thiserror::Error;

use crate::fortune::schema::SchemaError;
use crate::llm_client::LlmError;

/// Failures that stop a run with a non-zero exit.
/// An unavailable service is not one of them; see `RunOutcome::Unavailable`.
#[derive(Debug, Error)]
pub enum FortuneError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Invalid fortune: {0}")]
    InvalidFortune(#[from] SchemaError),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
