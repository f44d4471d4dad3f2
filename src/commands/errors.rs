use std::path::PathBuf;

use crate::aggregate::AggregateError;
use crate::config::ConfigError;
use crate::synthesis::SynthesisError;

/// Everything a command can report to the user.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    InvalidInput(#[from] AggregateError),

    /// All three primary collections came back empty.
    #[error("No data found for \"{0}\". Please check the spelling.")]
    NoData(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("invalid bundle JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}", synthesis_message(.0))]
    Synthesis(#[from] SynthesisError),
}

pub(super) fn file_error(
    path: &std::path::Path,
) -> impl FnOnce(std::io::Error) -> CommandError + '_ {
    move |source| CommandError::File {
        path: path.to_path_buf(),
        source,
    }
}

fn synthesis_message(e: &SynthesisError) -> String {
    match e {
        SynthesisError::ApiKeyNotSet => format!("AI features are disabled. {e}"),
        SynthesisError::RateLimited => format!("Failed to generate AI summary: {e}"),
        SynthesisError::QuotaExhausted(_) => format!(
            "Failed to generate AI summary: {e}. \
             Check your API billing at https://aistudio.google.com"
        ),
        _ => format!("Failed to generate AI summary: {e}. Please try again."),
    }
}
