//! CLI error types.

use std::path::PathBuf;

use sigil_config::ConfigError;
use sigil_transpiler::TranspileError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    Transpile {
        path: PathBuf,
        source: TranspileError,
    },

    #[error("{0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{failed} of {total} templates failed to transpile")]
    Build { failed: usize, total: usize },

    #[error("{0}")]
    Validation(String),
}
