use std::path::PathBuf;

use lipsync_core::LipsyncError;
use thiserror::Error;

/// Errors surfaced by the command line front end
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error(transparent)]
    Lipsync(#[from] LipsyncError),
}

pub type CliResult<T> = Result<T, CliError>;
