//! Error type for CLI operations

use std::path::PathBuf;

use thiserror::Error;

use crate::render::RenderError;

/// Errors surfaced by CLI commands. Any of these exits non-zero.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration document: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
