//! Error type of the forcelink CLI.

use std::{io, ops::Range, path::PathBuf};

use thiserror::Error;

use forcelink::{LayoutError, collection::CollectionError};

/// Errors raised while inspecting a graph file
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse TOML configuration: {0}")]
    ConfigParse(String),

    #[error("Missing configuration file: {0}")]
    MissingConfig(PathBuf),

    #[error("Invalid graph file {path}: {message}")]
    GraphFile {
        path: String,
        src: String,
        message: String,
        span: Option<Range<usize>>,
    },

    #[error("Invalid graph: {0}")]
    Collection(#[from] CollectionError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("Failed to write plan: {0}")]
    Output(String),
}

impl CliError {
    /// Wraps a graph file parse failure, keeping the source for reporting
    pub fn graph_file(path: &str, src: &str, err: &toml::de::Error) -> Self {
        Self::GraphFile {
            path: path.to_string(),
            src: src.to_string(),
            message: err.message().to_string(),
            span: err.span(),
        }
    }
}

impl From<forcelink::config::ConfigError> for CliError {
    fn from(err: forcelink::config::ConfigError) -> Self {
        Self::Layout(LayoutError::Config(err))
    }
}
