//! Error types for layout runs.
//!
//! This module provides [`LayoutError`], returned by every fallible
//! [`LayoutAdapter`](crate::LayoutAdapter) operation.

use std::error::Error;

use thiserror::Error;

use crate::config::ConfigError;

/// Boxed error raised by an external simulation engine.
pub type EngineError = Box<dyn Error + Send + Sync + 'static>;

/// The main error type for layout operations.
///
/// Simulation failures are caught at the adapter boundary: by the time a
/// `Simulation` error reaches the caller, the host has already received
/// `layoutstop` and the run is over.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation error: {0}")]
    Simulation(EngineError),

    #[error("Graph error: {0}")]
    Graph(String),
}

impl LayoutError {
    /// Wraps an engine error
    pub fn simulation(err: impl Into<EngineError>) -> Self {
        Self::Simulation(err.into())
    }
}
