//! # App Errors
//!
//! Failures that originate outside the engine (configuration, request
//! files, input validation) get their own taxonomy here; engine failures
//! pass through unchanged.

use tally_core::TallyError;
use thiserror::Error;

/// Errors surfaced by the Tally binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// The configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The calculation request was missing, unreadable, or invalid.
    #[error("invalid request: {0}")]
    Request(String),

    /// The pipeline engine failed; carried unchanged.
    #[error(transparent)]
    Engine(#[from] TallyError),
}
