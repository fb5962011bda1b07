//! Error types for the configuration wizard core

use thiserror::Error;

/// Errors produced by the wizard core.
///
/// An unrecognized preset is deliberately not represented here; it resolves
/// to `balanced` instead.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("failed to render manifest: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

pub type WizardResult<T> = Result<T, WizardError>;
