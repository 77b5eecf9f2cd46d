use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

#[derive(Debug, Error, Serialize, Deserialize, TS, PartialEq, Eq)]
#[ts(export)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// A natural-key race the store refused. Services re-read and retry on this
    /// instead of surfacing it.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The interaction store could not be reached or failed mid-statement.
    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
    #[error("Unauthorized")]
    Unauthorized,
    /// The caller is known but may not act on this resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl DomainError {
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} {} not found", what, id))
    }

    /// Whether the caller may safely retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::InfrastructureError(_) | Self::Conflict(_))
    }
}
