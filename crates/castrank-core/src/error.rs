//! Unified Error Model
use thiserror::Error;

/// Fatal errors surfaced to the caller as `{"error": "..."}`.
///
/// Per-title fetch failures never become a `CastrankError`; the enricher
/// records them as `SkipReason::FetchFailed` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CastrankError {
    #[error("{0}")]
    Usage(String),

    #[error("Invalid IMDb ID format: {0}")]
    InvalidIdentifier(String),

    #[error("No person found for: {0}")]
    NotFound(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to write output: {0}")]
    Output(String),
}

impl CastrankError {
    /// Short machine-friendly tag used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Usage(_) => "usage",
            Self::InvalidIdentifier(_) => "invalid_identifier",
            Self::NotFound(_) => "not_found",
            Self::Provider(_) => "provider",
            Self::Config(_) => "config",
            Self::Output(_) => "output",
        }
    }
}

/// Failures raised by a metadata provider.
///
/// The `Display` output is the message shown verbatim in the error payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("{0}")]
    Transport(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Decode(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    NotFound(String),
}
