//! Shared types and utilities for the brochure workspace.
//!
//! Every crate in the workspace depends on this one, so it stays small:
//!
//! - [`BrochureError`] and [`Result`]: the error taxonomy surfaced to handlers
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use brochure_common::BrochureError;
//!
//! let err = BrochureError::Validation("Only http(s) URLs are supported.".into());
//! assert_eq!(err.kind(), "validation");
//! ```
pub mod observability;

/// Error types used across the brochure pipeline.
///
/// Nothing in the pipeline retries on these except the JSON fallback in
/// `brochure-llm`; they propagate unchanged to the request handlers.
#[derive(thiserror::Error, Debug)]
pub enum BrochureError {
    /// Input failed validation (URL scheme, missing or short field).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A page fetch timed out, could not connect, or returned a non-success status.
    #[error("Network error: {0}")]
    Network(String),

    /// The language model did not produce valid JSON after the fallback attempt.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Required configuration (API credential, limits) is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The language-model provider answered with an error.
    #[error("Provider error: {0}")]
    Provider(String),
}

impl BrochureError {
    /// Short machine-readable tag, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Configuration(_) => "configuration",
            Self::Provider(_) => "provider",
        }
    }
}

/// Convenient alias for results that use [`BrochureError`].
pub type Result<T> = std::result::Result<T, BrochureError>;
