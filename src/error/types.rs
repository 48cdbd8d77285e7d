//! Core error types

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ModerationError>;

/// Errors produced while normalizing, aggregating or persisting moderation results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModerationError {
    /// A provider response did not have the shape we expect.
    #[error("{provider} response could not be normalized: {field}")]
    Normalization { provider: String, field: String },

    /// The provider adapter failed (network, auth, quota).
    #[error("{provider} call failed: {message}")]
    ProviderCall {
        provider: String,
        message: String,
        retryable: bool,
    },

    /// The provider adapter did not settle within the configured timeout.
    #[error("{provider} did not respond within {timeout:?}")]
    ProviderTimeout { provider: String, timeout: Duration },

    /// Every dispatched provider failed for this item.
    #[error("all {} providers failed for item {item_id}", .failures.len())]
    AllProvidersFailed {
        item_id: String,
        failures: Vec<ProviderFailure>,
    },

    /// The analysis as a whole exceeded its time budget.
    #[error("analysis of item {item_id} timed out after {timeout:?}")]
    AnalysisTimeout { item_id: String, timeout: Duration },

    /// No provider is registered with the controller.
    #[error("no moderation providers configured")]
    NoProviders,

    /// The persistence collaborator failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(String),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse error classification used for logging and UI rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Normalization,
    Provider,
    Timeout,
    Analysis,
    Storage,
    Parsing,
    Configuration,
}

impl ModerationError {
    /// Shorthand for a normalization error naming the missing field.
    pub fn missing_field(provider: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Normalization {
            provider: provider.into(),
            field: field.into(),
        }
    }

    /// Shorthand for a provider call failure.
    pub fn provider_call(
        provider: impl Into<String>,
        message: impl Into<String>,
        retryable: bool,
    ) -> Self {
        Self::ProviderCall {
            provider: provider.into(),
            message: message.into(),
            retryable,
        }
    }

    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Normalization { .. } => ErrorCategory::Normalization,
            Self::ProviderCall { .. } => ErrorCategory::Provider,
            Self::ProviderTimeout { .. } | Self::AnalysisTimeout { .. } => ErrorCategory::Timeout,
            Self::AllProvidersFailed { .. } | Self::NoProviders => ErrorCategory::Analysis,
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Json(_) => ErrorCategory::Parsing,
            Self::Config(_) => ErrorCategory::Configuration,
        }
    }

    /// Whether repeating the provider call could succeed.
    ///
    /// Malformed responses are never retried: the same request would
    /// produce the same payload and bill the provider again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ProviderCall { retryable, .. } => *retryable,
            Self::ProviderTimeout { .. } => true,
            _ => false,
        }
    }

    /// Provider this error is attributed to, if any.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Normalization { provider, .. }
            | Self::ProviderCall { provider, .. }
            | Self::ProviderTimeout { provider, .. } => Some(provider),
            _ => None,
        }
    }
}

/// One provider's failed contribution to an analysis.
///
/// Failures are recorded instead of aborting the item; the reason is kept
/// as a display string so the record can be persisted and shown as a
/// "failed" flag entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub reason: String,
}

impl ProviderFailure {
    pub fn new(provider: impl Into<String>, error: &ModerationError) -> Self {
        Self {
            provider: provider.into(),
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_error_names_provider_and_field() {
        let err = ModerationError::missing_field("azure", "categoriesAnalysis");
        assert_eq!(
            err.to_string(),
            "azure response could not be normalized: categoriesAnalysis"
        );
        assert_eq!(err.category(), ErrorCategory::Normalization);
        assert_eq!(err.provider(), Some("azure"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn provider_call_retryable_flag_is_respected() {
        let transient = ModerationError::provider_call("openai", "503", true);
        let fatal = ModerationError::provider_call("openai", "401", false);
        assert!(transient.is_retryable());
        assert!(!fatal.is_retryable());
    }

    #[test]
    fn all_providers_failed_counts_failures() {
        let err = ModerationError::AllProvidersFailed {
            item_id: "abc".into(),
            failures: vec![
                ProviderFailure {
                    provider: "openai".into(),
                    reason: "boom".into(),
                },
                ProviderFailure {
                    provider: "azure".into(),
                    reason: "boom".into(),
                },
            ],
        };
        assert_eq!(err.to_string(), "all 2 providers failed for item abc");
        assert_eq!(err.category(), ErrorCategory::Analysis);
    }
}
