//! Analysis configuration
//!
//! Admission thresholds, timeouts and the provider retry policy. The
//! threshold defaults mirror what the dashboard shipped with; they are
//! product decisions rather than provider contracts, so every one of them
//! can be overridden.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ModerationError, Result};
use crate::retry::RetryPolicy;

/// Default minimum Azure severity (0-6 scale) that flags a category.
pub const DEFAULT_AZURE_SEVERITY_THRESHOLD: u8 = 2;
/// Default minimum explicit-content score that flags `sexual_explicit`.
pub const DEFAULT_GOOGLE_EXPLICIT_THRESHOLD: f64 = 0.75;
/// Default minimum label confidence that flags a label-matched category.
pub const DEFAULT_GOOGLE_LABEL_THRESHOLD: f64 = 0.7;
/// Default time budget for a single provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(150);
/// Default time budget for a whole item analysis.
pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(180);

/// Per-provider admission thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Thresholds {
    /// Azure severity at or above which a category is flagged
    #[validate(range(min = 0, max = 6))]
    pub azure_severity: u8,
    /// Google explicit-content score at or above which `sexual_explicit` is flagged
    #[validate(range(min = 0.0, max = 1.0))]
    pub google_explicit: f64,
    /// Google label confidence at or above which a matched category is flagged
    #[validate(range(min = 0.0, max = 1.0))]
    pub google_label: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            azure_severity: DEFAULT_AZURE_SEVERITY_THRESHOLD,
            google_explicit: DEFAULT_GOOGLE_EXPLICIT_THRESHOLD,
            google_label: DEFAULT_GOOGLE_LABEL_THRESHOLD,
        }
    }
}

/// Configuration for normalization and the analysis controller.
#[derive(Debug, Clone)]
pub struct ModerationConfig {
    pub thresholds: Thresholds,
    /// Budget for one provider call; expiry counts as that provider's failure
    pub provider_timeout: Duration,
    /// Budget for the whole analysis of one item; expiry fails the item
    pub analysis_timeout: Duration,
    /// Retry policy applied to retryable provider failures
    pub retry: RetryPolicy,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            analysis_timeout: DEFAULT_ANALYSIS_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl ModerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub const fn with_azure_severity_threshold(mut self, severity: u8) -> Self {
        self.thresholds.azure_severity = severity;
        self
    }

    pub const fn with_google_explicit_threshold(mut self, threshold: f64) -> Self {
        self.thresholds.google_explicit = threshold;
        self
    }

    pub const fn with_google_label_threshold(mut self, threshold: f64) -> Self {
        self.thresholds.google_label = threshold;
        self
    }

    pub const fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub const fn with_analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Check ranges and timeouts.
    pub fn validate_config(&self) -> Result<()> {
        self.thresholds.validate()?;
        if self.provider_timeout.is_zero() {
            return Err(ModerationError::Config(
                "provider_timeout must be greater than zero".into(),
            ));
        }
        if self.analysis_timeout.is_zero() {
            return Err(ModerationError::Config(
                "analysis_timeout must be greater than zero".into(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ModerationError::Config(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Build a configuration from `MODSCOPE_*` environment variables.
    ///
    /// Supported variables:
    /// - `MODSCOPE_AZURE_SEVERITY_THRESHOLD`
    /// - `MODSCOPE_GOOGLE_EXPLICIT_THRESHOLD`
    /// - `MODSCOPE_GOOGLE_LABEL_THRESHOLD`
    /// - `MODSCOPE_PROVIDER_TIMEOUT_SECS`
    /// - `MODSCOPE_ANALYSIS_TIMEOUT_SECS`
    /// - `MODSCOPE_PROVIDER_MAX_ATTEMPTS`
    /// - `MODSCOPE_PROVIDER_RETRY_DELAY_MS`
    /// - `MODSCOPE_PROVIDER_RETRY_MAX_DELAY_MS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ModerationConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("MODSCOPE_AZURE_SEVERITY_THRESHOLD") {
            config.thresholds.azure_severity = parse_var("MODSCOPE_AZURE_SEVERITY_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("MODSCOPE_GOOGLE_EXPLICIT_THRESHOLD") {
            config.thresholds.google_explicit =
                parse_var("MODSCOPE_GOOGLE_EXPLICIT_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("MODSCOPE_GOOGLE_LABEL_THRESHOLD") {
            config.thresholds.google_label = parse_var("MODSCOPE_GOOGLE_LABEL_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("MODSCOPE_PROVIDER_TIMEOUT_SECS") {
            config.provider_timeout =
                Duration::from_secs(parse_var("MODSCOPE_PROVIDER_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("MODSCOPE_ANALYSIS_TIMEOUT_SECS") {
            config.analysis_timeout =
                Duration::from_secs(parse_var("MODSCOPE_ANALYSIS_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("MODSCOPE_PROVIDER_MAX_ATTEMPTS") {
            config.retry = config
                .retry
                .with_max_attempts(parse_var("MODSCOPE_PROVIDER_MAX_ATTEMPTS", &v)?);
        }
        if let Some(v) = lookup("MODSCOPE_PROVIDER_RETRY_DELAY_MS") {
            config.retry = config.retry.with_initial_delay(Duration::from_millis(parse_var(
                "MODSCOPE_PROVIDER_RETRY_DELAY_MS",
                &v,
            )?));
        }
        if let Some(v) = lookup("MODSCOPE_PROVIDER_RETRY_MAX_DELAY_MS") {
            config.retry = config.retry.with_max_delay(Duration::from_millis(parse_var(
                "MODSCOPE_PROVIDER_RETRY_MAX_DELAY_MS",
                &v,
            )?));
        }

        config.validate_config()?;
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ModerationError::Config(format!("invalid value for {name}: {value:?}")))
}
