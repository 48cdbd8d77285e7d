//! Error Handling Module
//!
//! This module provides the error types shared by every part of the crate:
//! - Core error type (`ModerationError`) and its coarse `ErrorCategory`
//! - Per-provider failure records (`ProviderFailure`) collected during analysis
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use modscope::error::{ModerationError, ErrorCategory};
//!
//! let error = ModerationError::missing_field("azure", "categoriesAnalysis");
//! assert_eq!(error.category(), ErrorCategory::Normalization);
//! assert!(!error.is_retryable());
//! ```

mod conversions;
pub mod types;

pub use types::*;
