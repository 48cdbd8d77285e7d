//! Type Conversions for ModerationError
//!
//! This module contains From trait implementations for converting
//! common error types into ModerationError.

use super::types::ModerationError;

impl From<serde_json::Error> for ModerationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<std::io::Error> for ModerationError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ModerationError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Config(err.to_string())
    }
}
