//! Moderation provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::providers::RawProviderResponse;
use crate::types::ContentItem;

/// A third-party moderation service.
///
/// Adapters own request shaping, authentication and transport; they hand
/// back the decoded native response and leave normalization to the
/// analysis controller. Every call may be billed, so implementations
/// should not retry on their own.
#[async_trait]
pub trait ModerationProvider: Send + Sync {
    /// Provider id, one of the `PROVIDER_*` constants for built-in shapes
    fn provider_id(&self) -> &str;

    async fn moderate(&self, item: &ContentItem) -> Result<RawProviderResponse>;
}
