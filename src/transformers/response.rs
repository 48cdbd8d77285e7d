//! Response transformation traits

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::ModerationResult;

/// Transform a provider-specific moderation response into a [`ModerationResult`].
///
/// Implementations are pure: the same payload and timestamp always give
/// the same result.
pub trait ResponseTransformer: Send + Sync {
    /// Decoded provider payload
    type Raw;

    /// Provider identifier written into the result
    fn provider_id(&self) -> &'static str;

    fn transform_moderation_response(
        &self,
        raw: &Self::Raw,
        timestamp: DateTime<Utc>,
    ) -> Result<ModerationResult>;
}
