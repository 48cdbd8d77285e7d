//! Persistence trait for analysis state

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ContentId, ModerationState};

/// Durable record of `{status, result?}` per content item.
///
/// The analysis controller is the only writer. A missing record means the
/// item was never analyzed.
#[async_trait]
pub trait ModerationStore: Send + Sync {
    async fn load(&self, id: &ContentId) -> Result<Option<ModerationState>>;

    async fn load_all(&self) -> Result<HashMap<ContentId, ModerationState>>;

    async fn save(&self, id: &ContentId, state: &ModerationState) -> Result<()>;
}
