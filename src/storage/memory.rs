//! In-memory moderation store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::traits::ModerationStore;
use crate::types::{ContentId, ModerationState};

/// Process-local store, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    states: RwLock<HashMap<ContentId, ModerationState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `states`.
    pub fn with_states(states: impl IntoIterator<Item = (ContentId, ModerationState)>) -> Self {
        Self {
            states: RwLock::new(states.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ModerationStore for InMemoryStore {
    async fn load(&self, id: &ContentId) -> Result<Option<ModerationState>> {
        Ok(self.states.read().await.get(id).cloned())
    }

    async fn load_all(&self) -> Result<HashMap<ContentId, ModerationState>> {
        Ok(self.states.read().await.clone())
    }

    async fn save(&self, id: &ContentId, state: &ModerationState) -> Result<()> {
        self.states.write().await.insert(id.clone(), state.clone());
        Ok(())
    }
}
