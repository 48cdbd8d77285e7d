//! JSON file store
//!
//! All states live in one document keyed by item id. Writes go to a
//! sibling temp file that is renamed over the document.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{ModerationError, Result};
use crate::traits::ModerationStore;
use crate::types::{ContentId, ModerationState};

type Document = BTreeMap<ContentId, ModerationState>;

/// Single JSON document mapping content id to `{status, result?}`.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// document, so readers never observe a partially written file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Document> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => {
                return Err(ModerationError::Storage(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_document(&self, document: &Document) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(document)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ModerationStore for JsonFileStore {
    async fn load(&self, id: &ContentId) -> Result<Option<ModerationState>> {
        Ok(self.read_document().await?.remove(id))
    }

    async fn load_all(&self) -> Result<HashMap<ContentId, ModerationState>> {
        Ok(self.read_document().await?.into_iter().collect())
    }

    async fn save(&self, id: &ContentId, state: &ModerationState) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        document.insert(id.clone(), state.clone());
        self.write_document(&document).await?;
        tracing::trace!(item_id = %id, status = %state.status(), path = %self.path.display(), "state persisted");
        Ok(())
    }
}
