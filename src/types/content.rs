//! Content items under review

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::ModerationState;

/// Number of trailing id characters shown in the short display tag.
const DISPLAY_TAG_LEN: usize = 5;

/// Stable identifier of a content item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id for a newly uploaded item.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short tag shown in lists: `#` followed by the last five characters.
    ///
    /// Ids that already carry a leading `#` are shown unchanged.
    pub fn display_tag(&self) -> String {
        if self.0.starts_with('#') {
            return self.0.clone();
        }
        let chars: Vec<char> = self.0.chars().collect();
        let start = chars.len().saturating_sub(DISPLAY_TAG_LEN);
        let tail: String = chars[start..].iter().collect();
        format!("#{tail}")
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Review priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// Human review workflow status (independent of automated analysis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Where the media can be fetched from for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum SourceLocator {
    /// Publicly reachable URL
    Url(String),
    /// Object path in the storage collaborator (bucket key, `gs://` URI)
    Storage(String),
}

impl SourceLocator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(s) | Self::Storage(s) => s,
        }
    }
}

/// Upload metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadMetadata {
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

impl UploadMetadata {
    pub fn new(uploaded_at: DateTime<Utc>) -> Self {
        Self {
            uploaded_at,
            file_size: None,
            duration_seconds: None,
        }
    }
}

/// A piece of submitted media under review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLocator>,
    pub upload: UploadMetadata,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub user_reports: u64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub moderation: ModerationState,
}

impl ContentItem {
    /// Create an item with no source, medium priority and pending state.
    pub fn new(id: impl Into<ContentId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            source: None,
            upload: UploadMetadata::new(Utc::now()),
            views: 0,
            user_reports: 0,
            priority: Priority::default(),
            status: ReviewStatus::default(),
            moderation: ModerationState::default(),
        }
    }

    pub fn with_source(mut self, source: SourceLocator) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_upload(mut self, upload: UploadMetadata) -> Self {
        self.upload = upload;
        self
    }

    /// Whether there is something to analyze. Blank locators count as absent.
    pub fn has_source(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|s| !s.as_str().trim().is_empty())
    }
}
