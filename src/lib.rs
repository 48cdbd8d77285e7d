//! # modscope
//!
//! Aggregation core for content moderation. Independent provider
//! responses (OpenAI Moderation, Azure Content Safety, Google Video
//! Intelligence) are normalized into one result type, video detections
//! are mapped back to the time offsets they occurred at, results from
//! several providers are merged into a consensus, and a per-item state
//! machine makes sure an item is analyzed (and billed) once unless a
//! reviewer explicitly asks again.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use modscope::prelude::*;
//!
//! let controller = AnalysisController::new(
//!     vec![Arc::new(my_openai_adapter), Arc::new(my_azure_adapter)],
//!     Arc::new(JsonFileStore::new("moderation.json")),
//!     ModerationConfig::from_env()?,
//! )?;
//! controller.hydrate(&items).await?;
//! for (id, outcome) in controller.auto_trigger_all(&items).await {
//!     println!("{id}: {:?}", outcome?);
//! }
//! ```

#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod providers;
pub mod retry;
pub mod storage;
pub mod telemetry;
pub mod traits;
pub mod transformers;
pub mod types;

pub use config::{ModerationConfig, Thresholds};
pub use error::{ModerationError, ProviderFailure, Result};
pub use orchestrator::{AnalysisController, AnalysisOutcome, SkipReason, TriggerOutcome};
pub use providers::{RawProviderResponse, normalize_json};
pub use traits::{ModerationProvider, ModerationStore};

/// Commonly used types
pub mod prelude {
    pub use crate::analysis::{
        FlagStatus, FlagView, ItemIndicator, associate, attach_timestamps, build_consensus,
        build_flags, item_indicator, labels_match, merge_results,
    };
    pub use crate::config::{ModerationConfig, Thresholds};
    pub use crate::error::{ModerationError, ProviderFailure, Result};
    pub use crate::orchestrator::{AnalysisController, AnalysisOutcome, SkipReason, TriggerOutcome};
    pub use crate::providers::{RawProviderResponse, normalize_json};
    pub use crate::retry::RetryPolicy;
    pub use crate::storage::{InMemoryStore, JsonFileStore};
    pub use crate::traits::{ModerationProvider, ModerationStore};
    pub use crate::types::*;
}
