//! Core data types
//!
//! Provider-agnostic shapes shared by the normalizers, the consensus engine
//! and the analysis controller.

pub mod consensus;
pub mod content;
pub mod moderation;
pub mod state;

pub use consensus::{ConsensusConfidence, ConsensusResult};
pub use content::{ContentId, ContentItem, Priority, ReviewStatus, SourceLocator, UploadMetadata};
pub use moderation::{
    ModerationResult, PROVIDER_AZURE, PROVIDER_CONSENSUS, PROVIDER_GOOGLE_VIDEO, PROVIDER_OPENAI,
    TimeMarker,
};
pub use state::{AnalysisStatus, ModerationState};
