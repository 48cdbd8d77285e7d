//! OpenAI Moderation
//!
//! Scores are already on `[0, 1]` and are copied as-is; a category is
//! flagged exactly when the API marks it so.

mod transformers;
mod types;

pub use transformers::OpenAiResponseTransformer;
pub use types::{OpenAiCategories, OpenAiModerationEntry, OpenAiModerationResponse};
