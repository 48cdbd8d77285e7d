//! Shared test doubles

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use modscope::prelude::*;
use serde_json::Value;

pub fn fixture(name: &str) -> Value {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    let raw = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{path}: {e}"));
    serde_json::from_str(&raw).unwrap()
}

#[derive(Debug, Clone)]
pub enum Step {
    Respond(Value),
    Fail { retryable: bool },
}

/// Provider that replays a script, repeating the last step once exhausted.
#[derive(Debug)]
pub struct ScriptedProvider {
    id: &'static str,
    steps: Vec<Step>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn scripted(id: &'static str, steps: Vec<Step>) -> Self {
        assert!(!steps.is_empty());
        Self {
            id,
            steps,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn responding(id: &'static str, body: Value) -> Self {
        Self::scripted(id, vec![Step::Respond(body)])
    }

    pub fn failing(id: &'static str, retryable: bool) -> Self {
        Self::scripted(id, vec![Step::Fail { retryable }])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModerationProvider for ScriptedProvider {
    fn provider_id(&self) -> &str {
        self.id
    }

    async fn moderate(&self, _item: &ContentItem) -> Result<RawProviderResponse> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.steps[n.min(self.steps.len() - 1)] {
            Step::Respond(body) => RawProviderResponse::from_json(self.id, body),
            Step::Fail { retryable } => Err(ModerationError::provider_call(
                self.id,
                format!("scripted failure on call {}", n + 1),
                *retryable,
            )),
        }
    }
}

pub fn video_item(id: &str) -> ContentItem {
    ContentItem::new(id, "Uploaded clip")
        .with_source(SourceLocator::Storage(format!("moderation-uploads/{id}.mp4")))
}
