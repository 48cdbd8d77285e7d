//! Re-analysis controller

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Mutex;

use crate::analysis::{ItemIndicator, item_indicator, merge_results};
use crate::config::ModerationConfig;
use crate::error::{ModerationError, ProviderFailure, Result};
use crate::retry::RetryExecutor;
use crate::traits::{ModerationProvider, ModerationStore};
use crate::types::{AnalysisStatus, ContentId, ContentItem, ModerationResult, ModerationState};

use super::outcome::{AnalysisOutcome, SkipReason, TriggerOutcome};

/// Single source of truth for per-item analysis state.
///
/// Each item has at most one analysis in flight: the move into
/// `analyzing` is a check-and-set under the state lock, and a second
/// trigger observes `analyzing` and is skipped. Items settle
/// independently of each other.
pub struct AnalysisController {
    providers: Vec<Arc<dyn ModerationProvider>>,
    store: Arc<dyn ModerationStore>,
    config: ModerationConfig,
    states: Mutex<HashMap<ContentId, ModerationState>>,
}

impl std::fmt::Debug for AnalysisController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let providers: Vec<&str> = self.providers.iter().map(|p| p.provider_id()).collect();
        f.debug_struct("AnalysisController")
            .field("providers", &providers)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AnalysisController {
    pub fn new(
        providers: Vec<Arc<dyn ModerationProvider>>,
        store: Arc<dyn ModerationStore>,
        config: ModerationConfig,
    ) -> Result<Self> {
        config.validate_config()?;
        if providers.is_empty() {
            return Err(ModerationError::NoProviders);
        }
        Ok(Self {
            providers,
            store,
            config,
            states: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &ModerationConfig {
        &self.config
    }

    /// Load persisted states for `items`.
    ///
    /// Items without a persisted record keep the state they carry. A
    /// persisted `analyzing` record belongs to an analysis that never
    /// settled; it is restored as `failed` so the item can be re-run.
    pub async fn hydrate(&self, items: &[ContentItem]) -> Result<()> {
        let mut persisted = self.store.load_all().await?;
        let mut interrupted = Vec::new();
        {
            let mut states = self.states.lock().await;
            for item in items {
                if states.get(&item.id).is_some_and(ModerationState::is_analyzing) {
                    continue;
                }
                let state = persisted
                    .remove(&item.id)
                    .unwrap_or_else(|| item.moderation.clone());
                let state = if state.is_analyzing() {
                    interrupted.push(item.id.clone());
                    ModerationState::Failed
                } else {
                    state
                };
                states.insert(item.id.clone(), state);
            }
        }

        for id in &interrupted {
            tracing::warn!(item_id = %id, "analysis was interrupted, marking failed");
            self.store.save(id, &ModerationState::Failed).await?;
        }
        tracing::debug!(
            items = items.len(),
            interrupted = interrupted.len(),
            "moderation states hydrated"
        );
        Ok(())
    }

    /// Current state of `id`; unknown items are `pending`.
    pub async fn state(&self, id: &ContentId) -> ModerationState {
        self.states.lock().await.get(id).cloned().unwrap_or_default()
    }

    pub async fn indicator(&self, id: &ContentId) -> ItemIndicator {
        item_indicator(&self.state(id).await)
    }

    /// Analyze `item` if it has never been analyzed and has a source.
    ///
    /// Completed and failed items are left alone, which keeps page reloads
    /// from re-billing providers.
    pub async fn auto_trigger(&self, item: &ContentItem) -> Result<TriggerOutcome> {
        self.trigger(item, false).await
    }

    /// Explicit reviewer-initiated analysis, allowed from any settled state.
    pub async fn rerun(&self, item: &ContentItem) -> Result<TriggerOutcome> {
        self.trigger(item, true).await
    }

    /// [`auto_trigger`](Self::auto_trigger) every item concurrently.
    pub async fn auto_trigger_all(
        &self,
        items: &[ContentItem],
    ) -> Vec<(ContentId, Result<TriggerOutcome>)> {
        join_all(
            items
                .iter()
                .map(|item| async move { (item.id.clone(), self.auto_trigger(item).await) }),
        )
        .await
    }

    async fn claim(
        &self,
        item: &ContentItem,
        rerun: bool,
    ) -> std::result::Result<ModerationState, SkipReason> {
        if !item.has_source() {
            return Err(SkipReason::NoSource);
        }

        let mut states = self.states.lock().await;
        let current = match states.get(&item.id) {
            Some(state) => state.clone(),
            // Not hydrated: trust the state the item carries.
            None => {
                let carried = if item.moderation.is_analyzing() {
                    ModerationState::Failed
                } else {
                    item.moderation.clone()
                };
                states.insert(item.id.clone(), carried.clone());
                carried
            }
        };
        match current.status() {
            AnalysisStatus::Analyzing => return Err(SkipReason::AlreadyAnalyzing),
            status @ (AnalysisStatus::Completed | AnalysisStatus::Failed) if !rerun => {
                return Err(SkipReason::AlreadySettled(status));
            }
            _ => {}
        }
        states.insert(item.id.clone(), ModerationState::Analyzing);
        Ok(current)
    }

    async fn trigger(&self, item: &ContentItem, rerun: bool) -> Result<TriggerOutcome> {
        let previous = match self.claim(item, rerun).await {
            Ok(previous) => previous,
            Err(reason) => {
                tracing::debug!(item_id = %item.id, ?reason, "analysis not dispatched");
                return Ok(TriggerOutcome::Skipped(reason));
            }
        };

        if let Err(e) = self.store.save(&item.id, &ModerationState::Analyzing).await {
            self.states.lock().await.insert(item.id.clone(), previous);
            return Err(e);
        }
        tracing::info!(
            item_id = %item.id,
            from = %previous.status(),
            status = %AnalysisStatus::Analyzing,
            rerun,
            "analysis started"
        );

        let outcome = self.analyze(item).await;
        let state = match &outcome.result {
            Some(result) => ModerationState::Completed {
                result: result.clone(),
            },
            None => ModerationState::Failed,
        };

        self.states.lock().await.insert(item.id.clone(), state.clone());
        self.store.save(&item.id, &state).await?;

        match &outcome.result {
            Some(result) => tracing::info!(
                item_id = %item.id,
                status = %outcome.status,
                provider = %result.provider,
                flagged = result.flagged,
                categories = result.categories.len(),
                failed_providers = outcome.failures.len(),
                "analysis completed"
            ),
            None => tracing::warn!(
                item_id = %item.id,
                status = %outcome.status,
                error = ?outcome.error.as_ref().map(ToString::to_string),
                "analysis failed"
            ),
        }
        Ok(TriggerOutcome::Analyzed(outcome))
    }

    async fn analyze(&self, item: &ContentItem) -> AnalysisOutcome {
        let calls = self
            .providers
            .iter()
            .map(|provider| self.call_provider(provider.as_ref(), item));

        let settled = match tokio::time::timeout(self.config.analysis_timeout, join_all(calls)).await
        {
            Ok(settled) => settled,
            Err(_) => {
                let error = ModerationError::AnalysisTimeout {
                    item_id: item.id.to_string(),
                    timeout: self.config.analysis_timeout,
                };
                let failures = self
                    .providers
                    .iter()
                    .map(|p| ProviderFailure::new(p.provider_id(), &error))
                    .collect();
                return AnalysisOutcome::failed(item.id.clone(), failures, error);
            }
        };

        let mut results = Vec::new();
        let mut failures = Vec::new();
        for (provider, settled) in self.providers.iter().zip(settled) {
            match settled {
                Ok(result) => results.push(result),
                Err(e) => failures.push(ProviderFailure::new(provider.provider_id(), &e)),
            }
        }

        match merge_results(results, Utc::now()) {
            Some(result) => AnalysisOutcome::completed(item.id.clone(), result, failures),
            None => {
                let error = ModerationError::AllProvidersFailed {
                    item_id: item.id.to_string(),
                    failures: failures.clone(),
                };
                AnalysisOutcome::failed(item.id.clone(), failures, error)
            }
        }
    }

    async fn call_provider(
        &self,
        provider: &dyn ModerationProvider,
        item: &ContentItem,
    ) -> Result<ModerationResult> {
        let provider_id = provider.provider_id();
        let timeout = self.config.provider_timeout;

        let raw = RetryExecutor::new(self.config.retry.clone())
            .execute(|| async move {
                match tokio::time::timeout(timeout, provider.moderate(item)).await {
                    Ok(response) => response,
                    Err(_) => Err(ModerationError::ProviderTimeout {
                        provider: provider_id.to_string(),
                        timeout,
                    }),
                }
            })
            .await;

        let result = raw.and_then(|raw| raw.normalize(&self.config.thresholds, Utc::now()));
        match &result {
            Ok(result) => tracing::debug!(
                item_id = %item.id,
                provider = provider_id,
                flagged = result.flagged,
                "provider settled"
            ),
            Err(e) => tracing::warn!(
                item_id = %item.id,
                provider = provider_id,
                error = %e,
                category = ?e.category(),
                "provider failed"
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::RawProviderResponse;
    use crate::storage::InMemoryStore;
    use crate::types::{PROVIDER_AZURE, SourceLocator};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing_test::traced_test;

    struct AzureStub {
        calls: AtomicUsize,
        severity: i64,
        delay: Duration,
    }

    impl AzureStub {
        fn new(severity: i64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                severity,
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl ModerationProvider for AzureStub {
        fn provider_id(&self) -> &str {
            PROVIDER_AZURE
        }

        async fn moderate(&self, _item: &ContentItem) -> Result<RawProviderResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            RawProviderResponse::from_json(
                PROVIDER_AZURE,
                &serde_json::json!({
                    "categoriesAnalysis": [{ "category": "Hate", "severity": self.severity }]
                }),
            )
        }
    }

    fn item(id: &str) -> ContentItem {
        ContentItem::new(id, "clip")
            .with_source(SourceLocator::Url("https://cdn.example.com/clip.mp4".into()))
    }

    fn controller(provider: Arc<AzureStub>) -> AnalysisController {
        AnalysisController::new(
            vec![provider],
            Arc::new(InMemoryStore::new()),
            ModerationConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn requires_a_provider() {
        let err = AnalysisController::new(
            Vec::new(),
            Arc::new(InMemoryStore::new()),
            ModerationConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, ModerationError::NoProviders);
    }

    #[tokio::test]
    async fn item_without_source_is_not_dispatched() {
        let provider = Arc::new(AzureStub::new(4));
        let controller = controller(provider.clone());

        let outcome = controller
            .auto_trigger(&ContentItem::new("no-source", "draft"))
            .await
            .unwrap();
        assert_eq!(outcome, TriggerOutcome::Skipped(SkipReason::NoSource));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn concurrent_triggers_dispatch_once() {
        let provider = Arc::new(AzureStub {
            delay: Duration::from_millis(50),
            ..AzureStub::new(4)
        });
        let controller = controller(provider.clone());
        let item = item("racy");

        let (a, b) = tokio::join!(controller.auto_trigger(&item), controller.auto_trigger(&item));
        let skipped = [a.unwrap(), b.unwrap()]
            .iter()
            .filter(|o| o.is_skipped())
            .count();

        assert_eq!(skipped, 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            controller.indicator(&item.id).await,
            ItemIndicator::Flagged { count: 1 }
        );
    }

    #[tokio::test]
    async fn rerun_analyzes_a_completed_item_again() {
        let provider = Arc::new(AzureStub::new(0));
        let controller = controller(provider.clone());
        let item = item("again");

        controller.auto_trigger(&item).await.unwrap();
        let skipped = controller.auto_trigger(&item).await.unwrap();
        assert_eq!(
            skipped,
            TriggerOutcome::Skipped(SkipReason::AlreadySettled(AnalysisStatus::Completed))
        );

        let rerun = controller.rerun(&item).await.unwrap();
        assert!(rerun.outcome().is_some_and(AnalysisOutcome::is_completed));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(controller.indicator(&item.id).await, ItemIndicator::Clean);
    }

    #[tokio::test]
    #[traced_test]
    async fn transitions_are_logged() {
        let controller = controller(Arc::new(AzureStub::new(6)));
        controller.auto_trigger(&item("logged")).await.unwrap();

        assert!(logs_contain("analysis started"));
        assert!(logs_contain("analysis completed"));
        assert!(logs_contain("item_id=logged"));
    }
}
