//! Epistemic middleware pipeline
//!
//! [`EpistemicMiddleware`] owns the per-session state (call counter and the
//! last updated vector set). The lock around that state is only taken for
//! the counter bump and the final write; the executor and the wrapped
//! operation are awaited without it.

mod response;
mod summary;

pub use response::{EnrichedResponse, EpistemicReport, PipelineResponse};
pub use summary::summarize;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use episteme_common::{
    ActionOutcome, EpistemeError, ProfileRegistry, Result, RoutingDecision, Snapshot,
    SnapshotStore, ThresholdProfile, VectorSet,
};
use episteme_core::{route, ScoringStrategy, UpdatePolicy, VectorAssessor, VectorUpdater};
use parking_lot::Mutex;
use prometheus::Registry;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::config::PipelineConfig;
use crate::executor::{ExecutorError, ModeExecutor, NoopExecutor};
use crate::operation::{Arguments, Content, OperationResult};
use crate::telemetry::PipelineMetrics;

#[derive(Debug, Default)]
struct PipelineState {
    call_count: u64,
    current: Option<VectorSet>,
    last_decision: Option<RoutingDecision>,
}

/// Wraps operations with assessment, routing, execution and update
pub struct EpistemicMiddleware {
    config: PipelineConfig,
    profile: ThresholdProfile,
    assessor: VectorAssessor,
    updater: VectorUpdater,
    executor: Arc<dyn ModeExecutor>,
    store: Option<Arc<dyn SnapshotStore>>,
    metrics: Option<Arc<PipelineMetrics>>,
    state: Mutex<PipelineState>,
}

impl EpistemicMiddleware {
    pub fn builder(config: PipelineConfig) -> EpistemicMiddlewareBuilder {
        EpistemicMiddlewareBuilder::new(config)
    }

    /// Middleware with built-in profiles, heuristic scoring and no executor
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Process one call
    ///
    /// Never fails: errors from `wrapped` become a `success=false` entry and
    /// executor failures only drop the guidance.
    ///
    /// Panics in `wrapped` propagate. By then the call has been counted but
    /// no vector set is stored for it.
    #[instrument(skip(self, arguments, wrapped), fields(session = %self.config.session_id))]
    pub async fn handle<F, Fut>(
        &self,
        operation_name: &str,
        arguments: Arguments,
        wrapped: F,
    ) -> PipelineResponse
    where
        F: FnOnce(String, Arguments) -> Fut,
        Fut: Future<Output = OperationResult>,
    {
        if !self.config.enabled {
            if let Some(metrics) = &self.metrics {
                metrics.bypassed_total.inc();
            }
            return PipelineResponse::Bypassed(wrapped(operation_name.to_string(), arguments).await);
        }

        let call_number = {
            let mut state = self.state.lock();
            state.call_count += 1;
            state.call_count
        };

        let summary = summarize(operation_name, &arguments, self.config.summary_max_chars);
        let vectors = self.assessor.assess(&summary);
        let decision = route(&vectors, &summary, Some(&self.profile));
        debug!(
            call_number,
            mode = %decision.mode,
            confidence = decision.confidence,
            "Routed call"
        );

        let (guidance, result) = tokio::join!(
            self.run_executor(decision.clone(), operation_name),
            wrapped(operation_name.to_string(), arguments),
        );

        let outcome = match &result {
            Ok(output) => ActionOutcome::success(output.to_value()),
            Err(e) => {
                warn!(operation = operation_name, error = %e, "Wrapped operation failed");
                ActionOutcome::failure(e.to_failure_value())
            }
        };
        let updated = self
            .updater
            .update(&vectors, decision.mode.as_str(), &outcome);

        {
            let mut state = self.state.lock();
            state.current = Some(updated);
            state.last_decision = Some(decision.clone());
        }

        if let Some(metrics) = &self.metrics {
            metrics.calls_total.inc();
            metrics.record_route(decision.mode);
            if result.is_err() {
                metrics.wrapped_failures_total.inc();
            }
        }

        self.maybe_snapshot(call_number, operation_name, &decision, &updated, outcome.success)
            .await;

        let report = EpistemicReport {
            call_number,
            session_id: self.config.session_id.clone(),
            operation: operation_name.to_string(),
            vectors,
            routing: decision,
            success: result.is_ok(),
            error: result.as_ref().err().map(ToString::to_string),
        };

        PipelineResponse::Enriched(enrich(guidance, result, report))
    }

    async fn run_executor(&self, decision: RoutingDecision, operation_name: &str) -> Option<String> {
        let fut = self
            .executor
            .execute(decision.mode, &self.config.session_id, operation_name);

        let result = match self.config.executor_timeout_ms {
            Some(ms) => tokio::time::timeout(Duration::from_millis(ms), fut)
                .await
                .unwrap_or(Err(ExecutorError::Timeout(ms))),
            None => fut.await,
        };

        match result {
            Ok(guidance) => guidance.guidance,
            Err(e) => {
                warn!(mode = %decision.mode, error = %e, "Mode executor failed, omitting guidance");
                if let Some(metrics) = &self.metrics {
                    metrics.executor_failures_total.inc();
                }
                None
            }
        }
    }

    async fn maybe_snapshot(
        &self,
        call_number: u64,
        operation_name: &str,
        decision: &RoutingDecision,
        vectors: &VectorSet,
        success: bool,
    ) {
        let Some(store) = &self.store else {
            return;
        };
        let every = self.config.snapshot_every;
        if every == 0 || call_number % every != 0 {
            return;
        }

        let snapshot = Snapshot::capture(
            *vectors,
            json!({
                "session_id": self.config.session_id,
                "operation": operation_name,
                "mode": decision.mode,
                "success": success,
                "call_number": call_number,
            }),
        );
        match store.write(&snapshot).await {
            Ok(id) => {
                debug!(id = %id, call_number, "Snapshot written");
                if let Some(metrics) = &self.metrics {
                    metrics.snapshots_written_total.inc();
                }
            }
            Err(e) => warn!(error = %e, call_number, "Snapshot write failed"),
        }
    }

    /// Calls processed with epistemic routing since construction
    pub fn call_count(&self) -> u64 {
        self.state.lock().call_count
    }

    /// Vector set after the most recent call's outcome, if any call has run
    pub fn get_state(&self) -> Option<VectorSet> {
        self.state.lock().current
    }

    pub fn last_decision(&self) -> Option<RoutingDecision> {
        self.state.lock().last_decision.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub fn profile(&self) -> &ThresholdProfile {
        &self.profile
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

fn enrich(guidance: Option<String>, result: OperationResult, report: EpistemicReport) -> EnrichedResponse {
    let mut content = Vec::new();
    if let Some(text) = &guidance {
        content.push(Content::text(text.clone()));
    }
    match result {
        Ok(output) => content.extend(output.content),
        Err(e) => content.push(Content::json(e.to_failure_value())),
    }
    content.push(Content::json(
        serde_json::to_value(&report).unwrap_or(serde_json::Value::Null),
    ));

    EnrichedResponse {
        content,
        guidance,
        report,
    }
}

/// Builder for [`EpistemicMiddleware`]
pub struct EpistemicMiddlewareBuilder {
    config: PipelineConfig,
    profiles: Option<ProfileRegistry>,
    profile: Option<ThresholdProfile>,
    strategy: Option<Arc<dyn ScoringStrategy>>,
    policy: Option<Arc<dyn UpdatePolicy>>,
    executor: Arc<dyn ModeExecutor>,
    store: Option<Arc<dyn SnapshotStore>>,
    metrics: Option<Arc<PipelineMetrics>>,
    registry: Option<Registry>,
}

impl EpistemicMiddlewareBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            profiles: None,
            profile: None,
            strategy: None,
            policy: None,
            executor: Arc::new(NoopExecutor),
            store: None,
            metrics: None,
            registry: None,
        }
    }

    /// Registry to resolve `config.profile` against
    pub fn profiles(mut self, profiles: ProfileRegistry) -> Self {
        self.profiles = Some(profiles);
        self
    }

    /// Use this profile directly, ignoring `config.profile`
    pub fn profile(mut self, profile: ThresholdProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn scoring_strategy(mut self, strategy: Arc<dyn ScoringStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn update_policy(mut self, policy: Arc<dyn UpdatePolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn executor(mut self, executor: Arc<dyn ModeExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn metrics(mut self, metrics: Arc<PipelineMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Create fresh metrics and register them here on build
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<EpistemicMiddleware> {
        self.config.validate()?;

        let profile = match self.profile {
            Some(profile) => {
                profile.validate()?;
                profile
            }
            None => {
                let profiles = match (self.profiles, &self.config.profiles_path) {
                    (Some(profiles), _) => profiles,
                    (None, Some(path)) => ProfileRegistry::from_file(path)?,
                    (None, None) => ProfileRegistry::builtin(),
                };
                profiles.get(&self.config.profile)?.clone()
            }
        };

        let metrics = match (self.metrics, self.registry) {
            (Some(metrics), _) => Some(metrics),
            (None, Some(registry)) => {
                let metrics = PipelineMetrics::new()
                    .map_err(|e| EpistemeError::Internal(e.to_string()))?;
                metrics
                    .register(&registry)
                    .map_err(|e| EpistemeError::Internal(e.to_string()))?;
                Some(Arc::new(metrics))
            }
            (None, None) => None,
        };

        let assessor = match self.strategy {
            Some(strategy) => VectorAssessor::new(strategy),
            None => VectorAssessor::default(),
        };
        let updater = match self.policy {
            Some(policy) => VectorUpdater::with_policy(self.config.learning_rate, policy),
            None => VectorUpdater::new(self.config.learning_rate),
        };

        info!(
            session = %self.config.session_id,
            enabled = self.config.enabled,
            profile = %profile.name,
            scorer = assessor.strategy_name(),
            "Epistemic middleware ready"
        );

        Ok(EpistemicMiddleware {
            config: self.config,
            profile,
            assessor,
            updater,
            executor: self.executor,
            store: self.store,
            metrics,
            state: Mutex::new(PipelineState::default()),
        })
    }
}
