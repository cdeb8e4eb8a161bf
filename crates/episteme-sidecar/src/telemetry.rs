//! Prometheus metrics for the pipeline

use episteme_common::Mode;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

/// Prometheus metrics for one middleware instance
pub struct PipelineMetrics {
    pub calls_total: IntCounter,
    pub bypassed_total: IntCounter,
    pub wrapped_failures_total: IntCounter,
    pub executor_failures_total: IntCounter,
    pub snapshots_written_total: IntCounter,
    pub routed_total: IntCounterVec,
}

impl PipelineMetrics {
    pub fn new() -> prometheus::Result<Self> {
        Ok(Self {
            calls_total: IntCounter::new(
                "episteme_pipeline_calls_total",
                "Calls processed with epistemic routing",
            )?,
            bypassed_total: IntCounter::new(
                "episteme_pipeline_bypassed_total",
                "Calls passed straight through while disabled",
            )?,
            wrapped_failures_total: IntCounter::new(
                "episteme_pipeline_wrapped_failures_total",
                "Wrapped operations that returned an error",
            )?,
            executor_failures_total: IntCounter::new(
                "episteme_pipeline_executor_failures_total",
                "Mode executor failures (guidance omitted)",
            )?,
            snapshots_written_total: IntCounter::new(
                "episteme_pipeline_snapshots_written_total",
                "Snapshots written to the store",
            )?,
            routed_total: IntCounterVec::new(
                Opts::new("episteme_pipeline_routed_total", "Routing decisions by mode"),
                &["mode"],
            )?,
        })
    }

    pub fn record_route(&self, mode: Mode) {
        self.routed_total.with_label_values(&[mode.as_str()]).inc();
    }

    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.calls_total.clone()))?;
        registry.register(Box::new(self.bypassed_total.clone()))?;
        registry.register(Box::new(self.wrapped_failures_total.clone()))?;
        registry.register(Box::new(self.executor_failures_total.clone()))?;
        registry.register(Box::new(self.snapshots_written_total.clone()))?;
        registry.register(Box::new(self.routed_total.clone()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_count() {
        let metrics = PipelineMetrics::new().unwrap();
        let registry = Registry::new();
        metrics.register(&registry).unwrap();

        metrics.record_route(Mode::Clarify);
        metrics.record_route(Mode::Clarify);
        assert_eq!(
            metrics.routed_total.with_label_values(&["clarify"]).get(),
            2
        );
        assert!(!registry.gather().is_empty());
    }
}
