//! Vector Update
//!
//! Folds an action outcome into an existing [`VectorSet`]. The updater is
//! pure: it returns a new set and never touches its input.
//!
//! The rule itself is an [`UpdatePolicy`]. The default
//! [`LearningRatePolicy`] ignores the action type; [`ScaledPolicy`] shows how
//! mode-specific behavior layers on top without changing the interface.

use std::collections::HashMap;
use std::sync::Arc;

use episteme_common::{ActionOutcome, Dimension, VectorSet, DEFAULT_LEARNING_RATE};

/// Trait for vector update rules
pub trait UpdatePolicy: Send + Sync {
    /// Derive the next vector set; the result may be unclamped
    fn apply(
        &self,
        previous: &VectorSet,
        action_type: &str,
        outcome: &ActionOutcome,
        learning_rate: f64,
    ) -> VectorSet;
}

/// Fixed-step rule
///
/// Success moves `know` and `clarity` up and `uncertainty` down by one step;
/// failure does the inverse.
#[derive(Debug, Clone, Copy, Default)]
pub struct LearningRatePolicy;

impl UpdatePolicy for LearningRatePolicy {
    fn apply(
        &self,
        previous: &VectorSet,
        _action_type: &str,
        outcome: &ActionOutcome,
        learning_rate: f64,
    ) -> VectorSet {
        let step = if outcome.success {
            learning_rate
        } else {
            -learning_rate
        };
        previous
            .with(Dimension::Know, previous.know + step)
            .with(Dimension::Clarity, previous.clarity + step)
            .with(Dimension::Uncertainty, previous.uncertainty - step)
    }
}

/// Scales the learning rate per action type before delegating
pub struct ScaledPolicy {
    inner: Arc<dyn UpdatePolicy>,
    multipliers: HashMap<String, f64>,
}

impl ScaledPolicy {
    pub fn new(inner: Arc<dyn UpdatePolicy>) -> Self {
        Self {
            inner,
            multipliers: HashMap::new(),
        }
    }

    /// Use `multiplier × learning_rate` for `action_type`
    pub fn with_multiplier(mut self, action_type: impl Into<String>, multiplier: f64) -> Self {
        self.multipliers.insert(action_type.into(), multiplier);
        self
    }
}

impl UpdatePolicy for ScaledPolicy {
    fn apply(
        &self,
        previous: &VectorSet,
        action_type: &str,
        outcome: &ActionOutcome,
        learning_rate: f64,
    ) -> VectorSet {
        let multiplier = self
            .multipliers
            .get(action_type)
            .copied()
            .filter(|m| m.is_finite() && *m >= 0.0)
            .unwrap_or(1.0);
        self.inner
            .apply(previous, action_type, outcome, learning_rate * multiplier)
    }
}

/// Applies an [`UpdatePolicy`] with a fixed learning rate and clamps the result
#[derive(Clone)]
pub struct VectorUpdater {
    learning_rate: f64,
    policy: Arc<dyn UpdatePolicy>,
}

impl Default for VectorUpdater {
    fn default() -> Self {
        Self::new(DEFAULT_LEARNING_RATE)
    }
}

impl VectorUpdater {
    /// Updater using [`LearningRatePolicy`]
    ///
    /// The rate is clamped to [0, 1]; a NaN rate falls back to the default.
    pub fn new(learning_rate: f64) -> Self {
        Self::with_policy(learning_rate, Arc::new(LearningRatePolicy))
    }

    pub fn with_policy(learning_rate: f64, policy: Arc<dyn UpdatePolicy>) -> Self {
        let learning_rate = if learning_rate.is_nan() {
            DEFAULT_LEARNING_RATE
        } else {
            learning_rate.clamp(0.0, 1.0)
        };
        Self {
            learning_rate,
            policy,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Fold `outcome` into `previous`, returning a new clamped set
    pub fn update(
        &self,
        previous: &VectorSet,
        action_type: &str,
        outcome: &ActionOutcome,
    ) -> VectorSet {
        let start = previous.clamped();
        self.policy
            .apply(&start, action_type, outcome, self.learning_rate)
            .clamped()
    }
}
