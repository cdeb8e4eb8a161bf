//! Vector Assessment
//!
//! Turns an incoming request summary into an initial [`VectorSet`].
//!
//! How text maps to numbers is a [`ScoringStrategy`]; the assessor only
//! enforces the contract around it: the result is complete, clamped, and a
//! failing strategy never reaches the caller.

mod heuristic;

pub use heuristic::HeuristicScorer;

use std::sync::Arc;

use episteme_common::{ScoringError, VectorSet};
use tracing::warn;

/// Trait for text-to-vector scoring strategies
///
/// Implementations must be deterministic for identical input.
pub trait ScoringStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Score a request summary
    fn score(&self, summary: &str) -> Result<VectorSet, ScoringError>;
}

/// Adapter that turns a closure into a [`ScoringStrategy`]
pub struct FnScorer<F> {
    name: String,
    f: F,
}

impl<F> FnScorer<F>
where
    F: Fn(&str) -> Result<VectorSet, ScoringError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> ScoringStrategy for FnScorer<F>
where
    F: Fn(&str) -> Result<VectorSet, ScoringError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn score(&self, summary: &str) -> Result<VectorSet, ScoringError> {
        (self.f)(summary)
    }
}

/// Produces the initial belief state for a request
#[derive(Clone)]
pub struct VectorAssessor {
    strategy: Arc<dyn ScoringStrategy>,
}

impl Default for VectorAssessor {
    fn default() -> Self {
        Self::new(Arc::new(HeuristicScorer::default()))
    }
}

impl VectorAssessor {
    pub fn new(strategy: Arc<dyn ScoringStrategy>) -> Self {
        Self { strategy }
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Assess a request summary
    ///
    /// Fails closed: a strategy error or a non-finite score yields
    /// [`VectorSet::maximally_uncertain`].
    pub fn assess(&self, summary: &str) -> VectorSet {
        match self.strategy.score(summary) {
            Ok(vectors) if vectors.is_well_formed() => vectors.clamped(),
            Ok(vectors) => {
                let dimension = vectors
                    .iter()
                    .find(|(_, v)| !v.is_finite())
                    .map(|(d, _)| d.to_string())
                    .unwrap_or_default();
                warn!(
                    strategy = self.strategy.name(),
                    error = %ScoringError::NonFinite { dimension },
                    "Assessment failed, falling back to maximal uncertainty"
                );
                VectorSet::maximally_uncertain()
            }
            Err(e) => {
                warn!(
                    strategy = self.strategy.name(),
                    error = %e,
                    "Assessment failed, falling back to maximal uncertainty"
                );
                VectorSet::maximally_uncertain()
            }
        }
    }
}
