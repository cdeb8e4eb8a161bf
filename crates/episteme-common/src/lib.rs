//! # Episteme Common
//!
//! Shared types and errors for the Episteme epistemic state engine.
//!
//! ## Core Types
//!
//! - [`VectorSet`]: the fixed collection of named belief scores in [0, 1]
//! - [`Mode`]/[`RoutingDecision`]: the router's discrete outcome
//! - [`ThresholdProfile`]/[`ProfileRegistry`]: named per-dimension cutoffs
//! - [`ActionOutcome`]: what the updater folds into a vector set
//! - [`Snapshot`]/[`SnapshotStore`]: persisted point-in-time vector sets

pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{EpistemeError, ProfileError, Result, ScoringError, StoreError};
pub use store::{SnapshotEntry, SnapshotStore};
pub use types::{
    mode::{Mode, RoutingDecision},
    outcome::ActionOutcome,
    profile::{ProfileRegistry, ThresholdProfile},
    snapshot::Snapshot,
    vector_set::{Dimension, VectorSet},
};

/// Episteme version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Neutral value for dimensions without evidence
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Default value for progress-type dimensions (`completion`, `impact`)
pub const ABSENT_PROGRESS_SCORE: f64 = 0.0;

/// Default learning-rate step for the vector updater
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Name of the profile used when none is configured
pub const DEFAULT_PROFILE: &str = "balanced";
