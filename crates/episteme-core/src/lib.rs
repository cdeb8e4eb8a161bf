//! # Episteme Core
//!
//! The decision logic that turns a call description into a behavioral mode
//! and folds the call's outcome back into the belief state.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       one call                             │
//! │                                                            │
//! │  summary ──► VectorAssessor ──► VectorSet (pre-update)     │
//! │                  │                    │                    │
//! │          ScoringStrategy              ▼                    │
//! │          (pluggable)        route(vectors, profile)        │
//! │                                       │                    │
//! │                                       ▼                    │
//! │                               RoutingDecision              │
//! │                                       │                    │
//! │  outcome ──► VectorUpdater ◄──────────┘ (action = mode)    │
//! │                  │                                         │
//! │            UpdatePolicy ──► VectorSet (post-update)        │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every component here is pure: no I/O, no shared state. The middleware in
//! `episteme-sidecar` owns sequencing and state.

pub mod assessment;
pub mod routing;
pub mod update;

// Re-export core types
pub use assessment::{FnScorer, HeuristicScorer, ScoringStrategy, VectorAssessor};
pub use routing::route;
pub use update::{LearningRatePolicy, ScaledPolicy, UpdatePolicy, VectorUpdater};
