//! # Episteme Sidecar
//!
//! Middleware that wraps an arbitrary operation with epistemic processing:
//!
//! ```text
//! handle(name, args, wrapped)
//!   │
//!   ├─ disabled? ──► wrapped(name, args) ──► result, unmodified
//!   │
//!   ├─ count call
//!   ├─ assess summary ──► VectorSet (pre-update)
//!   ├─ route ──► RoutingDecision
//!   ├─ ModeExecutor(mode) ─┐  concurrently
//!   ├─ wrapped(name, args) ┘  (errors captured, never raised)
//!   ├─ update(pre, mode, outcome) ──► stored for get_state()
//!   ├─ optional snapshot write
//!   └─ enrich: guidance + output + trailing report (pre-update vectors)
//! ```
//!
//! One [`EpistemicMiddleware`] per session; instances share nothing.

pub mod config;
pub mod executor;
pub mod operation;
pub mod pipeline;
pub mod telemetry;

pub use config::PipelineConfig;
pub use executor::{ExecutorError, ModeExecutor, ModeGuidance, NoopExecutor, StaticGuidanceExecutor};
pub use operation::{Arguments, Content, OperationError, OperationOutput, OperationResult};
pub use pipeline::{
    EnrichedResponse, EpistemicMiddleware, EpistemicMiddlewareBuilder, EpistemicReport,
    PipelineResponse,
};
pub use telemetry::PipelineMetrics;

/// Default cap on the argument dump passed to the assessor
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 500;
