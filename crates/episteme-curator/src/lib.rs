//! # Episteme Curator
//!
//! Retention for vector snapshots. Snapshots accumulate as flat JSON files;
//! curation keeps the ones worth resuming from and moves the rest into an
//! archive directory.
//!
//! ## Retention rules
//!
//! Evaluated newest first, first match wins:
//!
//! | Rule           | Keeps when                                         |
//! |----------------|----------------------------------------------------|
//! | `recent`       | among the N most recent (default 5)                |
//! | `high_impact`  | impact >= 0.7                                      |
//! | `milestone`    | completion >= 0.9 and impact >= 0.5                |
//! | `resume_point` | 0.3 <= completion <= 0.7 and impact >= 0.6         |
//! | `best_of_day`  | highest impact within a +/- W/2 window (W = 24h)   |
//!
//! Anything else is archived. Only the active directory is ever listed, so a
//! second run never re-archives.
//!
//! Curation runs against the same directory must not overlap; callers
//! serialize them.

pub mod engine;
pub mod policy;
pub mod store;
pub mod timestamp;

pub use engine::{CurationEngine, CurationReport, Decision, Reason, SkippedEntry, SnapshotDecision};
pub use policy::CurationPolicy;
pub use store::FsSnapshotStore;
