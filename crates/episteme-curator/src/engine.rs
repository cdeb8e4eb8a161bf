//! Curation engine
//!
//! Evaluation is a pure, single pass over the active snapshots:
//!
//! ```text
//! entries ──► resolve timestamps ──► skipped (malformed)
//!                │
//!                ▼
//!        sort newest first (stable)
//!                │
//!                ▼
//!   recent → high_impact → milestone → resume_point → best_of_day → archive
//! ```
//!
//! The best-of-window rule compares every snapshot against every other one,
//! so evaluation is quadratic in the number of active snapshots.

use chrono::{DateTime, SecondsFormat, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use episteme_common::{Snapshot, SnapshotEntry, SnapshotStore, StoreError};

use crate::policy::CurationPolicy;
use crate::timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Keep,
    Archive,
}

/// Rule that produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    Recent,
    HighImpact,
    Milestone,
    ResumePoint,
    BestOfDay,
    Archive,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Recent => "recent",
            Reason::HighImpact => "high_impact",
            Reason::Milestone => "milestone",
            Reason::ResumePoint => "resume_point",
            Reason::BestOfDay => "best_of_day",
            Reason::Archive => "archive",
        }
    }

    pub fn decision(&self) -> Decision {
        match self {
            Reason::Archive => Decision::Archive,
            _ => Decision::Keep,
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Per-snapshot outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDecision {
    pub id: String,
    pub timestamp: String,
    pub impact: f64,
    pub completion: f64,
    pub decision: Decision,
    pub reason: Reason,
}

impl SnapshotDecision {
    pub fn is_kept(&self) -> bool {
        self.decision == Decision::Keep
    }
}

/// A document that could not take part in curation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub id: String,
    pub reason: String,
}

/// Result of one curation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurationReport {
    /// Snapshots evaluated (skipped entries excluded)
    pub total: usize,
    pub kept: usize,
    pub archived: usize,
    /// `kept / total`, 0 when nothing was evaluated
    pub retention_rate: f64,
    pub dry_run: bool,
    /// Newest first
    pub decisions: Vec<SnapshotDecision>,
    pub skipped: Vec<SkippedEntry>,
}

impl CurationReport {
    pub fn to_archive(&self) -> impl Iterator<Item = &SnapshotDecision> {
        self.decisions.iter().filter(|d| !d.is_kept())
    }
}

struct Candidate<'a> {
    id: &'a str,
    at: DateTime<Utc>,
    snapshot: &'a Snapshot,
}

/// Applies a [`CurationPolicy`] to snapshot listings
#[derive(Debug, Clone, Default)]
pub struct CurationEngine {
    policy: CurationPolicy,
}

impl CurationEngine {
    pub fn new(policy: CurationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CurationPolicy {
        &self.policy
    }

    /// Decide keep/archive for each entry without touching any store
    ///
    /// `entries` must be in discovery order; it breaks timestamp ties.
    pub fn evaluate(&self, entries: &[SnapshotEntry], dry_run: bool) -> CurationReport {
        let mut candidates = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();

        for entry in entries {
            match self.resolve(entry) {
                Ok(candidate) => candidates.push(candidate),
                Err(reason) => {
                    debug!(id = %entry.id, reason = %reason, "Skipping snapshot");
                    skipped.push(SkippedEntry {
                        id: entry.id.clone(),
                        reason,
                    });
                }
            }
        }

        // Stable: equal timestamps keep discovery order
        candidates.sort_by(|a, b| b.at.cmp(&a.at));

        let decisions: Vec<SnapshotDecision> = candidates
            .iter()
            .enumerate()
            .map(|(rank, c)| {
                let reason = self.classify(rank, c, &candidates);
                SnapshotDecision {
                    id: c.id.to_string(),
                    timestamp: c.at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                    impact: c.snapshot.impact(),
                    completion: c.snapshot.completion(),
                    decision: reason.decision(),
                    reason,
                }
            })
            .collect();

        let total = decisions.len();
        let kept = decisions.iter().filter(|d| d.is_kept()).count();
        let retention_rate = if total == 0 {
            0.0
        } else {
            kept as f64 / total as f64
        };

        CurationReport {
            total,
            kept,
            archived: total - kept,
            retention_rate,
            dry_run,
            decisions,
            skipped,
        }
    }

    /// List the store's active snapshots, evaluate them and, unless
    /// `dry_run`, archive the losers
    #[instrument(skip(self, store))]
    pub async fn curate(
        &self,
        store: &dyn SnapshotStore,
        dry_run: bool,
    ) -> Result<CurationReport, StoreError> {
        let entries = store.list().await?;
        let report = self.evaluate(&entries, dry_run);

        if !dry_run {
            for decision in report.to_archive() {
                store.archive(&decision.id).await?;
            }
        }

        info!(
            total = report.total,
            kept = report.kept,
            archived = report.archived,
            skipped = report.skipped.len(),
            dry_run,
            "Curation complete"
        );
        Ok(report)
    }

    fn resolve<'a>(&self, entry: &'a SnapshotEntry) -> Result<Candidate<'a>, String> {
        let snapshot = entry
            .content
            .as_ref()
            .map_err(|e| format!("unreadable: {}", e))?;

        let raw = snapshot
            .timestamp
            .as_deref()
            .or_else(|| timestamp::from_file_name(&entry.id, &self.policy.file_prefix))
            .ok_or_else(|| "no timestamp".to_string())?;

        let at = timestamp::parse(raw).ok_or_else(|| format!("unparseable timestamp {:?}", raw))?;

        Ok(Candidate {
            id: &entry.id,
            at,
            snapshot,
        })
    }

    fn classify(&self, rank: usize, c: &Candidate<'_>, all: &[Candidate<'_>]) -> Reason {
        let p = &self.policy;
        let impact = c.snapshot.impact();
        let completion = c.snapshot.completion();

        if rank < p.recent_count {
            Reason::Recent
        } else if impact >= p.high_impact {
            Reason::HighImpact
        } else if completion >= p.milestone_completion && impact >= p.milestone_impact {
            Reason::Milestone
        } else if (p.resume_completion_min..=p.resume_completion_max).contains(&completion)
            && impact >= p.resume_impact
        {
            Reason::ResumePoint
        } else if self.is_best_in_window(c, all) {
            Reason::BestOfDay
        } else {
            Reason::Archive
        }
    }

    fn is_best_in_window(&self, c: &Candidate<'_>, all: &[Candidate<'_>]) -> bool {
        let half = self.policy.half_window();
        let best = all
            .iter()
            .filter(|other| {
                let gap = other.at.signed_duration_since(c.at);
                gap >= -half && gap <= half
            })
            .map(|other| OrderedFloat(other.snapshot.impact()))
            .max();

        // `c` is always inside its own window
        best.map_or(true, |best| OrderedFloat(c.snapshot.impact()) >= best)
    }
}
