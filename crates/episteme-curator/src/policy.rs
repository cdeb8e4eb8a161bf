//! Retention policy

use serde::{Deserialize, Serialize};

/// Thresholds and layout used by the curation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationPolicy {
    /// The N most recent snapshots are always kept
    pub recent_count: usize,
    /// Width of the best-of-window scan, centered on each snapshot
    pub window_hours: f64,
    pub high_impact: f64,
    pub milestone_completion: f64,
    pub milestone_impact: f64,
    pub resume_completion_min: f64,
    pub resume_completion_max: f64,
    pub resume_impact: f64,
    /// Subdirectory archived snapshots are moved into
    pub archive_dir: String,
    /// File name prefix identifying snapshot files
    pub file_prefix: String,
}

impl Default for CurationPolicy {
    fn default() -> Self {
        Self {
            recent_count: 5,
            window_hours: 24.0,
            high_impact: 0.7,
            milestone_completion: 0.9,
            milestone_impact: 0.5,
            resume_completion_min: 0.3,
            resume_completion_max: 0.7,
            resume_impact: 0.6,
            archive_dir: "archive".to_string(),
            file_prefix: "snapshot_".to_string(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl CurationPolicy {
    /// Defaults overridden by `EPISTEME_CURATE_*` environment variables
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let mut policy = Self::default();
        if let Some(v) = env_parse("EPISTEME_CURATE_RECENT_COUNT") {
            policy.recent_count = v;
        }
        if let Some(v) = env_parse("EPISTEME_CURATE_WINDOW_HOURS") {
            policy.window_hours = v;
        }
        if let Some(v) = env_parse("EPISTEME_CURATE_HIGH_IMPACT") {
            policy.high_impact = v;
        }
        if let Some(v) = env_parse("EPISTEME_CURATE_MILESTONE_COMPLETION") {
            policy.milestone_completion = v;
        }
        if let Some(v) = env_parse("EPISTEME_CURATE_MILESTONE_IMPACT") {
            policy.milestone_impact = v;
        }
        if let Some(v) = env_parse("EPISTEME_CURATE_RESUME_IMPACT") {
            policy.resume_impact = v;
        }
        if let Ok(v) = std::env::var("EPISTEME_CURATE_ARCHIVE_DIR") {
            policy.archive_dir = v;
        }
        if let Ok(v) = std::env::var("EPISTEME_CURATE_FILE_PREFIX") {
            policy.file_prefix = v;
        }
        policy
    }

    pub fn with_recent_count(mut self, recent_count: usize) -> Self {
        self.recent_count = recent_count;
        self
    }

    pub fn with_window_hours(mut self, window_hours: f64) -> Self {
        self.window_hours = window_hours;
        self
    }

    /// Half the window, in milliseconds; negative or NaN widths collapse to zero
    pub(crate) fn half_window(&self) -> chrono::Duration {
        let half_ms = self.window_hours * 3_600_000.0 / 2.0;
        if half_ms.is_nan() || half_ms <= 0.0 {
            return chrono::Duration::zero();
        }
        chrono::Duration::milliseconds(half_ms.min(i64::MAX as f64 / 2.0) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = CurationPolicy::default();
        assert_eq!(policy.recent_count, 5);
        assert_eq!(policy.window_hours, 24.0);
        assert_eq!(policy.half_window(), chrono::Duration::hours(12));
        assert_eq!(policy.archive_dir, "archive");
    }

    #[test]
    fn test_degenerate_window() {
        let policy = CurationPolicy::default().with_window_hours(-3.0);
        assert_eq!(policy.half_window(), chrono::Duration::zero());
        let policy = CurationPolicy::default().with_window_hours(f64::NAN);
        assert_eq!(policy.half_window(), chrono::Duration::zero());
    }
}
