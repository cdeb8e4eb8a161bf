//! Snapshot - a persisted, timestamped copy of a vector set
//!
//! Snapshots are append-only artifacts. The curation engine reads and
//! relocates them but never rewrites their vector values.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::vector_set::VectorSet;

/// A point-in-time vector set plus an opaque payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// ISO-8601-like timestamp; the time-of-day may use `-` instead of `:`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Vector values at capture time; absent keys take the usual defaults
    #[serde(default)]
    pub vectors: VectorSet,

    /// Caller-defined content, carried unchanged
    #[serde(default)]
    pub payload: serde_json::Value,

    /// Unrecognised top-level fields, preserved for round-tripping
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Snapshot {
    /// Snapshot of `vectors` taken at `at`
    pub fn new(at: DateTime<Utc>, vectors: VectorSet, payload: serde_json::Value) -> Self {
        Self {
            timestamp: Some(at.to_rfc3339_opts(SecondsFormat::Micros, true)),
            vectors,
            payload,
            extra: serde_json::Map::new(),
        }
    }

    /// Snapshot of `vectors` taken now
    pub fn capture(vectors: VectorSet, payload: serde_json::Value) -> Self {
        Self::new(Utc::now(), vectors, payload)
    }

    pub fn impact(&self) -> f64 {
        self.vectors.impact
    }

    pub fn completion(&self) -> f64 {
        self.vectors.completion
    }
}
