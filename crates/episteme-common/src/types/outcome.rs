//! Action outcome fed into the vector updater

use serde::{Deserialize, Serialize};

/// Result of an action, as seen by the updater
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    /// Opaque payload of the action (output, or error details on failure)
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ActionOutcome {
    pub fn success(data: impl Into<serde_json::Value>) -> Self {
        Self {
            success: true,
            data: data.into(),
        }
    }

    pub fn failure(data: impl Into<serde_json::Value>) -> Self {
        Self {
            success: false,
            data: data.into(),
        }
    }
}
