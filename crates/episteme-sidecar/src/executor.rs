//! Mode executors
//!
//! A mode executor performs the mode-specific side effects chosen by the
//! router and may return guidance text for the caller. Its result is
//! advisory: the pipeline ignores failures and simply omits the guidance.

use async_trait::async_trait;
use episteme_common::Mode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from mode executors
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Executor failed: {0}")]
    Failed(String),

    #[error("Executor timed out after {0}ms")]
    Timeout(u64),
}

/// What an executor hands back to the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeGuidance {
    /// Text prepended to the enriched response
    pub guidance: Option<String>,
    /// Anything else the executor wants to report
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl ModeGuidance {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn text(guidance: impl Into<String>) -> Self {
        Self {
            guidance: Some(guidance.into()),
            metadata: serde_json::Value::Null,
        }
    }
}

/// Trait for mode-specific side effects
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModeExecutor: Send + Sync {
    async fn execute(
        &self,
        mode: Mode,
        session_id: &str,
        operation_name: &str,
    ) -> Result<ModeGuidance, ExecutorError>;
}

/// Executor that does nothing and offers no guidance
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExecutor;

#[async_trait]
impl ModeExecutor for NoopExecutor {
    async fn execute(
        &self,
        _mode: Mode,
        _session_id: &str,
        _operation_name: &str,
    ) -> Result<ModeGuidance, ExecutorError> {
        Ok(ModeGuidance::none())
    }
}

/// Executor returning fixed per-mode guidance
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticGuidanceExecutor;

impl StaticGuidanceExecutor {
    pub fn guidance_for(mode: Mode) -> Option<&'static str> {
        match mode {
            Mode::LoadContext => Some(
                "Context is thin. Load the relevant files, history, and constraints before acting.",
            ),
            Mode::Investigate => {
                Some("Knowledge is low. Investigate and gather evidence before changing anything.")
            }
            Mode::Clarify => Some(
                "Uncertainty is high. Surface the open questions and confirm intent before proceeding.",
            ),
            Mode::CautiousImplementation => {
                Some("Proceed in small steps and verify each one.")
            }
            Mode::ConfidentImplementation => None,
            Mode::Unknown => None,
        }
    }
}

#[async_trait]
impl ModeExecutor for StaticGuidanceExecutor {
    async fn execute(
        &self,
        mode: Mode,
        _session_id: &str,
        _operation_name: &str,
    ) -> Result<ModeGuidance, ExecutorError> {
        Ok(match Self::guidance_for(mode) {
            Some(text) => ModeGuidance::text(text),
            None => ModeGuidance::none(),
        })
    }
}
