//! Pipeline responses

use episteme_common::{RoutingDecision, VectorSet};
use serde::{Deserialize, Serialize};

use crate::operation::{Content, OperationResult};

/// Structured block appended to every enriched response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpistemicReport {
    pub call_number: u64,
    pub session_id: String,
    pub operation: String,
    /// Vectors that drove the routing decision (before this call's outcome was folded in)
    pub vectors: VectorSet,
    pub routing: RoutingDecision,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Output of an enabled pipeline call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedResponse {
    /// Guidance (if any), then the wrapped output or failure entry, then the report
    pub content: Vec<Content>,
    /// Mode guidance, also present as the first content block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
    pub report: EpistemicReport,
}

impl EnrichedResponse {
    pub fn is_success(&self) -> bool {
        self.report.success
    }

    /// Guidance text, when the executor supplied one
    pub fn guidance(&self) -> Option<&str> {
        self.guidance.as_deref()
    }

    /// Content blocks produced by the wrapped operation (or its failure entry)
    pub fn output(&self) -> &[Content] {
        let start = usize::from(self.guidance.is_some());
        let end = self.content.len().saturating_sub(1).max(start);
        self.content.get(start..end).unwrap_or(&[])
    }
}

/// What [`EpistemicMiddleware::handle`](super::EpistemicMiddleware::handle) returns
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineResponse {
    /// Disabled instance: the wrapped result, untouched
    Bypassed(OperationResult),
    Enriched(EnrichedResponse),
}

impl PipelineResponse {
    pub fn is_bypassed(&self) -> bool {
        matches!(self, PipelineResponse::Bypassed(_))
    }

    pub fn report(&self) -> Option<&EpistemicReport> {
        match self {
            PipelineResponse::Enriched(enriched) => Some(&enriched.report),
            PipelineResponse::Bypassed(_) => None,
        }
    }

    pub fn into_enriched(self) -> Option<EnrichedResponse> {
        match self {
            PipelineResponse::Enriched(enriched) => Some(enriched),
            PipelineResponse::Bypassed(_) => None,
        }
    }
}
