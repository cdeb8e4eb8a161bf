//! Routing modes and the router's decision record

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Discrete behavioral mode chosen by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Grounding is missing; gather context before anything else
    LoadContext,
    /// Knowledge is too thin to act on
    Investigate,
    /// Knowledge and clarity both clear the high bar
    ConfidentImplementation,
    /// Act, but verify as you go
    CautiousImplementation,
    /// Ambiguity must be surfaced before acting
    Clarify,
    /// Terminal fallback when no decision could be made
    Unknown,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::LoadContext,
        Mode::Investigate,
        Mode::ConfidentImplementation,
        Mode::CautiousImplementation,
        Mode::Clarify,
        Mode::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::LoadContext => "load_context",
            Mode::Investigate => "investigate",
            Mode::ConfidentImplementation => "confident_implementation",
            Mode::CautiousImplementation => "cautious_implementation",
            Mode::Clarify => "clarify",
            Mode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown mode: {}", s))
    }
}

/// Router output; computed fresh per call and never persisted by the router
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub mode: Mode,
    /// Normalized margin of the winning rule, in [0, 1]
    pub confidence: f64,
    /// Rule name plus the vector values it looked at
    pub reasoning: String,
}

impl RoutingDecision {
    pub fn new(mode: Mode, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            mode,
            confidence: if confidence.is_nan() {
                0.0
            } else {
                confidence.clamp(0.0, 1.0)
            },
            reasoning: reasoning.into(),
        }
    }

    /// The terminal "no decision" outcome
    pub fn unknown(reasoning: impl Into<String>) -> Self {
        Self::new(Mode::Unknown, 0.0, reasoning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_wire_names() {
        for mode in Mode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(RoutingDecision::new(Mode::Clarify, 3.0, "x").confidence, 1.0);
        assert_eq!(RoutingDecision::new(Mode::Clarify, f64::NAN, "x").confidence, 0.0);
    }
}
