//! Lexical heuristic scorer
//!
//! A deterministic string-based proxy used when no better strategy is
//! injected. It reads only surface features of the summary (length, question
//! marks, hedging vocabulary, imperative verbs), so the numbers are coarse by
//! construction.

use episteme_common::{Dimension, ScoringError, VectorSet};

const HEDGE_WORDS: &[&str] = &[
    "maybe", "perhaps", "unclear", "unsure", "might", "possibly", "unknown", "guess", "somehow",
    "whatever", "todo", "tbd",
];

const ACTION_WORDS: &[&str] = &[
    "add", "create", "fix", "implement", "refactor", "remove", "rename", "update", "write",
    "edit", "run", "test",
];

const HIGH_STAKES_WORDS: &[&str] = &[
    "critical", "production", "security", "migration", "release", "deploy", "delete",
];

/// Deterministic surface-feature scorer
#[derive(Debug, Clone)]
pub struct HeuristicScorer {
    /// Word count at which a summary counts as fully grounded
    pub saturation_words: usize,
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self {
            saturation_words: 40,
        }
    }
}

impl HeuristicScorer {
    fn count_matches(tokens: &[&str], vocabulary: &[&str]) -> usize {
        tokens.iter().filter(|t| vocabulary.contains(t)).count()
    }
}

impl super::ScoringStrategy for HeuristicScorer {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn score(&self, summary: &str) -> Result<VectorSet, ScoringError> {
        let trimmed = summary.trim();
        if trimmed.is_empty() {
            return Err(ScoringError::EmptyInput);
        }

        let lowered = trimmed.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|t| !t.is_empty())
            .collect();

        let saturation = self.saturation_words.max(1) as f64;
        let coverage = (tokens.len() as f64 / saturation).min(1.0);
        let questions = trimmed.matches('?').count().min(3) as f64;
        let hedges = Self::count_matches(&tokens, HEDGE_WORDS).min(4) as f64;
        let actions = Self::count_matches(&tokens, ACTION_WORDS).min(3) as f64;
        let stakes = Self::count_matches(&tokens, HIGH_STAKES_WORDS).min(3) as f64;

        let uncertainty = 0.2 + 0.15 * questions + 0.1 * hedges;
        let know = 0.45 + 0.35 * coverage - 0.08 * hedges;
        let clarity = 0.55 + 0.1 * actions - 0.1 * hedges - 0.05 * questions;
        let context = 0.25 + 0.65 * coverage;

        Ok(VectorSet::new()
            .with(Dimension::Know, know)
            .with(Dimension::Uncertainty, uncertainty)
            .with(Dimension::Context, context)
            .with(Dimension::Clarity, clarity)
            .with(Dimension::Engagement, 0.5 + 0.1 * actions)
            .with(Dimension::Do, 0.4 + 0.15 * actions)
            .with(Dimension::Impact, 0.2 + 0.2 * stakes)
            .clamped())
    }
}
