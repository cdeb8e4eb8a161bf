//! VectorSet - the epistemic belief state about an in-progress task
//!
//! A VectorSet is a closed collection of named scores, each nominally in
//! [0.0, 1.0]. It is the shared currency of the whole system:
//! - the assessor produces one per incoming call
//! - the router reads it to pick a mode
//! - the updater derives a new one from an action outcome
//! - snapshots persist it for later curation
//!
//! Values may transiently leave the unit range (for example while a policy
//! is adding a step); every consumer clamps before interpreting them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ABSENT_PROGRESS_SCORE, NEUTRAL_SCORE};

/// A single named dimension of a [`VectorSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Know,
    Do,
    Context,
    Clarity,
    Coherence,
    Signal,
    Density,
    State,
    Change,
    Completion,
    Impact,
    Engagement,
    Uncertainty,
}

impl Dimension {
    /// Every dimension, in canonical order
    pub const ALL: [Dimension; 13] = [
        Dimension::Know,
        Dimension::Do,
        Dimension::Context,
        Dimension::Clarity,
        Dimension::Coherence,
        Dimension::Signal,
        Dimension::Density,
        Dimension::State,
        Dimension::Change,
        Dimension::Completion,
        Dimension::Impact,
        Dimension::Engagement,
        Dimension::Uncertainty,
    ];

    /// Wire name of the dimension
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Know => "know",
            Dimension::Do => "do",
            Dimension::Context => "context",
            Dimension::Clarity => "clarity",
            Dimension::Coherence => "coherence",
            Dimension::Signal => "signal",
            Dimension::Density => "density",
            Dimension::State => "state",
            Dimension::Change => "change",
            Dimension::Completion => "completion",
            Dimension::Impact => "impact",
            Dimension::Engagement => "engagement",
            Dimension::Uncertainty => "uncertainty",
        }
    }

    /// Value used when the dimension is absent from an input
    ///
    /// Progress-type dimensions start from zero; everything else is neutral.
    pub fn default_value(&self) -> f64 {
        match self {
            Dimension::Completion | Dimension::Impact => ABSENT_PROGRESS_SCORE,
            _ => NEUTRAL_SCORE,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown dimension: {}", s))
    }
}

fn neutral() -> f64 {
    NEUTRAL_SCORE
}

fn absent_progress() -> f64 {
    ABSENT_PROGRESS_SCORE
}

/// Clamp a raw score into [0, 1]
///
/// NaN has no meaningful position in the range and falls back to `fallback`.
pub fn clamp_score(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Complete epistemic state: every dimension is always present
///
/// Missing keys on deserialization take the dimension default (0.5, or 0.0
/// for `completion`/`impact`). Unknown keys are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorSet {
    #[serde(default = "neutral")]
    pub know: f64,
    #[serde(rename = "do", default = "neutral")]
    pub do_: f64,
    #[serde(default = "neutral")]
    pub context: f64,
    #[serde(default = "neutral")]
    pub clarity: f64,
    #[serde(default = "neutral")]
    pub coherence: f64,
    #[serde(default = "neutral")]
    pub signal: f64,
    #[serde(default = "neutral")]
    pub density: f64,
    #[serde(default = "neutral")]
    pub state: f64,
    #[serde(default = "neutral")]
    pub change: f64,
    #[serde(default = "absent_progress")]
    pub completion: f64,
    #[serde(default = "absent_progress")]
    pub impact: f64,
    #[serde(default = "neutral")]
    pub engagement: f64,
    #[serde(default = "neutral")]
    pub uncertainty: f64,
}

impl Default for VectorSet {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorSet {
    /// Create a VectorSet with every dimension at its default
    pub fn new() -> Self {
        Self {
            know: NEUTRAL_SCORE,
            do_: NEUTRAL_SCORE,
            context: NEUTRAL_SCORE,
            clarity: NEUTRAL_SCORE,
            coherence: NEUTRAL_SCORE,
            signal: NEUTRAL_SCORE,
            density: NEUTRAL_SCORE,
            state: NEUTRAL_SCORE,
            change: NEUTRAL_SCORE,
            completion: ABSENT_PROGRESS_SCORE,
            impact: ABSENT_PROGRESS_SCORE,
            engagement: NEUTRAL_SCORE,
            uncertainty: NEUTRAL_SCORE,
        }
    }

    /// The fail-closed state: nothing is known, everything is ambiguous
    pub fn maximally_uncertain() -> Self {
        let mut vectors = Self::new();
        for dim in Dimension::ALL {
            vectors.set(dim, NEUTRAL_SCORE);
        }
        vectors.uncertainty = 1.0;
        vectors
    }

    /// Read a single dimension
    pub fn get(&self, dim: Dimension) -> f64 {
        match dim {
            Dimension::Know => self.know,
            Dimension::Do => self.do_,
            Dimension::Context => self.context,
            Dimension::Clarity => self.clarity,
            Dimension::Coherence => self.coherence,
            Dimension::Signal => self.signal,
            Dimension::Density => self.density,
            Dimension::State => self.state,
            Dimension::Change => self.change,
            Dimension::Completion => self.completion,
            Dimension::Impact => self.impact,
            Dimension::Engagement => self.engagement,
            Dimension::Uncertainty => self.uncertainty,
        }
    }

    fn set(&mut self, dim: Dimension, value: f64) {
        let slot = match dim {
            Dimension::Know => &mut self.know,
            Dimension::Do => &mut self.do_,
            Dimension::Context => &mut self.context,
            Dimension::Clarity => &mut self.clarity,
            Dimension::Coherence => &mut self.coherence,
            Dimension::Signal => &mut self.signal,
            Dimension::Density => &mut self.density,
            Dimension::State => &mut self.state,
            Dimension::Change => &mut self.change,
            Dimension::Completion => &mut self.completion,
            Dimension::Impact => &mut self.impact,
            Dimension::Engagement => &mut self.engagement,
            Dimension::Uncertainty => &mut self.uncertainty,
        };
        *slot = value;
    }

    /// Return a copy with one dimension replaced (unclamped)
    #[must_use]
    pub fn with(mut self, dim: Dimension, value: f64) -> Self {
        self.set(dim, value);
        self
    }

    /// Return a copy with every dimension clamped to [0, 1]
    #[must_use]
    pub fn clamped(mut self) -> Self {
        for dim in Dimension::ALL {
            let value = clamp_score(self.get(dim), dim.default_value());
            self.set(dim, value);
        }
        self
    }

    /// True when every value is a finite number
    pub fn is_well_formed(&self) -> bool {
        self.iter().all(|(_, v)| v.is_finite())
    }

    /// True when every value lies in [0, 1]
    pub fn is_within_bounds(&self) -> bool {
        self.iter().all(|(_, v)| (0.0..=1.0).contains(&v))
    }

    /// Iterate `(dimension, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.iter().map(move |d| (*d, self.get(*d)))
    }
}

impl fmt::Display for VectorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VectorSet(know={:.2}, uncertainty={:.2}, context={:.2}, clarity={:.2}, completion={:.2}, impact={:.2})",
            self.know, self.uncertainty, self.context, self.clarity, self.completion, self.impact
        )
    }
}
