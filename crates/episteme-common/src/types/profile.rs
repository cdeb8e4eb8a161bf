//! Threshold profiles ("personalities") consumed by the mode router
//!
//! A profile is a named set of per-dimension cutoffs. The router never
//! loads profiles itself; a middleware instance resolves one by name from a
//! [`ProfileRegistry`] at construction and keeps it for its whole lifetime.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ProfileError;
use crate::DEFAULT_PROFILE;

/// Per-dimension cutoffs used by the router
///
/// Missing fields in a profile file fall back to the `balanced` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdProfile {
    pub name: String,
    /// Below this, grounding is missing
    pub context_low: f64,
    /// Above this, ambiguity must be surfaced
    pub uncertainty_high: f64,
    /// Below this, investigate before acting
    pub know_low: f64,
    /// Below this, act cautiously
    pub clarity_low: f64,
    /// At or above this (with `clarity_high`), act confidently
    pub know_high: f64,
    /// At or above this (with `know_high`), act confidently
    pub clarity_high: f64,
}

impl Default for ThresholdProfile {
    fn default() -> Self {
        Self::balanced()
    }
}

impl ThresholdProfile {
    pub fn balanced() -> Self {
        Self {
            name: "balanced".to_string(),
            context_low: 0.3,
            uncertainty_high: 0.6,
            know_low: 0.4,
            clarity_low: 0.5,
            know_high: 0.7,
            clarity_high: 0.7,
        }
    }

    pub fn cautious() -> Self {
        Self {
            name: "cautious".to_string(),
            context_low: 0.4,
            uncertainty_high: 0.5,
            know_low: 0.5,
            clarity_low: 0.6,
            know_high: 0.8,
            clarity_high: 0.8,
        }
    }

    pub fn autonomous() -> Self {
        Self {
            name: "autonomous".to_string(),
            context_low: 0.2,
            uncertainty_high: 0.75,
            know_low: 0.3,
            clarity_low: 0.4,
            know_high: 0.6,
            clarity_high: 0.6,
        }
    }

    pub fn researcher() -> Self {
        Self {
            name: "researcher".to_string(),
            context_low: 0.35,
            uncertainty_high: 0.55,
            know_low: 0.55,
            clarity_low: 0.5,
            know_high: 0.85,
            clarity_high: 0.75,
        }
    }

    fn cutoffs(&self) -> [(&'static str, f64); 6] {
        [
            ("context_low", self.context_low),
            ("uncertainty_high", self.uncertainty_high),
            ("know_low", self.know_low),
            ("clarity_low", self.clarity_low),
            ("know_high", self.know_high),
            ("clarity_high", self.clarity_high),
        ]
    }

    /// Check that every cutoff is a finite value in [0, 1] and low <= high
    pub fn validate(&self) -> Result<(), ProfileError> {
        for (field, value) in self.cutoffs() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ProfileError::Invalid {
                    name: self.name.clone(),
                    reason: format!("{} = {} is outside [0, 1]", field, value),
                });
            }
        }
        if self.know_low > self.know_high {
            return Err(ProfileError::Invalid {
                name: self.name.clone(),
                reason: "know_low exceeds know_high".to_string(),
            });
        }
        if self.clarity_low > self.clarity_high {
            return Err(ProfileError::Invalid {
                name: self.name.clone(),
                reason: "clarity_low exceeds clarity_high".to_string(),
            });
        }
        Ok(())
    }
}

/// On-disk layout of a profiles file
#[derive(Debug, Default, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    profiles: BTreeMap<String, ThresholdProfile>,
}

/// Named threshold profiles, built-ins first, file entries layered on top
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, ThresholdProfile>,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileRegistry {
    /// Registry holding only the built-in profiles
    pub fn builtin() -> Self {
        let profiles = [
            ThresholdProfile::balanced(),
            ThresholdProfile::cautious(),
            ThresholdProfile::autonomous(),
            ThresholdProfile::researcher(),
        ]
        .into_iter()
        .map(|p| (p.name.clone(), p))
        .collect();
        Self { profiles }
    }

    /// Built-ins plus the profiles defined in `path` (TOML, JSON or YAML)
    ///
    /// A file profile with the same name as a built-in replaces it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let file: ProfileFile = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .build()?
            .try_deserialize()?;

        let mut registry = Self::builtin();
        for (name, mut profile) in file.profiles {
            profile.name = name.to_lowercase();
            registry.insert(profile)?;
        }
        info!(path = %path.display(), count = registry.len(), "Loaded threshold profiles");
        Ok(registry)
    }

    /// Add or replace a profile after validating it
    pub fn insert(&mut self, profile: ThresholdProfile) -> Result<(), ProfileError> {
        profile.validate()?;
        debug!(name = %profile.name, "Registered threshold profile");
        self.profiles.insert(profile.name.to_lowercase(), profile);
        Ok(())
    }

    /// Look up a profile by name (case-insensitive)
    pub fn get(&self, name: &str) -> Result<&ThresholdProfile, ProfileError> {
        self.profiles
            .get(&name.to_lowercase())
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))
    }

    /// The profile used when nothing else is configured
    pub fn default_profile(&self) -> Result<&ThresholdProfile, ProfileError> {
        self.get(DEFAULT_PROFILE)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
