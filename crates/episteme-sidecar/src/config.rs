//! Pipeline configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use episteme_common::{EpistemeError, Result, DEFAULT_LEARNING_RATE, DEFAULT_PROFILE};

/// Middleware pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// When false the pipeline is a pass-through; fixed for an instance's lifetime
    pub enabled: bool,
    /// Session identifier handed to the mode executor
    pub session_id: String,
    /// Threshold profile name
    pub profile: String,
    /// Optional profiles file layered over the built-ins
    pub profiles_path: Option<PathBuf>,
    /// Updater step size
    pub learning_rate: f64,
    /// Cap on the argument dump fed to the assessor
    pub summary_max_chars: usize,
    /// Write a snapshot every N calls (0 disables)
    pub snapshot_every: u64,
    /// Advisory timeout for the mode executor; the wrapped operation is never timed out
    pub executor_timeout_ms: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            session_id: uuid::Uuid::now_v7().to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            profiles_path: None,
            learning_rate: DEFAULT_LEARNING_RATE,
            summary_max_chars: crate::DEFAULT_SUMMARY_MAX_CHARS,
            snapshot_every: 0,
            executor_timeout_ms: None,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| EpistemeError::Config(format!("{} has invalid value {:?}", key, value)))
}

impl PipelineConfig {
    /// Load configuration from `.env` and `EPISTEME_*` environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();

        if let Ok(val) = std::env::var("EPISTEME_ENABLED") {
            if let Some(enabled) = parse_flag(&val) {
                cfg.enabled = enabled;
            }
        }
        if let Ok(val) = std::env::var("EPISTEME_SESSION_ID") {
            if !val.trim().is_empty() {
                cfg.session_id = val;
            }
        }
        if let Ok(val) = std::env::var("EPISTEME_PROFILE") {
            cfg.profile = val;
        }
        if let Ok(val) = std::env::var("EPISTEME_PROFILES_PATH") {
            cfg.profiles_path = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("EPISTEME_LEARNING_RATE") {
            cfg.learning_rate = parse_var("EPISTEME_LEARNING_RATE", &val)?;
        }
        if let Ok(val) = std::env::var("EPISTEME_SUMMARY_MAX_CHARS") {
            cfg.summary_max_chars = parse_var("EPISTEME_SUMMARY_MAX_CHARS", &val)?;
        }
        if let Ok(val) = std::env::var("EPISTEME_SNAPSHOT_EVERY") {
            cfg.snapshot_every = parse_var("EPISTEME_SNAPSHOT_EVERY", &val)?;
        }
        if let Ok(val) = std::env::var("EPISTEME_EXECUTOR_TIMEOUT_MS") {
            cfg.executor_timeout_ms = Some(parse_var("EPISTEME_EXECUTOR_TIMEOUT_MS", &val)?);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || !(0.0..=1.0).contains(&self.learning_rate) {
            return Err(EpistemeError::Config(format!(
                "learning_rate must be in [0, 1], got {}",
                self.learning_rate
            )));
        }
        if self.summary_max_chars == 0 {
            return Err(EpistemeError::Config(
                "summary_max_chars must be positive".to_string(),
            ));
        }
        if self.session_id.trim().is_empty() {
            return Err(EpistemeError::Config("session_id is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = PipelineConfig::default();
        assert!(config.enabled);
        assert_eq!(config.profile, "balanced");
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.snapshot_every, 0);
        assert!(!config.session_id.is_empty());
    }

    #[test]
    fn test_sessions_are_distinct() {
        assert_ne!(
            PipelineConfig::default().session_id,
            PipelineConfig::default().session_id
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = PipelineConfig {
            learning_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EpistemeError::Config(_))));

        let config = PipelineConfig {
            summary_max_chars: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EpistemeError::Config(_))));

        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_var() {
        let rate: f64 = parse_var("EPISTEME_LEARNING_RATE", " 0.25 ").unwrap();
        assert_eq!(rate, 0.25);
        let err = parse_var::<u64>("EPISTEME_SNAPSHOT_EVERY", "often").unwrap_err();
        assert!(err.to_string().contains("EPISTEME_SNAPSHOT_EVERY"));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("sometimes"), None);
    }
}
