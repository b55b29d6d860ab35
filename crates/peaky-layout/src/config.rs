//! Engine configuration: size constraints, snap tuning, and history depth.
//!
//! Every field has a default, so a partial document only overrides what it
//! names:
//!
//! ```toml
//! history_limit = 50
//!
//! [constraints]
//! min_width = 80
//!
//! [snap]
//! threshold = 8
//! ratios = [50]
//! ```
//!
//! ```rust
//! use peaky_layout::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str("history_limit = 50").unwrap();
//! assert_eq!(config.history_limit, 50);
//! assert_eq!(config.constraints.min_width, 50);
//! assert!(config.validate().is_empty());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Axis, LAYOUT_BASE_SIZE};
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::snap::SnapConfig;

/// Minimum pane dimensions in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_width: 50,
            min_height: 50,
        }
    }
}

impl Constraints {
    #[must_use]
    pub const fn new(min_width: u32, min_height: u32) -> Self {
        Self {
            min_width,
            min_height,
        }
    }

    /// Minimum span along `axis`, never below 1.
    #[must_use]
    pub fn min_for(self, axis: Axis) -> u32 {
        let raw = match axis {
            Axis::Horizontal => self.min_width,
            Axis::Vertical => self.min_height,
        };
        raw.max(1)
    }
}

/// Everything an [`Engine`](crate::Engine) needs besides its tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub constraints: Constraints,
    pub snap: SnapConfig,
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            constraints: Constraints::default(),
            snap: SnapConfig::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Errors from loading an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a `.json` or TOML file and reject out-of-range values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&std::fs::read_to_string(path)?)?
        } else {
            Self::from_toml_file(path)?
        };
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        tracing::debug!(path = %path.display(), "loaded layout engine config");
        Ok(config)
    }

    /// Check all parameters. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let half = LAYOUT_BASE_SIZE / 2;

        for (name, value) in [
            ("constraints.min_width", self.constraints.min_width),
            ("constraints.min_height", self.constraints.min_height),
        ] {
            if value == 0 || value > half {
                errors.push(format!("{name} must be in 1..={half}, got {value}"));
            }
        }

        if self.snap.threshold > LAYOUT_BASE_SIZE {
            errors.push(format!(
                "snap.threshold must be <= {LAYOUT_BASE_SIZE}, got {}",
                self.snap.threshold
            ));
        }
        if self.snap.hysteresis > LAYOUT_BASE_SIZE {
            errors.push(format!(
                "snap.hysteresis must be <= {LAYOUT_BASE_SIZE}, got {}",
                self.snap.hysteresis
            ));
        }
        if self.snap.grid_step > LAYOUT_BASE_SIZE {
            errors.push(format!(
                "snap.grid_step must be <= {LAYOUT_BASE_SIZE}, got {}",
                self.snap.grid_step
            ));
        }
        for ratio in &self.snap.ratios {
            if !(1..=99).contains(ratio) {
                errors.push(format!("snap.ratios entries must be in 1..=99, got {ratio}"));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.history_limit, 200);
        assert_eq!(config.snap.ratios, vec![50, 33, 67, 25, 75]);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [constraints]
            min_width = 80

            [snap]
            threshold = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.constraints, Constraints::new(80, 50));
        assert_eq!(config.snap.threshold, 8);
        assert_eq!(config.snap.hysteresis, 6);
        assert_eq!(config.history_limit, 200);
    }

    #[test]
    fn json_round_trip() {
        let config = EngineConfig {
            history_limit: 7,
            ..EngineConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn malformed_toml_is_reported() {
        let err = EngineConfig::from_toml_str("history_limit = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn validate_flags_out_of_range_values() {
        let config = EngineConfig {
            constraints: Constraints::new(0, 700),
            snap: SnapConfig {
                ratios: vec![0, 50, 100],
                ..SnapConfig::default()
            },
            history_limit: 10,
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors[0].starts_with("constraints.min_width"));
        assert!(errors[1].starts_with("constraints.min_height"));
    }

    #[test]
    fn load_rejects_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[constraints]\nmin_height = 0").unwrap();
        let err = EngineConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errs) if errs.len() == 1));
    }

    #[test]
    fn load_reads_json_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"history_limit": 3}}"#).unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.history_limit, 3);
    }

    #[test]
    fn min_for_never_returns_zero() {
        let constraints = Constraints::new(0, 30);
        assert_eq!(constraints.min_for(Axis::Horizontal), 1);
        assert_eq!(constraints.min_for(Axis::Vertical), 30);
    }
}
