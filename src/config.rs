use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ai::EngineConfig;
use crate::error::ConfigError;
use crate::game::{DEFAULT_COLS, DEFAULT_ROWS};
use crate::session::SessionConfig;

/// Board dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub cols: usize,
    pub rows: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub engine: EngineConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.cols == 0 || self.board.rows == 0 {
            return Err(ConfigError::Validation(
                "board.cols and board.rows must be > 0".into(),
            ));
        }

        let engine = &self.engine;
        let longest_line = self.board.cols.max(self.board.rows);
        if engine.run_length < 2 || engine.run_length > longest_line {
            return Err(ConfigError::Validation(format!(
                "engine.run_length must be in [2, {longest_line}]"
            )));
        }
        if !(0.0..=1.0).contains(&engine.monte_carlo_threshold) {
            return Err(ConfigError::Validation(
                "engine.monte_carlo_threshold must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&engine.exhaustive_threshold) {
            return Err(ConfigError::Validation(
                "engine.exhaustive_threshold must be in [0, 1]".into(),
            ));
        }
        if engine.exhaustive_threshold > engine.monte_carlo_threshold {
            return Err(ConfigError::Validation(
                "engine.exhaustive_threshold must be <= engine.monte_carlo_threshold".into(),
            ));
        }
        if engine.coarse_trials == 0 {
            return Err(ConfigError::Validation(
                "engine.coarse_trials must be >= 1".into(),
            ));
        }
        if engine.fine_trials == 0 {
            return Err(ConfigError::Validation(
                "engine.fine_trials must be >= 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Player;
    use crate::session::Controller;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[engine]
coarse_trials = 50
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.coarse_trials, 50);
        // Other fields should be defaults
        assert_eq!(config.engine.fine_trials, 1000);
        assert!((config.engine.monte_carlo_threshold - 0.80).abs() < 1e-9);
        assert_eq!(config.board.cols, 7);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        let default = AppConfig::default();
        assert_eq!(config.engine.move_time_ms, default.engine.move_time_ms);
        assert_eq!(config.session.first_player, Player::First);
        assert_eq!(config.session.second_controller, Controller::Computer);
    }

    #[test]
    fn test_session_section_parses_enums() {
        let toml_str = r#"
[session]
first_player = "second"
first_controller = "computer"
seed = 42
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.first_player, Player::Second);
        assert_eq!(config.session.first_controller, Controller::Computer);
        assert_eq!(config.session.seed, Some(42));
    }

    #[test]
    fn test_validation_rejects_zero_dimensions() {
        let mut config = AppConfig::default();
        config.board.rows = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_run_length() {
        let mut config = AppConfig::default();
        config.engine.run_length = 1;
        assert!(config.validate().is_err());
        config.engine.run_length = 8;
        assert!(config.validate().is_err());
        config.engine.run_length = 7;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_threshold_out_of_range() {
        let mut config = AppConfig::default();
        config.engine.monte_carlo_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.engine.exhaustive_threshold = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_inverted_thresholds() {
        let mut config = AppConfig::default();
        config.engine.monte_carlo_threshold = 0.5;
        config.engine.exhaustive_threshold = 0.6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_trials() {
        let mut config = AppConfig::default();
        config.engine.coarse_trials = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.engine.fine_trials = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.engine.coarse_trials, 500);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[board]
cols = 9
rows = 7

[engine]
move_time_ms = 250
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.board.cols, 9);
        assert_eq!(config.engine.move_time_ms, 250);
        // Others are defaults
        assert_eq!(config.engine.exhaustive_deadline_ms, 15_000);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[engine]\nfine_trials = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
    }
}
