//! Configuration loading for the `parallels` analyzer.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/parallels/config.toml` (system)
//! 2. `~/.config/parallels/config.toml` (user)
//! 3. `./parallels.toml` (local override, replaced by `--config`)
//! 4. Environment variables (`PARALLELS_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [output]
//! format = "json"
//! names = "sharp"
//! sort = "time"
//!
//! [telemetry]
//! log_level = "debug"
//! ```

pub mod loader;
pub mod output;

pub use loader::{discover_config_files_with_override, ConfigSources};
pub use output::{OutputConfig, OutputFormat, SortOrder, TelemetryConfig};

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value in environment variable {key}: {message}")]
    Env { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ParallelsConfig {
    pub output: OutputConfig,
    pub telemetry: TelemetryConfig,
}

impl ParallelsConfig {
    /// Load configuration and report which files and env vars contributed.
    ///
    /// `config_path` stands in for `./parallels.toml`.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = ParallelsConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            loader::apply_file(&mut config, &path)?;
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources, |key| std::env::var(key).ok())?;

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        let body = toml::to_string(self)?;
        Ok(format!("# parallels configuration\n\n{body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParallelsConfig::default();
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.output.names, voice_leading::NameStyle::Lilypond);
        assert_eq!(config.output.sort, SortOrder::Pair);
        assert_eq!(config.telemetry.log_level, "warn");
    }

    #[test]
    fn test_to_toml_round_trips_through_loader() {
        let mut config = ParallelsConfig::default();
        config.output.format = OutputFormat::Json;
        config.output.names = voice_leading::NameStyle::Sharp;
        config.telemetry.log_level = "debug".into();

        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[output]"));
        assert!(toml.contains("names = \"sharp\""));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parallels.toml");
        std::fs::write(&path, &toml).unwrap();

        let mut loaded = ParallelsConfig::default();
        loader::apply_file(&mut loaded, &path).unwrap();
        assert_eq!(loaded, config);
    }
}
