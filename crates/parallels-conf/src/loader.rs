//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, OutputFormat, ParallelsConfig, SortOrder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use voice_leading::NameStyle;

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
/// Returns paths in load order (system, user, local/cli).
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/parallels/config.toml");
    if system.exists() {
        files.push(system);
    }

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("parallels/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    let local = PathBuf::from("parallels.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Overlay the values present in a TOML file onto `config`.
pub fn apply_file(config: &mut ParallelsConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    apply_toml(config, &contents, path)
}

/// What a single config file may set. Absent keys stay `None`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    output: FileOutput,
    telemetry: FileTelemetry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileOutput {
    format: Option<OutputFormat>,
    names: Option<NameStyle>,
    sort: Option<SortOrder>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileTelemetry {
    log_level: Option<String>,
}

/// Only keys present in `contents` are touched, so files layer.
fn apply_toml(config: &mut ParallelsConfig, contents: &str, path: &Path) -> Result<(), ConfigError> {
    let file: FileConfig = toml::from_str(contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(format) = file.output.format {
        config.output.format = format;
    }
    if let Some(names) = file.output.names {
        config.output.names = names;
    }
    if let Some(sort) = file.output.sort {
        config.output.sort = sort;
    }
    if let Some(log_level) = file.telemetry.log_level {
        config.telemetry.log_level = log_level;
    }

    Ok(())
}

fn parse_value<T: FromStr<Err = String>>(value: &str) -> Result<T, String> {
    value.parse()
}

/// Apply environment variable overrides to config.
///
/// `lookup` is `std::env::var` in production; tests pass a map.
pub fn apply_env_overrides<F>(
    config: &mut ParallelsConfig,
    sources: &mut ConfigSources,
    lookup: F,
) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env_err = |key: &str, message: String| ConfigError::Env {
        key: key.to_string(),
        message,
    };

    if let Some(v) = lookup("PARALLELS_FORMAT") {
        config.output.format = parse_value(&v).map_err(|m| env_err("PARALLELS_FORMAT", m))?;
        sources.env_overrides.push("PARALLELS_FORMAT".to_string());
    }
    if let Some(v) = lookup("PARALLELS_NAMES") {
        config.output.names = parse_value(&v).map_err(|m| env_err("PARALLELS_NAMES", m))?;
        sources.env_overrides.push("PARALLELS_NAMES".to_string());
    }
    if let Some(v) = lookup("PARALLELS_SORT") {
        config.output.sort = parse_value(&v).map_err(|m| env_err("PARALLELS_SORT", m))?;
        sources.env_overrides.push("PARALLELS_SORT".to_string());
    }

    if let Some(v) = lookup("PARALLELS_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("PARALLELS_LOG_LEVEL".to_string());
    }
    // Also support RUST_LOG
    if let Some(v) = lookup("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }

    Ok(())
}
