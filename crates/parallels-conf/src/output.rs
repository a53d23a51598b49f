//! Output and telemetry settings.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use voice_leading::NameStyle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One line per finding.
    #[default]
    Text,
    /// One JSON report per file.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}' (expected text or json)")),
        }
    }
}

/// Order in which findings are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Track pair first, then tick.
    #[default]
    Pair,
    /// Tick first, then track pair.
    Time,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pair" => Ok(Self::Pair),
            "time" => Ok(Self::Time),
            other => Err(format!("unknown sort order '{other}' (expected pair or time)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Pitch-class spelling in text output.
    pub names: NameStyle,

    pub sort: SortOrder,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    /// Default: "warn"
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}
