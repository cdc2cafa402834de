//! Trellis configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use trellis_layout::LayoutConfig;

/// Top-level configuration (trellis.toml)
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub layout: LayoutSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Flexbox layout settings
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct LayoutSection {
    /// Global layout switch; when off, views keep the bounds they are given
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Row direction by default, as on the web
    #[serde(default)]
    pub web_defaults: bool,
    /// Round computed geometry to whole pixels
    #[serde(default = "default_true")]
    pub rounding: bool,
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            enabled: true,
            web_defaults: false,
            rounding: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct LoggingSection {
    /// `tracing_subscriber::EnvFilter` directive
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_filter() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a file, or from `trellis.toml` in a directory
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join("trellis.toml")
        } else {
            path.to_path_buf()
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid trellis configuration")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Layout tree settings derived from the `[layout]` section
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            web_defaults: self.layout.web_defaults,
            rounding: self.layout.rounding,
        }
    }
}
