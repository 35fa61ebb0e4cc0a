//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rxtree/rxtree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `RXTREE_*` prefix, `__` between section and key
//!
//! Command-line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::LayoutParams;

/// How a laid-out expression is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented syntax tree
    Tree,
    /// One `label x y` line per node
    Coords,
    /// Graphviz DOT with pinned positions
    Dot,
    /// JSON document with nodes, edges and positions
    Json,
}

/// Output settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Decimal places for coordinates
    pub precision: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Tree,
            precision: 3,
        }
    }
}

/// Raw layout section; `None` means "not specified, inherit".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayout {
    pub width: Option<f64>,
    pub vertical_gap: Option<f64>,
    pub start_y: Option<f64>,
    pub center_x: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutput {
    pub format: Option<OutputFormat>,
    pub precision: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub layout: RawLayout,
    pub output: RawOutput,
}

/// Unified configuration for rxtree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutParams,
    pub output: OutputSettings,
}

/// Get the XDG config directory for rxtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rxtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rxtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        let l = &overlay.layout;
        let o = &overlay.output;
        Self {
            layout: LayoutParams {
                width: l.width.unwrap_or(self.layout.width),
                vertical_gap: l.vertical_gap.unwrap_or(self.layout.vertical_gap),
                start_y: l.start_y.unwrap_or(self.layout.start_y),
                center_x: l.center_x.unwrap_or(self.layout.center_x),
            },
            output: OutputSettings {
                format: o.format.unwrap_or(self.output.format),
                precision: o.precision.unwrap_or(self.output.precision),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("loading config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.layout.validate().map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })?;
        Ok(current)
    }

    /// Apply RXTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("RXTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = optional(config.get_float("layout.width"))? {
            settings.layout.width = val;
        }
        if let Some(val) = optional(config.get_float("layout.vertical_gap"))? {
            settings.layout.vertical_gap = val;
        }
        if let Some(val) = optional(config.get_float("layout.start_y"))? {
            settings.layout.start_y = val;
        }
        if let Some(val) = optional(config.get_float("layout.center_x"))? {
            settings.layout.center_x = val;
        }
        if let Some(val) = optional(config.get::<OutputFormat>("output.format"))? {
            settings.output.format = val;
        }
        if let Some(val) = optional(config.get::<usize>("output.precision"))? {
            settings.output.precision = val;
        }

        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    pub fn template() -> String {
        r#"# rxtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rxtree/rxtree.toml
#   File:   rxtree --config <file>
#   Env:    RXTREE_LAYOUT__WIDTH, RXTREE_OUTPUT__FORMAT, ...

[layout]
# Horizontal span of the whole tree
# width = 1.0

# Distance between depth levels
# vertical_gap = 0.2

# Root coordinates
# start_y = 0.0
# center_x = 0.5

[output]
# tree | coords | dot | json
# format = "tree"

# Decimal places for coordinates
# precision = 3
"#
        .to_string()
    }
}

/// Missing keys are not an error; malformed values are.
fn optional<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
