//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `--config <file>` or `$XDG_CONFIG_HOME/unitsel/unitsel.toml`
//! 3. Environment variables: `UNITSEL_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{default_chart, OrderingPolicy, RankRuleSpec, DEFAULT_RANK};

/// Root ordering chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OrderingConfig {
    /// Rank for names no rule matches
    pub default_rank: u32,
    /// Rules evaluated top to bottom; first match wins
    pub root_rules: Vec<RankRuleSpec>,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            default_rank: DEFAULT_RANK,
            root_rules: default_chart(),
        }
    }
}

/// Raw ordering config for intermediate parsing (`None` → field not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOrderingConfig {
    pub default_rank: Option<u32>,
    pub root_rules: Option<Vec<RankRuleSpec>>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub units_file: Option<PathBuf>,
    pub max_height: Option<u32>,
    pub picker_height: Option<String>,
    #[serde(default)]
    pub ordering: RawOrderingConfig,
}

/// Unified configuration for unitsel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Units JSON document used when `--file` is not given
    pub units_file: Option<PathBuf>,
    /// Maximum viewport height hint for consumers (non-behavioral)
    pub max_height: u32,
    /// Height of the interactive picker, e.g. "50%"
    pub picker_height: String,
    /// Root ordering chart
    pub ordering: OrderingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            units_file: None,
            max_height: 400,
            picker_height: "50%".into(),
            ordering: OrderingConfig::default(),
        }
    }
}

/// Get the XDG config directory for unitsel.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "unitsel").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("unitsel.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
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
    const ENV_PREFIX: &'static str = "UNITSEL";

    /// Load settings with layered precedence.
    ///
    /// `config_file` replaces the global config file when given; it must exist.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        match config_file {
            Some(path) => {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        let raw = load_raw_settings(&global_path)?;
                        current = current.merge_with(&raw);
                    }
                }
            }
        }

        current = current.apply_env_overrides(Self::ENV_PREFIX)?;
        current.expand_paths();
        Ok(current)
    }

    /// Merge overlay config onto self (base).
    ///
    /// Scalars: overlay wins if specified. The rule list is replaced as a
    /// whole, since rule order is significant.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            units_file: overlay
                .units_file
                .clone()
                .or_else(|| self.units_file.clone()),
            max_height: overlay.max_height.unwrap_or(self.max_height),
            picker_height: overlay
                .picker_height
                .clone()
                .unwrap_or_else(|| self.picker_height.clone()),
            ordering: OrderingConfig {
                default_rank: overlay
                    .ordering
                    .default_rank
                    .unwrap_or(self.ordering.default_rank),
                root_rules: overlay
                    .ordering
                    .root_rules
                    .clone()
                    .unwrap_or_else(|| self.ordering.root_rules.clone()),
            },
        }
    }

    /// Apply `<prefix>_*` environment variables as explicit overrides.
    fn apply_env_overrides(mut self, prefix: &str) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("units_file") {
            self.units_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_int("max_height") {
            self.max_height = u32::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("max_height out of range: {}", val),
            })?;
        }
        if let Ok(val) = config.get_string("picker_height") {
            self.picker_height = val;
        }
        if let Ok(val) = config.get_int("ordering.default_rank") {
            self.ordering.default_rank =
                u32::try_from(val).map_err(|_| ApplicationError::Config {
                    message: format!("ordering.default_rank out of range: {}", val),
                })?;
        }

        Ok(self)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(path) = self.units_file.take() {
            let expanded = expand_env_vars(path.to_string_lossy().as_ref());
            self.units_file = Some(PathBuf::from(expanded));
        }
    }

    /// Compile the configured chart.
    pub fn ordering_policy(&self) -> Result<OrderingPolicy, ApplicationError> {
        Ok(OrderingPolicy::compile(
            &self.ordering.root_rules,
            self.ordering.default_rank,
        )?)
    }

    /// Serialize to TOML for display.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Commented template written by `config init`.
pub fn config_template() -> String {
    r#"# unitsel configuration
# Precedence: defaults < this file < UNITSEL_* environment variables

# Units JSON document ({"units": [...]}) used when --file is not given
# units_file = "~/data/units.json"

# Maximum viewport height hint for consumers
# max_height = 400

# Height of the interactive picker
# picker_height = "50%"

[ordering]
# Rank for root names no rule matches
# default_rank = 500

# Root chart, evaluated top to bottom. Replaces the built-in chart when set.
# `ordinal = true` adds the Roman/Arabic number in capture group 1 to `rank`.
# [[ordering.root_rules]]
# pattern = "^Sekretariat Utama"
# rank = 10
#
# [[ordering.root_rules]]
# pattern = "^Kantor Regional\\s+([IVXLC]+|\\d+)\\b"
# rank = 100
# ordinal = true
"#
    .to_string()
}
