//! Configuration system for Rubricate.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> CLI args.
//! Configuration is loaded from `~/.config/rubricate/config.toml` and/or `.rubricate/config.toml`
//! in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::consolidate::ConsolidationMode;
use crate::error::{ConfigError, RubricateError};
use crate::persistence::atomic_write;
use crate::rubric::ScoringScale;
use crate::types::NormalizationMethod;

/// Name of the per-workspace state directory.
pub const WORKSPACE_DIR: &str = ".rubricate";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RubricateConfig {
    #[serde(default)]
    pub consolidation: ConsolidationConfig,
    #[serde(default)]
    pub rubrics: RubricDefaults,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How scores are consolidated when the caller does not say otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationConfig {
    /// Require a score for every configured rubric.
    #[serde(default = "default_true")]
    pub strict: bool,
    /// Method used when a weight config is created without one.
    #[serde(default)]
    pub default_method: NormalizationMethod,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            strict: true,
            default_method: NormalizationMethod::WeightedAverage,
        }
    }
}

impl ConsolidationConfig {
    pub fn mode(&self) -> ConsolidationMode {
        ConsolidationMode::from_strict(self.strict)
    }
}

/// Scoring scale applied to rubrics that do not declare their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RubricDefaults {
    pub default_scale_min: f64,
    pub default_scale_max: f64,
    pub default_scale_step: f64,
}

impl Default for RubricDefaults {
    fn default() -> Self {
        let scale = ScoringScale::default();
        Self {
            default_scale_min: scale.min_score,
            default_scale_max: scale.max_score,
            default_scale_step: scale.step,
        }
    }
}

impl RubricDefaults {
    /// The configured scale, or the built-in 0–10 scale when the configured
    /// values are inconsistent.
    pub fn scale(&self) -> ScoringScale {
        ScoringScale::new(
            self.default_scale_min,
            self.default_scale_max,
            self.default_scale_step,
        )
        .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Snapshot location. Relative paths resolve against the workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Start from the built-in catalog when no snapshot exists.
    #[serde(default = "default_true")]
    pub seed_defaults: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            seed_defaults: true,
        }
    }
}

impl CatalogConfig {
    /// Resolved snapshot path for `workspace`.
    pub fn resolve_path(&self, workspace: &Path) -> PathBuf {
        match &self.path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => workspace.join(path),
            None => workspace.join(WORKSPACE_DIR).join("catalog.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write JSON logs to the daily rolling file in the data dir.
    #[serde(default = "default_true")]
    pub json_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { json_file: true }
    }
}

fn default_true() -> bool {
    true
}

impl RubricateConfig {
    /// Validate the configuration and return any warnings.
    ///
    /// Returns an empty Vec when nothing looks off. Problems are reported as
    /// human-readable warnings rather than errors.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let r = &self.rubrics;
        if let Err(e) = ScoringScale::new(r.default_scale_min, r.default_scale_max, r.default_scale_step) {
            warnings.push(format!("[rubrics] {e}; falling back to the 0-10 scale"));
        }

        if !self.consolidation.default_method.uses_weights() {
            warnings.push(format!(
                "[consolidation] default_method is {}, rubric weights will not affect the final score",
                self.consolidation.default_method
            ));
        }

        if !self.catalog.seed_defaults && self.catalog.path.is_none() {
            warnings.push(
                "[catalog] seed_defaults is off and no path is set, the catalog starts empty"
                    .to_string(),
            );
        }

        warnings
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "rubricate", "rubricate")
}

/// Load configuration from all layers.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `RUBRICATE_`)
/// 3. Workspace-local config (`.rubricate/config.toml`)
/// 4. User config (`~/.config/rubricate/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&RubricateConfig>,
) -> Result<RubricateConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(RubricateConfig::default()));

    if let Some(dirs) = project_dirs() {
        let user_config = dirs.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = ws.join(WORKSPACE_DIR).join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // RUBRICATE_CONSOLIDATION__STRICT, RUBRICATE_CATALOG__PATH, etc.
    figment = figment.merge(Env::prefixed("RUBRICATE_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

/// Whether a user-level or workspace-level config file exists.
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if project_dirs().is_some_and(|dirs| dirs.config_dir().join("config.toml").exists()) {
        return true;
    }
    workspace.is_some_and(|ws| ws.join(WORKSPACE_DIR).join("config.toml").exists())
}

/// Directory for log files, if the platform has one.
pub fn log_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("logs"))
}

/// Write `config` to `<workspace>/.rubricate/config.toml`, returning the path.
pub fn write_workspace_config(
    workspace: &Path,
    config: &RubricateConfig,
) -> Result<PathBuf, RubricateError> {
    let path = workspace.join(WORKSPACE_DIR).join("config.toml");
    let content = toml::to_string_pretty(config).map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })?;
    atomic_write(&path, content.as_bytes())?;
    Ok(path)
}
