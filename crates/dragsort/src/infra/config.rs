//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::app::session::OverlapPolicy;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".dragsort/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default = "Engine::unset")]
    pub engine: Engine,
    #[serde(default = "Logging::unset")]
    pub logging: Logging,
    #[serde(default = "ListDefaults::unset")]
    pub lists: ListDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    #[serde(default)]
    overlap_policy: Option<OverlapPolicy>,
}

impl Engine {
    fn unset() -> Self {
        Self {
            overlap_policy: None,
        }
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.overlap_policy.unwrap_or_default()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            overlap_policy: Some(OverlapPolicy::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logging {
    #[serde(default)]
    level: Option<String>,
}

impl Logging {
    fn unset() -> Self {
        Self { level: None }
    }

    fn default_level() -> String {
        "warn".into()
    }

    pub fn level(&self) -> String {
        self.level.clone().unwrap_or_else(Self::default_level)
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Some(Self::default_level()),
        }
    }
}

/// Defaults for lists that leave these options unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDefaults {
    #[serde(default)]
    dragging_enabled: Option<bool>,
    #[serde(default)]
    custom_wrapper: Option<bool>,
}

impl ListDefaults {
    fn unset() -> Self {
        Self {
            dragging_enabled: None,
            custom_wrapper: None,
        }
    }

    fn default_dragging_enabled() -> bool {
        true
    }

    fn default_custom_wrapper() -> bool {
        false
    }

    pub fn dragging_enabled(&self) -> bool {
        self.dragging_enabled
            .unwrap_or_else(Self::default_dragging_enabled)
    }

    pub fn custom_wrapper(&self) -> bool {
        self.custom_wrapper
            .unwrap_or_else(Self::default_custom_wrapper)
    }
}

impl Default for ListDefaults {
    fn default() -> Self {
        Self {
            dragging_enabled: Some(Self::default_dragging_enabled()),
            custom_wrapper: Some(Self::default_custom_wrapper()),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    overlap_policy: Option<String>,
    log_level: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            overlap_policy: env::var("DRAGSORT_OVERLAP_POLICY").ok(),
            log_level: env::var("DRAGSORT_LOG").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(overlap_policy: &str, log_level: &str) -> Self {
        Self {
            overlap_policy: Some(overlap_policy.to_owned()),
            log_level: Some(log_level.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    /// Load defaults overlaid with an explicit config file and env overrides.
    pub fn load_explicit(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("config file not found: {}", path.display());
        }
        Self::load_with_layers(None, Some(path.to_path_buf()), EnvOverrides::from_env())
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        apply_env_overrides(merged, env_overrides)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }

    fn merge(self, other: Self) -> Self {
        Self {
            engine: merge_engine(self.engine, other.engine),
            logging: merge_logging(self.logging, other.logging),
            lists: merge_lists(self.lists, other.lists),
        }
    }
}

fn merge_engine(mut base: Engine, overlay: Engine) -> Engine {
    if let Some(value) = overlay.overlap_policy {
        base.overlap_policy = Some(value);
    }
    base
}

fn merge_logging(mut base: Logging, overlay: Logging) -> Logging {
    if let Some(value) = overlay.level {
        base.level = Some(value);
    }
    base
}

fn merge_lists(mut base: ListDefaults, overlay: ListDefaults) -> ListDefaults {
    if let Some(value) = overlay.dragging_enabled {
        base.dragging_enabled = Some(value);
    }
    if let Some(value) = overlay.custom_wrapper {
        base.custom_wrapper = Some(value);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("dragsort/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|candidate| candidate.join(".git").exists())
        .map(Path::to_path_buf)
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Result<Config> {
    if let Some(policy) = env.overlap_policy {
        config.engine.overlap_policy = Some(
            policy
                .parse()
                .context("invalid DRAGSORT_OVERLAP_POLICY")?,
        );
    }
    if let Some(level) = env.log_level {
        config.logging.level = Some(level);
    }
    Ok(config)
}
