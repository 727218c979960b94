use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BUILDS_URL: &str =
    "https://raw.githubusercontent.com/wintercms/meta/master/manifest/builds.json";
pub const DEFAULT_FORKS_URL: &str =
    "https://raw.githubusercontent.com/wintercms/meta/master/manifest/forks.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_BUILDS_URL: &str = "WINTER_MANIFEST_URL";
const ENV_FORKS_URL: &str = "WINTER_FORKS_URL";
const ENV_TIMEOUT_SECS: &str = "WINTER_HTTP_TIMEOUT_SECS";

/// Effective settings after merging flags, environment, config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub builds_url: String,
    pub forks_url: String,
    pub timeout: Duration,
    /// Modules to scan; `None` means detect from `modules/`.
    pub modules: Option<Vec<String>>,
}

/// Values given on the command line. Anything set here wins.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub builds_url: Option<String>,
    pub forks_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub modules: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    manifest: RawManifestConfig,
    #[serde(default)]
    scan: RawScanConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifestConfig {
    builds_url: Option<String>,
    forks_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScanConfig {
    modules: Option<Vec<String>>,
}

impl Settings {
    /// Load settings for this process.
    ///
    /// An explicit `config_path` must exist; the per-user config file is read only if present.
    pub fn load(config_path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let raw = match config_path {
            Some(path) => read_config(path)?,
            None => match default_config_path().filter(|path| path.is_file()) {
                Some(path) => read_config(&path)?,
                None => RawConfig::default(),
            },
        };
        let env = Overrides::from_env(|key| std::env::var(key).ok())?;
        Ok(Self::merge(raw, env, overrides))
    }

    /// Parse a TOML config document and merge it under `env` and `overrides`.
    pub fn from_toml(document: &str, env: Overrides, overrides: Overrides) -> Result<Self> {
        let raw = parse_config(document)?;
        Ok(Self::merge(raw, env, overrides))
    }

    fn merge(raw: RawConfig, env: Overrides, flags: Overrides) -> Self {
        let builds_url = flags
            .builds_url
            .or(env.builds_url)
            .or(raw.manifest.builds_url)
            .unwrap_or_else(|| DEFAULT_BUILDS_URL.to_string());
        let forks_url = flags
            .forks_url
            .or(env.forks_url)
            .or(raw.manifest.forks_url)
            .unwrap_or_else(|| DEFAULT_FORKS_URL.to_string());
        let timeout_secs = flags
            .timeout_secs
            .or(env.timeout_secs)
            .or(raw.manifest.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let modules = flags
            .modules
            .or(env.modules)
            .or(raw.scan.modules)
            .filter(|modules| !modules.is_empty());

        Self {
            builds_url,
            forks_url,
            timeout: Duration::from_secs(timeout_secs),
            modules,
        }
    }
}

impl Overrides {
    /// Read the `WINTER_*` variables through `lookup`. Empty values count as unset.
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let timeout_secs = get(ENV_TIMEOUT_SECS)
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a number of seconds"))
            })
            .transpose()?;

        Ok(Self {
            builds_url: get(ENV_BUILDS_URL),
            forks_url: get(ENV_FORKS_URL),
            timeout_secs,
            modules: None,
        })
    }
}

/// `<config dir>/winter-cli/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("winter-cli").join("config.toml"))
}

fn read_config(path: &Path) -> Result<RawConfig> {
    let document = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&document).with_context(|| format!("Invalid config file {}", path.display()))
}

fn parse_config(document: &str) -> Result<RawConfig> {
    toml::from_str(document).context("Config is not valid TOML")
}
