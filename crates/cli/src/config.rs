use anyhow::{Context, Result};
use kassa_import::{Bank, MatchPolicy, ProcessOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "kassa.toml";

/// Contents of `kassa.toml`. Every key is optional.
///
/// ```toml
/// bank = "sberbank"
/// warn = true
/// match_policy = "nearest"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bank: Option<Bank>,
    pub warn: bool,
    pub match_policy: MatchPolicy,
}

impl Config {
    pub fn from_toml(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content).context("Failed to parse config")
    }

    /// An explicit path must exist; otherwise the platform config directory is
    /// consulted and a missing file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match default_path() {
                Some(p) if p.is_file() => p,
                _ => return Ok(Config::default()),
            },
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::from_toml(&content).with_context(|| format!("In {}", path.display()))
    }
}

fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "kassa", "Kassa")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Effective run parameters once command-line flags are laid over the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub bank: Bank,
    pub options: ProcessOptions,
}

impl Settings {
    pub fn resolve(
        config: &Config,
        bank: Option<Bank>,
        warn: bool,
        policy: Option<MatchPolicy>,
    ) -> Self {
        Settings {
            bank: bank.or(config.bank).unwrap_or(Bank::Sberbank),
            options: ProcessOptions {
                warn_unrecognized: warn || config.warn,
                match_policy: policy.unwrap_or(config.match_policy),
            },
        }
    }
}
