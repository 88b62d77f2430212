//! Load and validate runtime configuration.

use anyhow::bail;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const CONFIG_ENV: &str = "PORTFOLIO_CONFIG";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Deserialize, Clone)]
pub struct PortfolioCfg {
    pub initial_cash: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarketCfg {
    pub universe_path: PathBuf, // YAML list of stocks
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionCfg {
    pub script_path: PathBuf,
    #[serde(default = "default_true")]
    pub preview_before_buy: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogCfg {
    #[serde(default = "default_level")]
    pub level: String, // "trace" | "debug" | "info" | "warn" | "error"
}

impl Default for LogCfg {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub portfolio: PortfolioCfg,
    pub market: MarketCfg,
    pub session: SessionCfg,
    #[serde(default)]
    pub log: LogCfg,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let s = fs::read_to_string(path)?;
        Self::from_yaml_str(&s)
    }

    pub fn from_yaml_str(s: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let cash = self.portfolio.initial_cash;
        if !cash.is_finite() || cash < 0.0 {
            bail!("portfolio.initial_cash must be a non-negative number, got {cash}");
        }
        if self.log.level.parse::<tracing::Level>().is_err() {
            bail!("log.level: unknown level {:?}", self.log.level);
        }
        Ok(())
    }
}

/// Picks the config file: explicit path, then `$PORTFOLIO_CONFIG`, then
/// `./config.yaml`, then the platform config directory.
pub fn resolve_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }
    if let Ok(p) = std::env::var(CONFIG_ENV) {
        if !p.trim().is_empty() {
            return PathBuf::from(p);
        }
    }
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return local;
    }
    ProjectDirs::from("", "", "portfolio-impact")
        .map(|d| d.config_dir().join(CONFIG_FILE))
        .unwrap_or(local)
}
