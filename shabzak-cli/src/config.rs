use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shabzak_core::EngineSettings;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_shabzak_home;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSection {
    /// Snapshot location. Relative paths resolve against the shabzak home;
    /// a leading `~/` expands to `$HOME`.
    pub state_file: Option<String>,
}

impl StorageSection {
    pub fn resolve(&self, home: &Path) -> PathBuf {
        let Some(raw) = self.state_file.as_deref() else {
            return home.join("state.json");
        };
        if let Some(rest) = raw.strip_prefix("~/") {
            if let Ok(user_home) = std::env::var("HOME") {
                return PathBuf::from(user_home).join(rest);
            }
        }
        let p = PathBuf::from(raw);
        if p.is_absolute() { p } else { home.join(p) }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_shabzak_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Missing file means defaults.
pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
