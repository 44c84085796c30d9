use anyhow::{Context, Result};
use shabzak_store::Snapshot;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;

/// `$SHABZAK_HOME`, else `$HOME/.shabzak`.
pub fn shabzak_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SHABZAK_HOME") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".shabzak"))
}

pub fn ensure_shabzak_home() -> Result<PathBuf> {
    let dir = shabzak_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn state_path(cfg: &Config) -> Result<PathBuf> {
    Ok(cfg.storage.resolve(&ensure_shabzak_home()?))
}

pub fn load_snapshot(cfg: &Config) -> Result<Snapshot> {
    Snapshot::load(&state_path(cfg)?)
}

pub fn save_snapshot(cfg: &Config, snapshot: &Snapshot) -> Result<()> {
    snapshot.save(&state_path(cfg)?)
}
