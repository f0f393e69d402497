//! Global config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement, so a
//! `trellis.toml` edit can be picked up between two watch-mode builds.
//!
//! ```text
//!   serve thread ──► cfg() ─┐
//!                           ├──► CONFIG (ArcSwap<ProjectConfig>)
//!   watch thread ──► reload_config() ─┘   (atomic replace)
//! ```

use super::ProjectConfig;
use crate::utils::hash;
use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use std::{
    fs,
    sync::{
        Arc, LazyLock,
        atomic::{AtomicU64, Ordering},
    },
};

/// Global config storage, replaced with the loaded config in main.
pub static CONFIG: LazyLock<ArcSwap<ProjectConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(ProjectConfig::default()));

/// Fingerprint of the config file content behind [`CONFIG`].
static CONFIG_HASH: AtomicU64 = AtomicU64::new(0);

/// Get current config as `Arc<ProjectConfig>`.
#[inline]
pub fn cfg() -> Arc<ProjectConfig> {
    CONFIG.load_full()
}

/// Initialize global config (called once at startup).
pub fn init_config(config: ProjectConfig) {
    if let Ok(content) = fs::read_to_string(&config.config_path) {
        CONFIG_HASH.store(hash::compute(content.as_bytes()), Ordering::Relaxed);
    }
    CONFIG.store(Arc::new(config));
}

/// Reload `trellis.toml` if its content changed.
///
/// Returns `true` when a new config was stored. On a parse or validation
/// error the current config stays in place.
pub fn reload_config() -> Result<bool> {
    let current = cfg();
    let cli = current
        .cli
        .context("config was not initialized from the command line")?;

    let content = fs::read_to_string(&current.config_path)?;
    let new_hash = hash::compute(content.as_bytes());
    if new_hash == CONFIG_HASH.load(Ordering::Relaxed) {
        return Ok(false);
    }

    let new_config = ProjectConfig::load(cli)?;
    new_config.validate()?;

    CONFIG.store(Arc::new(new_config));
    CONFIG_HASH.store(new_hash, Ordering::Relaxed);
    Ok(true)
}
