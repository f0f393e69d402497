//! File system watcher for live rebuilds.
//!
//! Monitors the config file, the template tree, the dataset, the stylesheet
//! input and the script directories, and rebuilds both documents when any of
//! them changes.
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌─────────────────────────────┐
//! │ notify   │───▶│ Debouncer│───▶│      handle_changes()       │
//! │ events   │    │ (300ms)  │    │ config: reload, then build  │
//! └──────────┘    └──────────┘    │ other:  build               │
//!                                 └─────────────────────────────┘
//! ```
//!
//! Builds are cheap and deterministic, so every relevant change triggers a
//! full build. The output directory is never categorized as relevant, which
//! keeps a build from retriggering itself.

use crate::{
    build::build_project,
    config::{ProjectConfig, cfg, reload_config},
    log,
    utils::category::{FileCategory, categorize_path},
};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    sync::mpsc::{RecvTimeoutError, channel},
    time::{Duration, Instant},
};

// =============================================================================
// Constants
// =============================================================================

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

// =============================================================================
// Path Utilities
// =============================================================================

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Format path relative to the project root for log display.
fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

// =============================================================================
// Debounce State
// =============================================================================

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, paths: Vec<PathBuf>) {
        for path in paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        let mut paths: Vec<_> = self.pending.drain().collect();
        paths.sort();
        paths
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Event Handler
// =============================================================================

/// What a batch of changed paths asks for.
#[derive(Debug, PartialEq, Eq)]
enum Plan {
    Ignore,
    /// Reload the config file first.
    Reload,
    /// Rebuild, naming the first relevant path and its category.
    Rebuild(PathBuf, FileCategory),
}

fn plan_changes(paths: &[PathBuf], config: &ProjectConfig) -> Plan {
    let mut first = None;
    for path in paths {
        match categorize_path(path, config) {
            FileCategory::Config => return Plan::Reload,
            FileCategory::Unknown => {}
            category => {
                first.get_or_insert((path.clone(), category));
            }
        }
    }
    first.map_or(Plan::Ignore, |(path, category)| Plan::Rebuild(path, category))
}

/// Rebuild with the current config, logging failures.
///
/// Returns true if a build ran successfully (for cooldown tracking).
fn try_rebuild(reason: &str) -> bool {
    log!("watch"; "{reason}");
    match build_project(&cfg()) {
        Ok(_) => {
            eprintln!(); // Blank line to separate rebuild sessions
            true
        }
        Err(e) => {
            log!("watch"; "build failed");
            log!("error"; "{e:#}");
            false
        }
    }
}

/// Process file changes. Returns true if a rebuild succeeded.
fn handle_changes(paths: &[PathBuf]) -> bool {
    let config = cfg();
    match plan_changes(paths, &config) {
        Plan::Ignore => false,
        Plan::Reload => match reload_config() {
            Ok(true) => try_rebuild("config changed, rebuilding..."),
            Ok(false) => false,
            Err(e) => {
                log!("watch"; "config reload failed, keeping previous config");
                log!("error"; "{e:#}");
                false
            }
        },
        Plan::Rebuild(path, category) => try_rebuild(&format!(
            "{} changed ({}), rebuilding...",
            rel_path(&path, config.get_root()),
            category.name()
        )),
    }
}

// =============================================================================
// Watcher Setup
// =============================================================================

fn setup_watchers(watcher: &mut impl Watcher, config: &ProjectConfig) -> Result<()> {
    let root = config.get_root();
    let mut watched = Vec::new();

    for category in FileCategory::WATCHED {
        let mode = if category.is_directory() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        for path in category.paths(config) {
            if !path.exists() {
                continue;
            }
            watcher.watch(&path, mode).with_context(|| {
                format!("Failed to watch {}: {}", category.name(), path.display())
            })?;

            let suffix = if category.is_directory() { "/" } else { "" };
            watched.push(format!("{}{suffix}", rel_path(&path, root)));
        }
    }

    log!("watch"; "{}", watched.join(", "));
    eprintln!(); // Blank line to separate init logs from change events
    Ok(())
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

// =============================================================================
// Public API
// =============================================================================

/// Start blocking file watcher with debouncing and live rebuild.
///
/// Runs until the event channel closes.
pub fn watch_for_changes_blocking() -> Result<()> {
    let (tx, rx) = channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    setup_watchers(&mut watcher, &cfg())?;

    let mut debouncer = Debouncer::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) && !debouncer.in_cooldown() => {
                debouncer.add(event.paths);
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(RecvTimeoutError::Timeout) if debouncer.ready() => {
                if handle_changes(&debouncer.take()) {
                    debouncer.mark_rebuild();
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
            _ => {}
        }
    }

    Ok(())
}
