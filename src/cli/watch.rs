//! Watch mode
//!
//! Turns filesystem creation events into file-created notifications and
//! feeds them to the template engine one at a time.

use anyhow::{Context, Result};
use autotemplate::{AutoTemplate, FileCreated, RealStorage, event};
use notify::event::{CreateKind, EventKind};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Component, Path};
use termcolor::ColorChoice;
use tracing::{debug, warn};

use super::colors::{self, TerminalNotifier};

fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|c| match c {
        Component::Normal(s) => s.to_str().map(|s| s.starts_with('.')).unwrap_or(true),
        _ => false,
    })
}

/// Watch `vault` until interrupted
///
/// Settings are read once at startup; restart after changing them.
pub fn run(vault: &Path, color: ColorChoice) -> Result<()> {
    let root = vault
        .canonicalize()
        .with_context(|| format!("Vault directory not found: {}", vault.display()))?;

    let storage = Box::new(RealStorage::new(root.clone()));
    let engine = AutoTemplate::from_storage(storage)?
        .with_notifier(Box::new(TerminalNotifier::new(color)));

    let (tx, rx) = event::channel();
    let watch_root = root.clone();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| match res {
            Ok(fs_event) => {
                if !matches!(fs_event.kind, EventKind::Create(CreateKind::File | CreateKind::Any)) {
                    return;
                }
                for path in &fs_event.paths {
                    let hidden = path
                        .strip_prefix(&watch_root)
                        .map(is_hidden)
                        .unwrap_or(true);
                    if hidden || !path.is_file() {
                        continue;
                    }
                    if let Some(created) = FileCreated::from_fs_path(&watch_root, path) {
                        debug!(path = %created.path, "detected new file");
                        // The receiver only goes away when watching stops.
                        let _ = tx.send(created);
                    }
                }
            }
            Err(e) => warn!(error = %e, "watch error"),
        },
        Config::default(),
    )
    .context("Failed to start file watcher")?;

    watcher
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", root.display()))?;

    let mut stdout = colors::create_stdout(color);
    colors::print_line(
        &mut stdout,
        &colors::highlight(),
        &format!("Watching {} (Ctrl+C to stop)", root.display()),
    );

    let stats = engine.serve(rx);
    debug!(?stats, "watch finished");
    Ok(())
}
