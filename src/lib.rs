//! AutoTemplate - fill newly created notes from a template
//!
//! When the host reports that a note was created, the library decides which
//! template governs it, substitutes `{{title}}`, `{{date}}` and `{{time}}`,
//! and writes the result into the note, but only while the note is still
//! empty. File access, notices and the clock are supplied by the host.
//!
//! # Example
//!
//! ```no_run
//! use autotemplate::{AutoTemplate, FileCreated, RealStorage};
//! use std::path::PathBuf;
//!
//! let storage = Box::new(RealStorage::new(PathBuf::from("/home/me/vault")));
//! let engine = AutoTemplate::with_defaults(storage);
//!
//! // The host created "Work/Standup.md"
//! let outcome = engine.dispatch(&FileCreated::new("Work/Standup.md"));
//! println!("{:?}", outcome);
//! ```

pub mod apply;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod moment;
pub mod notice;
pub mod path;
pub mod render;
pub mod resolver;
pub mod storage;
pub mod suggest;

use std::sync::mpsc::Receiver;
use tracing::{debug, warn};

/// Result type alias using anyhow::Error
pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// Main library API
///
/// Holds the vault's settings together with the host capabilities the
/// template engine needs.
pub struct AutoTemplate {
    settings: config::Settings,
    storage: Box<dyn storage::Storage>,
    notifier: Box<dyn notice::Notifier>,
    clock: Box<dyn clock::Clock>,
}

/// Counts from a [`AutoTemplate::serve`] run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServeStats {
    pub written: usize,
    pub skipped: usize,
    pub race_lost: usize,
    pub failed: usize,
}

impl AutoTemplate {
    /// Create an instance from explicit settings and storage
    ///
    /// Notices go to the log and the system clock is used; see
    /// [`with_notifier`](Self::with_notifier) and [`with_clock`](Self::with_clock).
    pub fn new(settings: config::Settings, storage: Box<dyn storage::Storage>) -> Self {
        Self {
            settings,
            storage,
            notifier: Box::new(notice::LogNotifier),
            clock: Box::new(clock::SystemClock),
        }
    }

    /// Create an instance by loading settings from storage
    pub fn from_storage(storage: Box<dyn storage::Storage>) -> Result<Self> {
        let settings = config::Settings::load(&*storage)?;
        Ok(Self::new(settings, storage))
    }

    /// Create an instance, using default settings if none can be loaded
    pub fn with_defaults(storage: Box<dyn storage::Storage>) -> Self {
        let settings = config::Settings::load_or_default(&*storage);
        Self::new(settings, storage)
    }

    pub fn with_notifier(mut self, notifier: Box<dyn notice::Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn clock::Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &config::Settings {
        &self.settings
    }

    /// Mutable settings; call [`save_settings`](Self::save_settings) afterwards
    pub fn settings_mut(&mut self) -> &mut config::Settings {
        &mut self.settings
    }

    /// Persist the current settings to the vault
    pub fn save_settings(&self) -> Result<()> {
        self.settings.save(&*self.storage)
    }

    pub fn storage(&self) -> &dyn storage::Storage {
        &*self.storage
    }

    /// Show a notice through the configured notifier
    pub fn notify(&self, message: &str) {
        self.notifier.notice(message);
    }

    /// Template that would govern a new note at `file_path`
    pub fn resolve(&self, file_path: &str) -> Option<String> {
        resolver::resolve(file_path, &self.settings)
    }

    /// Render template text as if for a note named `title`, right now
    pub fn render(&self, template: &str, title: &str) -> String {
        let ctx = render::RenderContext::new(title, self.clock.now());
        render::render(template, &ctx)
    }

    /// Handle a file-created notification, reporting failures as errors
    pub fn handle_created(
        &self,
        event: &event::FileCreated,
    ) -> std::result::Result<apply::Outcome, error::ApplyError> {
        apply::apply(event, &self.settings, &*self.storage, &*self.clock)
    }

    /// Handle a file-created notification, turning any failure into one notice
    ///
    /// Returns `None` when the notification failed.
    pub fn dispatch(&self, event: &event::FileCreated) -> Option<apply::Outcome> {
        match self.handle_created(event) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(path = %event.path, error = ?e, "could not apply template");
                self.notifier.notice(&e.notice());
                None
            }
        }
    }

    /// Handle notifications from `events` until every sender is gone
    pub fn serve(&self, events: Receiver<event::FileCreated>) -> ServeStats {
        let mut stats = ServeStats::default();
        for event in events {
            debug!(path = %event.path, "file created");
            match self.dispatch(&event) {
                Some(apply::Outcome::Written { .. }) => stats.written += 1,
                Some(apply::Outcome::Skipped(_)) => stats.skipped += 1,
                Some(apply::Outcome::RaceLost) => stats.race_lost += 1,
                None => stats.failed += 1,
            }
        }
        stats
    }
}

// Re-export main types for convenience
pub use apply::{Outcome, SkipReason};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Settings;
pub use error::{ApplyError, SettingsError};
pub use event::FileCreated;
pub use notice::{LogNotifier, Notifier, RecordingNotifier};
pub use render::RenderContext;
pub use storage::{EntryKind, MemoryStorage, RealStorage, Storage};
pub use suggest::{FileSuggest, FolderSuggest, Suggest};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use std::path::Path;

    fn engine(storage: &MemoryStorage, notices: &RecordingNotifier) -> AutoTemplate {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 15, 9, 30, 0)
            .unwrap();
        AutoTemplate::with_defaults(Box::new(storage.clone()))
            .with_notifier(Box::new(notices.clone()))
            .with_clock(Box::new(FixedClock(now)))
    }

    #[test]
    fn test_with_defaults_reads_vault_settings() {
        let storage = MemoryStorage::new();
        storage
            .write(
                Path::new(config::SETTINGS_PATH),
                r#"{"defaultTemplate": "T.md", "ignorePaths": ["Archive"]}"#,
            )
            .unwrap();

        let engine = engine(&storage, &RecordingNotifier::new());
        assert_eq!(engine.resolve("x.md").as_deref(), Some("T.md"));
        assert_eq!(engine.resolve("Archive/x.md"), None);
    }

    #[test]
    fn test_from_storage_rejects_malformed_settings() {
        let storage = MemoryStorage::new();
        storage.write(Path::new(config::SETTINGS_PATH), "[1, 2").unwrap();

        assert!(AutoTemplate::from_storage(Box::new(storage)).is_err());
    }

    #[test]
    fn test_settings_round_trip_through_engine() {
        let storage = MemoryStorage::new();
        let mut engine = engine(&storage, &RecordingNotifier::new());
        engine.settings_mut().set_folder_template("Work", "T1.md");
        engine.save_settings().unwrap();

        let reloaded = AutoTemplate::from_storage(Box::new(storage.clone())).unwrap();
        assert_eq!(reloaded.resolve("Work/a.md").as_deref(), Some("T1.md"));
    }

    #[test]
    fn test_render_uses_clock() {
        let storage = MemoryStorage::new();
        let engine = engine(&storage, &RecordingNotifier::new());
        assert_eq!(engine.render("{{title}} {{date:YYYY}}", "Plan"), "Plan 2024");
    }

    #[test]
    fn test_dispatch_failure_is_one_notice() {
        let storage = MemoryStorage::new();
        storage.write(Path::new("new.md"), "").unwrap();
        let notices = RecordingNotifier::new();
        let engine = engine(&storage, &notices);

        assert_eq!(engine.dispatch(&FileCreated::new("new.md")), None);
        assert_eq!(
            notices.messages(),
            vec!["No template configured. Go to settings to select one."]
        );
    }

    #[test]
    fn test_serve_drains_queue() {
        let storage = MemoryStorage::new();
        storage.write(Path::new("T.md"), "# {{title}}").unwrap();
        storage.write(Path::new("a.md"), "").unwrap();
        storage.write(Path::new("b.md"), "already here").unwrap();
        storage.write(Path::new("c.png"), "").unwrap();

        let notices = RecordingNotifier::new();
        let mut engine = engine(&storage, &notices);
        engine.settings_mut().set_default_template("T.md");

        let (tx, rx) = event::channel();
        for name in ["a.md", "b.md", "c.png"] {
            tx.send(FileCreated::new(name)).unwrap();
        }
        drop(tx);

        let stats = engine.serve(rx);
        assert_eq!(
            stats,
            ServeStats {
                written: 1,
                skipped: 2,
                race_lost: 0,
                failed: 0
            }
        );
        assert_eq!(storage.read_to_string(Path::new("a.md")).unwrap(), "# a");
        assert!(notices.messages().is_empty());
    }
}
