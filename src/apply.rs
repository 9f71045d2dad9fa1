//! Applying a template to a newly created note
//!
//! The steps run in a fixed order:
//!
//! 1. Non-markdown files and ignored paths are skipped.
//! 2. A note that already has content is skipped.
//! 3. The template path is resolved; none means [`ApplyError::Unconfigured`].
//! 4. The template is read fresh; failure means [`ApplyError::TemplateUnreadable`].
//! 5. The rendered text is written through [`Storage::process`], which
//!    re-checks emptiness right before writing.
//!
//! Between the emptiness check and the write another writer can still add
//! content. With [`MemoryStorage`](crate::storage::MemoryStorage) step 5 is a
//! true compare-and-swap. With [`RealStorage`](crate::storage::RealStorage)
//! a short window remains between its final comparison and the rename. If the
//! note filled up in the meantime the result is [`Outcome::RaceLost`] and the
//! note is left alone.

use std::path::Path;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::Settings;
use crate::error::ApplyError;
use crate::event::FileCreated;
use crate::render::{RenderContext, render};
use crate::resolver;
use crate::storage::{EntryKind, Storage};

/// Why a note was left untouched without any notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotMarkdown,
    Ignored,
    NotEmpty,
    Vanished,
}

/// How a file-created notification was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    /// The note was filled from `template`
    Written { template: String },
    /// Someone else wrote to the note first
    RaceLost,
}

/// Empty means nothing but whitespace
pub fn is_empty_note(content: &str) -> bool {
    content.trim().is_empty()
}

/// Run one notification through the steps above
pub fn apply(
    event: &FileCreated,
    settings: &Settings,
    storage: &dyn Storage,
    clock: &dyn Clock,
) -> Result<Outcome, ApplyError> {
    if !event.is_markdown() {
        debug!(path = %event.path, "skipping non-markdown file");
        return Ok(Outcome::Skipped(SkipReason::NotMarkdown));
    }
    if resolver::is_ignored(&event.path, settings) {
        debug!(path = %event.path, "skipping ignored path");
        return Ok(Outcome::Skipped(SkipReason::Ignored));
    }

    let target = Path::new(&event.path);
    if storage.entry_kind(target) != Some(EntryKind::File) {
        debug!(path = %event.path, "note no longer exists");
        return Ok(Outcome::Skipped(SkipReason::Vanished));
    }
    let content = storage
        .read_to_string(target)
        .map_err(|source| ApplyError::TargetUnreadable {
            path: event.path.clone(),
            source,
        })?;
    if !is_empty_note(&content) {
        debug!(path = %event.path, "note already has content");
        return Ok(Outcome::Skipped(SkipReason::NotEmpty));
    }

    let template_path = resolver::resolve(&event.path, settings).ok_or(ApplyError::Unconfigured)?;
    debug!(path = %event.path, template = %template_path, "resolved template");

    let template_text = read_template(storage, &template_path)?;
    let ctx = RenderContext::new(event.basename.clone(), clock.now());
    let rendered = render(&template_text, &ctx);

    let mut race_lost = false;
    storage
        .process(target, &mut |current| {
            if is_empty_note(current) {
                race_lost = false;
                rendered.clone()
            } else {
                race_lost = true;
                current.to_string()
            }
        })
        .map_err(|source| ApplyError::WriteFailed {
            path: event.path.clone(),
            source,
        })?;

    if race_lost {
        info!(path = %event.path, "note filled by another writer first");
        return Ok(Outcome::RaceLost);
    }

    info!(path = %event.path, template = %template_path, "applied template");
    Ok(Outcome::Written {
        template: template_path,
    })
}

fn read_template(storage: &dyn Storage, template_path: &str) -> Result<String, ApplyError> {
    let path = Path::new(template_path);
    let unreadable = |source| ApplyError::TemplateUnreadable {
        path: template_path.to_string(),
        source,
    };

    if storage.entry_kind(path) != Some(EntryKind::File) {
        return Err(unreadable(anyhow::anyhow!("not a file")));
    }
    storage.read_to_string(path).map_err(unreadable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStorage;
    use chrono::{FixedOffset, TimeZone};

    fn clock() -> FixedClock {
        FixedClock(
            FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2024, 3, 15, 9, 30, 0)
                .unwrap(),
        )
    }

    fn settings() -> Settings {
        Settings {
            default_template: "Templates/Default.md".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        assert!(is_empty_note(""));
        assert!(is_empty_note("  \n\t\n"));
        assert!(!is_empty_note(" x "));
    }

    #[test]
    fn test_apply_writes_rendered_template() {
        let storage = MemoryStorage::new();
        storage
            .write(Path::new("Templates/Default.md"), "# {{title}}\n{{date}}")
            .unwrap();
        storage.write(Path::new("Inbox/Idea.md"), "").unwrap();

        let outcome = apply(&FileCreated::new("Inbox/Idea.md"), &settings(), &storage, &clock()).unwrap();

        assert_eq!(
            outcome,
            Outcome::Written {
                template: "Templates/Default.md".to_string()
            }
        );
        assert_eq!(
            storage.read_to_string(Path::new("Inbox/Idea.md")).unwrap(),
            "# Idea\n2024-03-15"
        );
    }

    #[test]
    fn test_template_folder_is_a_folder_not_a_file() {
        let storage = MemoryStorage::new();
        storage.write(Path::new("Templates/Default.md/inner.md"), "x").unwrap();
        storage.write(Path::new("new.md"), "").unwrap();

        let err = apply(&FileCreated::new("new.md"), &settings(), &storage, &clock()).unwrap_err();
        assert!(matches!(err, ApplyError::TemplateUnreadable { ref path, .. } if path == "Templates/Default.md"));
    }

    #[test]
    fn test_vanished_note_is_skipped() {
        let storage = MemoryStorage::new();
        let outcome = apply(&FileCreated::new("gone.md"), &settings(), &storage, &clock()).unwrap();
        assert_eq!(outcome, Outcome::Skipped(SkipReason::Vanished));
    }
}
