//! Template resolution
//!
//! Picks the one template that governs a new note, based on where the note
//! lives. Deeper folder overrides beat shallower ones, and any folder
//! override beats the default template.

use crate::config::Settings;
use crate::path::{ancestor_folders, is_within, normalize_path};

/// True when `file_path` lies under one of the ignored paths
pub fn is_ignored(file_path: &str, settings: &Settings) -> bool {
    let file_path = normalize_path(file_path);
    settings
        .ignore_paths
        .iter()
        .map(|p| normalize_path(p))
        .any(|prefix| is_within(&file_path, &prefix))
}

/// Template path for a new note at `file_path`, if any applies
///
/// Ignored paths never resolve. Otherwise the containing folders are tried
/// from the deepest up, and the default template is the last resort.
/// Overrides with an empty template are skipped.
pub fn resolve(file_path: &str, settings: &Settings) -> Option<String> {
    if is_ignored(file_path, settings) {
        return None;
    }

    let file_path = normalize_path(file_path);
    ancestor_folders(&file_path)
        .filter_map(|folder| settings.folder_templates.get(folder))
        .find(|template| !template.is_empty())
        .or_else(|| Some(&settings.default_template).filter(|t| !t.is_empty()))
        .cloned()
}
