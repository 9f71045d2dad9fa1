//! Path suggestions for settings input
//!
//! Each suggester lists vault paths whose text contains the query,
//! ignoring case.

use anyhow::Result;
use std::path::Path;

use crate::config::Settings;
use crate::path::extension;
use crate::storage::Storage;

pub trait Suggest {
    fn suggestions(&self, query: &str) -> Result<Vec<String>>;
}

fn to_vault_path(path: &Path) -> Option<String> {
    let segments: Option<Vec<&str>> = path.iter().map(|s| s.to_str()).collect();
    segments.map(|s| s.join("/"))
}

fn matches(path: &str, query: &str) -> bool {
    path.to_lowercase().contains(&query.to_lowercase())
}

/// Markdown files, for picking templates
pub struct FileSuggest<'a> {
    storage: &'a dyn Storage,
}

impl<'a> FileSuggest<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }
}

impl Suggest for FileSuggest<'_> {
    fn suggestions(&self, query: &str) -> Result<Vec<String>> {
        Ok(self
            .storage
            .walk_files()?
            .iter()
            .filter_map(|p| to_vault_path(p))
            .filter(|p| extension(p) == "md" && matches(p, query))
            .collect())
    }
}

/// Folders, for picking override and ignore targets
///
/// When built with [`FolderSuggest::for_override`], folders that already
/// have an override are left out, except the one being edited.
pub struct FolderSuggest<'a> {
    storage: &'a dyn Storage,
    exclude: Vec<String>,
}

impl<'a> FolderSuggest<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self {
            storage,
            exclude: Vec::new(),
        }
    }

    pub fn for_override(storage: &'a dyn Storage, settings: &Settings, editing: Option<&str>) -> Self {
        let exclude = settings
            .folder_templates
            .keys()
            .filter(|k| Some(k.as_str()) != editing)
            .cloned()
            .collect();
        Self { storage, exclude }
    }
}

impl Suggest for FolderSuggest<'_> {
    fn suggestions(&self, query: &str) -> Result<Vec<String>> {
        Ok(self
            .storage
            .walk_folders()?
            .iter()
            .filter_map(|p| to_vault_path(p))
            .filter(|p| !p.is_empty() && !self.exclude.contains(p) && matches(p, query))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn storage() -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage.write(Path::new("Templates/Meeting.md"), "").unwrap();
        storage.write(Path::new("Templates/logo.png"), "").unwrap();
        storage.write(Path::new("Work/Projects/plan.md"), "").unwrap();
        storage
    }

    #[test]
    fn test_file_suggestions_are_markdown_only() {
        let storage = storage();
        let files = FileSuggest::new(&storage).suggestions("templ").unwrap();
        assert_eq!(files, vec!["Templates/Meeting.md"]);

        let all = FileSuggest::new(&storage).suggestions("").unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_folder_suggestions() {
        let storage = storage();
        let folders = FolderSuggest::new(&storage).suggestions("WORK").unwrap();
        assert_eq!(folders, vec!["Work", "Work/Projects"]);
    }

    #[test]
    fn test_folder_suggestions_skip_configured_folders() {
        let storage = storage();
        let mut settings = Settings::default();
        settings.set_folder_template("Work", "Templates/Meeting.md");
        settings.set_folder_template("Templates", "Templates/Meeting.md");

        let folders = FolderSuggest::for_override(&storage, &settings, Some("Work"))
            .suggestions("")
            .unwrap();
        assert_eq!(folders, vec!["Work", "Work/Projects"]);
    }
}
