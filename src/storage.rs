//! Storage abstraction for vault file operations
//!
//! The Storage trait is the host's file capability. It lets the template
//! engine run against the real filesystem or entirely in memory.
//! All paths are relative to the vault root.

use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use walkdir::WalkDir;

/// What a vault path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
}

/// Storage abstraction for file operations
///
/// All paths are relative to the vault root. Implementations
/// handle the mapping to absolute paths or in-memory storage.
pub trait Storage {
    /// Read a file to a string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write contents to a file, replacing whatever is there
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Rewrite a file through `update`, which receives the current content
    ///
    /// Implementations apply `update` as close to the write as they can and
    /// return the content that was stored. Returning the input unchanged
    /// leaves the file as it is.
    fn process(&self, path: &Path, update: &mut dyn FnMut(&str) -> String) -> Result<String>;

    /// Whether the path is a file, a folder, or nothing
    fn entry_kind(&self, path: &Path) -> Option<EntryKind>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool {
        self.entry_kind(path).is_some()
    }

    /// All non-hidden files in the vault, sorted
    fn walk_files(&self) -> Result<Vec<PathBuf>>;

    /// All non-hidden folders in the vault (excluding the root), sorted
    fn walk_folders(&self) -> Result<Vec<PathBuf>>;

    /// Create directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> Result<()>;
}

fn is_hidden(path: &Path) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
    })
}

/// Real filesystem storage implementation
///
/// All operations are scoped to a root directory (the vault).
/// Paths passed to Storage methods are interpreted relative to this root.
pub struct RealStorage {
    root: PathBuf,
}

impl RealStorage {
    /// Create a new RealStorage with the given root directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The vault root this storage is scoped to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the full path by joining with root
    fn full_path(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn walk(&self, want_dirs: bool) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                e.file_name()
                    .to_str()
                    .map(|s| !s.starts_with('.'))
                    .unwrap_or(false)
            })
        {
            let entry = entry.context("Failed to read directory entry")?;
            if entry.file_type().is_dir() != want_dirs {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                entries.push(relative.to_path_buf());
            }
        }

        entries.sort();
        Ok(entries)
    }
}

impl Storage for RealStorage {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(self.full_path(path))
            .with_context(|| format!("Failed to read {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        std::fs::write(self.full_path(path), contents)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    fn process(&self, path: &Path, update: &mut dyn FnMut(&str) -> String) -> Result<String> {
        // Write through symlinks to the real note.
        let target = std::fs::canonicalize(self.full_path(path))
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        let read_target = || {
            std::fs::read_to_string(&target)
                .with_context(|| format!("Failed to read {}", path.display()))
        };

        let mut current = read_target()?;
        loop {
            let updated = update(&current);
            if updated == current {
                return Ok(current);
            }

            let mut staged = tempfile::NamedTempFile::new_in(&dir)
                .with_context(|| format!("Failed to stage write for {}", path.display()))?;
            staged
                .write_all(updated.as_bytes())
                .with_context(|| format!("Failed to stage write for {}", path.display()))?;
            let permissions = std::fs::metadata(&target)
                .with_context(|| format!("Failed to read {}", path.display()))?
                .permissions();
            staged
                .as_file()
                .set_permissions(permissions)
                .with_context(|| format!("Failed to stage write for {}", path.display()))?;

            // Another writer may have landed while we were staging.
            let latest = read_target()?;
            if latest != current {
                current = latest;
                continue;
            }

            staged
                .persist(&target)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            return Ok(updated);
        }
    }

    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        let full_path = self.full_path(path);
        if full_path.is_dir() {
            Some(EntryKind::Folder)
        } else if full_path.is_file() {
            Some(EntryKind::File)
        } else {
            None
        }
    }

    fn walk_files(&self) -> Result<Vec<PathBuf>> {
        self.walk(false)
    }

    fn walk_folders(&self) -> Result<Vec<PathBuf>> {
        self.walk(true)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(self.full_path(path))
            .with_context(|| format!("Failed to create directory {}", path.display()))
    }
}

/// In-memory storage implementation for testing
///
/// Stores files in a HashMap, allowing tests to run without
/// touching the filesystem. Clones share the same files.
#[derive(Clone)]
pub struct MemoryStorage {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MemoryStorage {
    /// Create a new empty MemoryStorage
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.lock();
        files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("File not found: {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let mut files = self.lock();
        files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn process(&self, path: &Path, update: &mut dyn FnMut(&str) -> String) -> Result<String> {
        // The lock is held across read and write, so this is a true compare-and-swap.
        let mut files = self.lock();
        let current = files
            .get_mut(path)
            .ok_or_else(|| anyhow::anyhow!("File not found: {}", path.display()))?;
        let updated = update(current.as_str());
        *current = updated.clone();
        Ok(updated)
    }

    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        let files = self.lock();
        if files.contains_key(path) {
            Some(EntryKind::File)
        } else if files.keys().any(|k| k.starts_with(path) && k != path) {
            Some(EntryKind::Folder)
        } else {
            None
        }
    }

    fn walk_files(&self) -> Result<Vec<PathBuf>> {
        let files = self.lock();
        let mut entries: Vec<PathBuf> = files.keys().filter(|k| !is_hidden(k)).cloned().collect();
        entries.sort();
        Ok(entries)
    }

    fn walk_folders(&self) -> Result<Vec<PathBuf>> {
        let files = self.lock();
        let folders: BTreeSet<PathBuf> = files
            .keys()
            .filter(|k| !is_hidden(k))
            .flat_map(|k| k.ancestors().skip(1))
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect();
        Ok(folders.into_iter().collect())
    }

    fn create_dir_all(&self, _path: &Path) -> Result<()> {
        // Folders exist implicitly through the files they contain
        Ok(())
    }
}
