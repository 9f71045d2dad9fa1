//! File-created notifications
//!
//! The host tells the core "file X was created" by sending a [`FileCreated`]
//! on a queue. The core does not care where the notification came from.

use std::path::{Component, Path};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::path::{basename, extension, normalize_path};

/// A newly created file in the vault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCreated {
    /// Vault-relative path with `/` separators
    pub path: String,
    /// File name without folder or extension
    pub basename: String,
    /// Extension without the dot
    pub extension: String,
}

impl FileCreated {
    /// Build a notification from a vault-relative path
    pub fn new(path: &str) -> Self {
        let path = normalize_path(path);
        Self {
            basename: basename(&path).to_string(),
            extension: extension(&path).to_string(),
            path,
        }
    }

    /// Build a notification from a filesystem path under `root`
    ///
    /// Returns `None` for paths outside the vault or that are not valid UTF-8.
    pub fn from_fs_path(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_str()?),
                _ => return None,
            }
        }
        if segments.is_empty() {
            return None;
        }
        Some(Self::new(&segments.join("/")))
    }

    pub fn is_markdown(&self) -> bool {
        self.extension == "md"
    }
}

/// Create the queue a host feeds notifications into
pub fn channel() -> (Sender<FileCreated>, Receiver<FileCreated>) {
    mpsc::channel()
}
