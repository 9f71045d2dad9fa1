//! Error types for template application and settings edits

use thiserror::Error;

/// Why a template could not be applied to a new note
///
/// Each variant becomes exactly one notice at the dispatch boundary.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("No template configured. Go to settings to select one.")]
    Unconfigured,

    #[error("Default Template: Template file \"{path}\" not found or cannot be read.")]
    TemplateUnreadable {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Default Template: Could not read \"{path}\".")]
    TargetUnreadable {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Default Template: Could not write \"{path}\".")]
    WriteFailed {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ApplyError {
    /// The text shown to the user for this failure
    pub fn notice(&self) -> String {
        self.to_string()
    }
}

/// Rejected settings edits
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Path already ignored")]
    DuplicateIgnorePath(String),

    #[error("No folder template for \"{0}\"")]
    UnknownFolder(String),

    #[error("\"{0}\" is not an ignored path")]
    UnknownIgnorePath(String),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}
