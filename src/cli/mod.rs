//! CLI module
//!
//! This module contains the terminal host for the template engine:
//! - Command implementations
//! - Watch mode
//! - Notices and colours on the terminal
//! - Logging setup

pub mod colors;
pub mod commands;
pub mod logging;
pub mod watch;

pub use commands::{SettingsEdit, SuggestKind};
