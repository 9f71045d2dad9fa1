//! Command implementations
//!
//! All CLI command logic is implemented here as functions that are called
//! from the main entry point.

use super::colors::{self, TerminalNotifier};
use anyhow::{Context, Result};
use autotemplate::path::normalize_path;
use autotemplate::{
    AutoTemplate, FileCreated, FileSuggest, FixedClock, FolderSuggest, Outcome, RealStorage,
    Settings, SettingsError, SkipReason, Suggest,
};
use chrono::{Local, NaiveDateTime, TimeZone};
use std::path::Path;
use termcolor::ColorChoice;

/// A settings change requested from the command line
pub enum SettingsEdit {
    Default(String),
    AddFolderPlaceholder,
    SetFolder(String, String),
    RenameFolder(String, String),
    RemoveFolder(String),
    AddIgnore(String),
    UpdateIgnore(String, String),
    RemoveIgnore(String),
}

pub enum SuggestKind {
    Files,
    Folders,
    /// Folders without an override yet, plus the one being edited
    OverrideFolders(String),
}

fn open_engine(vault: &Path, color: ColorChoice) -> Result<AutoTemplate> {
    if !vault.is_dir() {
        anyhow::bail!("Vault directory not found: {}", vault.display());
    }
    let storage = Box::new(RealStorage::new(vault.to_path_buf()));
    Ok(AutoTemplate::from_storage(storage)?.with_notifier(Box::new(TerminalNotifier::new(color))))
}

fn describe_skip(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NotMarkdown => "not a markdown file",
        SkipReason::Ignored => "path is ignored",
        SkipReason::NotEmpty => "note already has content",
        SkipReason::Vanished => "note no longer exists",
    }
}

fn report(outcome: Option<Outcome>, path: &str, color: ColorChoice) {
    let mut stdout = colors::create_stdout(color);
    match outcome {
        Some(Outcome::Written { template }) => {
            colors::print_line(
                &mut stdout,
                &colors::success(),
                &format!("Filled {} from {}", path, template),
            );
        }
        Some(Outcome::Skipped(reason)) => {
            colors::print_line(
                &mut stdout,
                &colors::dim(),
                &format!("Skipped {}: {}", path, describe_skip(reason)),
            );
        }
        Some(Outcome::RaceLost) => {
            colors::print_line(
                &mut stdout,
                &colors::dim(),
                &format!("Skipped {}: written by someone else first", path),
            );
        }
        // The notice has already been shown
        None => {}
    }
}

// ============================================================================
// Note Commands
// ============================================================================

pub fn new(vault: &Path, path: &str, color: ColorChoice) -> Result<()> {
    let engine = open_engine(vault, color)?;
    let event = FileCreated::new(path);
    let note_path = Path::new(&event.path);

    if engine.storage().exists(note_path) {
        anyhow::bail!("Note already exists: {}", event.path);
    }
    if let Some(parent) = note_path.parent() {
        engine.storage().create_dir_all(parent)?;
    }
    engine.storage().write(note_path, "")?;

    report(engine.dispatch(&event), &event.path, color);
    Ok(())
}

pub fn apply(vault: &Path, path: &str, color: ColorChoice) -> Result<()> {
    let engine = open_engine(vault, color)?;
    let event = FileCreated::new(path);

    if !engine.storage().exists(Path::new(&event.path)) {
        anyhow::bail!("Note not found: {}", event.path);
    }

    report(engine.dispatch(&event), &event.path, color);
    Ok(())
}

pub fn resolve(vault: &Path, path: &str, color: ColorChoice) -> Result<()> {
    let engine = open_engine(vault, color)?;
    let mut stdout = colors::create_stdout(color);

    if autotemplate::resolver::is_ignored(path, engine.settings()) {
        colors::print_line(&mut stdout, &colors::dim(), "ignored");
        return Ok(());
    }

    match engine.resolve(path) {
        Some(template) => colors::print_line(&mut stdout, &colors::highlight(), &template),
        None => colors::print_line(&mut stdout, &colors::warning(), "no template configured"),
    }
    Ok(())
}

pub fn render(vault: &Path, template: &str, title: &str, at: Option<&str>) -> Result<()> {
    let engine = open_engine(vault, ColorChoice::Never)?;
    let engine = match at {
        Some(at) => {
            let naive = NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M")
                .with_context(|| format!("Invalid time '{}', expected YYYY-MM-DDTHH:MM", at))?;
            let local = Local
                .from_local_datetime(&naive)
                .single()
                .with_context(|| format!("Ambiguous or skipped local time: {}", at))?;
            engine.with_clock(Box::new(FixedClock(local.fixed_offset())))
        }
        None => engine,
    };

    let text = engine
        .storage()
        .read_to_string(Path::new(&normalize_path(template)))
        .with_context(|| format!("Template not found: {}", template))?;
    print!("{}", engine.render(&text, title));
    Ok(())
}

// ============================================================================
// Settings Commands
// ============================================================================

pub fn config_show(vault: &Path) -> Result<()> {
    let engine = open_engine(vault, ColorChoice::Never)?;
    let json =
        serde_json::to_string_pretty(engine.settings()).context("Failed to serialize settings")?;
    println!("{}", json);
    Ok(())
}

pub fn config_edit(vault: &Path, edit: SettingsEdit, color: ColorChoice) -> Result<()> {
    let mut engine = open_engine(vault, color)?;
    let settings: &mut Settings = engine.settings_mut();

    let result = match edit {
        SettingsEdit::Default(template) => {
            settings.set_default_template(&template);
            Ok(())
        }
        SettingsEdit::AddFolderPlaceholder => {
            settings.add_folder_placeholder();
            Ok(())
        }
        SettingsEdit::SetFolder(folder, template) => {
            settings.set_folder_template(&folder, &template);
            Ok(())
        }
        SettingsEdit::RenameFolder(old, new) => settings.rename_folder(&old, &new),
        SettingsEdit::RemoveFolder(folder) => settings.remove_folder_template(&folder),
        SettingsEdit::AddIgnore(path) => settings.add_ignore_path(&path),
        SettingsEdit::UpdateIgnore(old, new) => settings.update_ignore_path(&old, &new),
        SettingsEdit::RemoveIgnore(path) => settings.remove_ignore_path(&path),
    };

    match result {
        Ok(()) => {}
        Err(e @ SettingsError::DuplicateIgnorePath(_)) => {
            engine.notify(&e.to_string());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    engine.save_settings()?;

    let mut stdout = colors::create_stdout(color);
    colors::print_line(&mut stdout, &colors::success(), "Settings saved");
    Ok(())
}

pub fn suggest(vault: &Path, kind: SuggestKind, query: &str) -> Result<()> {
    let engine = open_engine(vault, ColorChoice::Never)?;
    let suggestions = match kind {
        SuggestKind::Files => FileSuggest::new(engine.storage()).suggestions(query)?,
        SuggestKind::Folders => FolderSuggest::new(engine.storage()).suggestions(query)?,
        SuggestKind::OverrideFolders(editing) => {
            let editing = normalize_path(&editing);
            let editing = (!editing.is_empty()).then_some(editing.as_str());
            FolderSuggest::for_override(engine.storage(), engine.settings(), editing)
                .suggestions(query)?
        }
    };

    for path in suggestions {
        println!("{}", path);
    }
    Ok(())
}
