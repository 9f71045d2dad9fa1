use autotemplate::{
    ApplyError, AutoTemplate, EntryKind, FileCreated, FixedClock, MemoryStorage, Outcome,
    RealStorage, RecordingNotifier, Settings, SkipReason, Storage,
};
use chrono::{FixedOffset, TimeZone};
use std::path::{Path, PathBuf};

fn fixed_clock() -> Box<FixedClock> {
    let now = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 15, 9, 30, 0)
        .unwrap();
    Box::new(FixedClock(now))
}

fn engine(storage: &MemoryStorage, settings: Settings, notices: &RecordingNotifier) -> AutoTemplate {
    AutoTemplate::new(settings, Box::new(storage.clone()))
        .with_notifier(Box::new(notices.clone()))
        .with_clock(fixed_clock())
}

fn work_settings() -> Settings {
    let mut settings = Settings::default();
    settings.set_default_template("Templates/Default.md");
    settings.set_folder_template("Work", "Templates/Work.md");
    settings.set_folder_template("Work/Projects", "Templates/Project.md");
    settings
}

fn vault() -> MemoryStorage {
    let storage = MemoryStorage::new();
    storage
        .write(Path::new("Templates/Default.md"), "# {{title}}\n\nCreated {{date}} at {{time}}")
        .unwrap();
    storage
        .write(Path::new("Templates/Work.md"), "# {{title}}\ntags: work\n")
        .unwrap();
    storage
        .write(Path::new("Templates/Project.md"), "# {{title}}\nstarted {{date:DD.MM.YYYY}}\n")
        .unwrap();
    storage
}

#[test]
fn test_meeting_note_gets_default_template() {
    let storage = vault();
    storage.write(Path::new("Meeting.md"), "").unwrap();
    let notices = RecordingNotifier::new();
    let engine = engine(&storage, work_settings(), &notices);

    let outcome = engine.dispatch(&FileCreated::new("Meeting.md"));

    assert_eq!(
        outcome,
        Some(Outcome::Written {
            template: "Templates/Default.md".to_string()
        })
    );
    assert_eq!(
        storage.read_to_string(Path::new("Meeting.md")).unwrap(),
        "# Meeting\n\nCreated 2024-03-15 at 09:30"
    );
    assert!(notices.messages().is_empty());
}

#[test]
fn test_deepest_folder_template_is_applied() {
    let storage = vault();
    storage.write(Path::new("Work/Projects/Alpha/kickoff.md"), "").unwrap();
    storage.write(Path::new("Work/standup.md"), "").unwrap();
    let engine = engine(&storage, work_settings(), &RecordingNotifier::new());

    engine.dispatch(&FileCreated::new("Work/Projects/Alpha/kickoff.md"));
    engine.dispatch(&FileCreated::new("Work/standup.md"));

    assert_eq!(
        storage
            .read_to_string(Path::new("Work/Projects/Alpha/kickoff.md"))
            .unwrap(),
        "# kickoff\nstarted 15.03.2024\n"
    );
    assert_eq!(
        storage.read_to_string(Path::new("Work/standup.md")).unwrap(),
        "# standup\ntags: work\n"
    );
}

#[test]
fn test_non_empty_note_is_never_modified() {
    let storage = vault();
    storage.write(Path::new("Work/draft.md"), "my own words").unwrap();
    let notices = RecordingNotifier::new();
    let engine = engine(&storage, work_settings(), &notices);

    let outcome = engine.handle_created(&FileCreated::new("Work/draft.md")).unwrap();

    assert_eq!(outcome, Outcome::Skipped(SkipReason::NotEmpty));
    assert_eq!(
        storage.read_to_string(Path::new("Work/draft.md")).unwrap(),
        "my own words"
    );
    assert!(notices.messages().is_empty());
}

#[test]
fn test_whitespace_only_note_is_templated() {
    let storage = vault();
    storage.write(Path::new("blank.md"), "\n  \n").unwrap();
    let engine = engine(&storage, work_settings(), &RecordingNotifier::new());

    let outcome = engine.handle_created(&FileCreated::new("blank.md")).unwrap();
    assert!(matches!(outcome, Outcome::Written { .. }));
}

#[test]
fn test_ignored_path_is_silently_skipped() {
    let storage = vault();
    storage.write(Path::new("Work/Projects/Archive/old.md"), "").unwrap();
    let mut settings = work_settings();
    settings.add_ignore_path("Work/Projects/Archive").unwrap();
    let notices = RecordingNotifier::new();
    let engine = engine(&storage, settings, &notices);

    let outcome = engine.handle_created(&FileCreated::new("Work/Projects/Archive/old.md")).unwrap();

    assert_eq!(outcome, Outcome::Skipped(SkipReason::Ignored));
    assert_eq!(
        storage
            .read_to_string(Path::new("Work/Projects/Archive/old.md"))
            .unwrap(),
        ""
    );
    assert!(notices.messages().is_empty());
}

#[test]
fn test_non_markdown_file_is_skipped() {
    let storage = vault();
    storage.write(Path::new("Work/board.canvas"), "").unwrap();
    let engine = engine(&storage, work_settings(), &RecordingNotifier::new());

    let outcome = engine.handle_created(&FileCreated::new("Work/board.canvas")).unwrap();
    assert_eq!(outcome, Outcome::Skipped(SkipReason::NotMarkdown));
    assert_eq!(storage.read_to_string(Path::new("Work/board.canvas")).unwrap(), "");
}

#[test]
fn test_unconfigured_produces_one_notice_and_leaves_note_empty() {
    let storage = MemoryStorage::new();
    storage.write(Path::new("Inbox/thought.md"), "").unwrap();
    let notices = RecordingNotifier::new();
    let engine = engine(&storage, Settings::default(), &notices);

    let err = engine.handle_created(&FileCreated::new("Inbox/thought.md")).unwrap_err();
    assert!(matches!(err, ApplyError::Unconfigured));

    assert_eq!(engine.dispatch(&FileCreated::new("Inbox/thought.md")), None);
    assert_eq!(
        notices.messages(),
        vec!["No template configured. Go to settings to select one."]
    );
    assert_eq!(storage.read_to_string(Path::new("Inbox/thought.md")).unwrap(), "");
}

#[test]
fn test_missing_template_names_path_in_notice() {
    let storage = MemoryStorage::new();
    storage.write(Path::new("today.md"), "").unwrap();
    let mut settings = Settings::default();
    settings.set_default_template("Templates/Gone.md");
    let notices = RecordingNotifier::new();
    let engine = engine(&storage, settings, &notices);

    assert_eq!(engine.dispatch(&FileCreated::new("today.md")), None);

    let messages = notices.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0],
        "Default Template: Template file \"Templates/Gone.md\" not found or cannot be read."
    );
    assert_eq!(storage.read_to_string(Path::new("today.md")).unwrap(), "");
}

#[test]
fn test_template_edits_are_picked_up_immediately() {
    let storage = vault();
    storage.write(Path::new("one.md"), "").unwrap();
    storage.write(Path::new("two.md"), "").unwrap();
    let engine = engine(&storage, work_settings(), &RecordingNotifier::new());

    engine.dispatch(&FileCreated::new("one.md"));
    storage
        .write(Path::new("Templates/Default.md"), "v2 {{title}}")
        .unwrap();
    engine.dispatch(&FileCreated::new("two.md"));

    assert!(
        storage
            .read_to_string(Path::new("one.md"))
            .unwrap()
            .starts_with("# one")
    );
    assert_eq!(storage.read_to_string(Path::new("two.md")).unwrap(), "v2 two");
}

#[test]
fn test_second_notification_for_same_note_does_nothing() {
    let storage = vault();
    storage.write(Path::new("once.md"), "").unwrap();
    let engine = engine(&storage, work_settings(), &RecordingNotifier::new());

    engine.dispatch(&FileCreated::new("once.md"));
    let first = storage.read_to_string(Path::new("once.md")).unwrap();

    let outcome = engine.dispatch(&FileCreated::new("once.md"));
    assert_eq!(outcome, Some(Outcome::Skipped(SkipReason::NotEmpty)));
    assert_eq!(storage.read_to_string(Path::new("once.md")).unwrap(), first);
}

/// Storage where someone else types into the note just before our write lands
struct RacingStorage {
    inner: MemoryStorage,
    typed: &'static str,
}

impl Storage for RacingStorage {
    fn read_to_string(&self, path: &Path) -> anyhow::Result<String> {
        self.inner.read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> anyhow::Result<()> {
        self.inner.write(path, contents)
    }

    fn process(&self, path: &Path, update: &mut dyn FnMut(&str) -> String) -> anyhow::Result<String> {
        self.inner.write(path, self.typed)?;
        self.inner.process(path, update)
    }

    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        self.inner.entry_kind(path)
    }

    fn walk_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        self.inner.walk_files()
    }

    fn walk_folders(&self) -> anyhow::Result<Vec<PathBuf>> {
        self.inner.walk_folders()
    }

    fn create_dir_all(&self, path: &Path) -> anyhow::Result<()> {
        self.inner.create_dir_all(path)
    }
}

#[test]
fn test_race_lost_keeps_other_writer_content() {
    let inner = vault();
    inner.write(Path::new("raced.md"), "").unwrap();
    let storage = RacingStorage {
        inner: inner.clone(),
        typed: "typed first",
    };
    let notices = RecordingNotifier::new();
    let engine = AutoTemplate::new(work_settings(), Box::new(storage))
        .with_notifier(Box::new(notices.clone()))
        .with_clock(fixed_clock());

    let outcome = engine.dispatch(&FileCreated::new("raced.md"));

    assert_eq!(outcome, Some(Outcome::RaceLost));
    assert_eq!(inner.read_to_string(Path::new("raced.md")).unwrap(), "typed first");
    assert!(notices.messages().is_empty());
}

#[test]
fn test_real_vault_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let storage = RealStorage::new(dir.path().to_path_buf());
    storage.create_dir_all(Path::new("Templates")).unwrap();
    storage.create_dir_all(Path::new("Journal")).unwrap();
    storage
        .write(Path::new("Templates/Journal.md"), "# {{date:dddd, MMMM Do}}\n")
        .unwrap();
    storage.write(Path::new("Journal/2024-03-15.md"), "").unwrap();

    let mut settings = Settings::default();
    settings.set_folder_template("Journal", "Templates/Journal.md");
    settings.save(&storage).unwrap();

    let engine = AutoTemplate::from_storage(Box::new(RealStorage::new(dir.path().to_path_buf())))
        .unwrap()
        .with_clock(fixed_clock());

    let event =
        FileCreated::from_fs_path(dir.path(), &dir.path().join("Journal/2024-03-15.md")).unwrap();
    let outcome = engine.handle_created(&event).unwrap();

    assert_eq!(
        outcome,
        Outcome::Written {
            template: "Templates/Journal.md".to_string()
        }
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("Journal/2024-03-15.md")).unwrap(),
        "# Friday, March 15th\n"
    );
}
