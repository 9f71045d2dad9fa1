//! Vault path helpers
//!
//! Vault paths are `/`-separated strings relative to the vault root, with no
//! leading or trailing slash. These helpers never touch the filesystem.

/// Normalize a user-supplied vault path
///
/// Runs of `/` and `\` collapse to a single `/`, leading and trailing
/// slashes are trimmed, and non-breaking spaces become plain spaces.
/// An empty input stays empty.
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last_was_sep = false;

    for c in path.chars() {
        match c {
            '/' | '\\' => {
                if !last_was_sep {
                    out.push('/');
                }
                last_was_sep = true;
            }
            '\u{00A0}' | '\u{202F}' => {
                out.push(' ');
                last_was_sep = false;
            }
            _ => {
                out.push(c);
                last_was_sep = false;
            }
        }
    }

    out.trim_matches('/').to_string()
}

/// True when `path` is `prefix` itself or nested under it
pub fn is_within(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Folders containing `path`, deepest first
///
/// `"a/b/c.md"` yields `"a/b"` then `"a"`. A file at the vault root has
/// no containing folders.
pub fn ancestor_folders(path: &str) -> impl Iterator<Item = &str> {
    let mut current = parent(path);
    std::iter::from_fn(move || {
        let folder = current?;
        current = parent(folder);
        Some(folder)
    })
}

/// The containing folder of `path`, or `None` at the vault root
pub fn parent(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| &path[..idx]).filter(|p| !p.is_empty())
}

/// Final path segment
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Final segment without its extension
pub fn basename(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Extension of the final segment, without the dot
pub fn extension(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx + 1..],
        _ => "",
    }
}
