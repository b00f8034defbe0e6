//! Depth-first, children-before-parent traversal shared by scan and clean.
//!
//! A root is walked with its contents yielded before the directory holding
//! them, so a directory is only visited once everything below it has been
//! handled. The root itself is never yielded. Siblings come in file name
//! order.

use std::path::Path;

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::WalkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file, or a link resolving to one.
    File,
    Dir,
    /// Links to directories, dangling links, sockets, fifos and devices.
    Other,
}

impl EntryKind {
    /// Classifies an entry without descending through links. A link only
    /// counts as a file when its target is a regular file.
    pub fn of(entry: &DirEntry) -> EntryKind {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            EntryKind::Dir
        } else if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_symlink() && entry.path().is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// How the walk of a single root ended.
#[derive(Debug)]
pub enum RootOutcome {
    /// The root does not exist or is not a directory.
    Missing,
    Completed,
    /// Traversal stopped early. Whatever the visitor counted so far stands.
    Aborted(WalkError),
}

impl RootOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RootOutcome::Completed)
    }
}

/// Walks every descendant of `root`, children before parent.
///
/// An error from the iterator or from `visit` stops this root and is returned
/// as [`RootOutcome::Aborted`].
pub fn walk_root<F>(root: &Path, mut visit: F) -> RootOutcome
where
    F: FnMut(&DirEntry, EntryKind) -> Result<(), WalkError>,
{
    if !root.is_dir() {
        debug!(root = %root.display(), "root missing, skipping");
        return RootOutcome::Missing;
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                return RootOutcome::Aborted(WalkError::Traversal {
                    root: root.to_path_buf(),
                    source,
                });
            }
        };

        if let Err(err) = visit(&entry, EntryKind::of(&entry)) {
            return RootOutcome::Aborted(err);
        }
    }

    RootOutcome::Completed
}

pub(crate) fn log_outcome(op: &str, root: &Path, outcome: &RootOutcome) {
    match outcome {
        RootOutcome::Missing => {}
        RootOutcome::Completed => debug!(op, root = %root.display(), "root done"),
        RootOutcome::Aborted(err) => {
            warn!(
                op,
                root = %root.display(),
                entry = ?err.path(),
                error = %err,
                "root walk aborted, keeping partial result"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn visited(root: &Path) -> (RootOutcome, Vec<(PathBuf, EntryKind)>) {
        let mut seen = Vec::new();
        let outcome = walk_root(root, |entry, kind| {
            seen.push((entry.path().strip_prefix(root).unwrap().to_path_buf(), kind));
            Ok(())
        });
        (outcome, seen)
    }

    #[test]
    fn missing_root_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let (outcome, seen) = visited(&tmp.path().join("nope"));
        assert!(matches!(outcome, RootOutcome::Missing));
        assert!(seen.is_empty());
    }

    #[test]
    fn file_root_counts_as_missing() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain");
        fs::write(&file, b"x").unwrap();
        let (outcome, _) = visited(&file);
        assert!(matches!(outcome, RootOutcome::Missing));
    }

    #[test]
    fn children_come_before_parent_and_root_is_not_yielded() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        fs::write(tmp.path().join("a/b/leaf.txt"), b"leaf").unwrap();
        fs::write(tmp.path().join("a/top.txt"), b"top").unwrap();

        let (outcome, seen) = visited(tmp.path());
        assert!(outcome.is_completed());
        assert_eq!(seen.len(), 4);

        let pos = |p: &str| seen.iter().position(|(path, _)| path == Path::new(p)).unwrap();
        assert!(pos("a/b/leaf.txt") < pos("a/b"));
        assert!(pos("a/b") < pos("a"));
        assert!(pos("a/top.txt") < pos("a"));
        assert!(seen.iter().all(|(path, _)| !path.as_os_str().is_empty()));
        assert_eq!(seen[pos("a")].1, EntryKind::Dir);
        assert_eq!(seen[pos("a/top.txt")].1, EntryKind::File);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_aborts_root() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("m_locked");
        fs::write(tmp.path().join("a_first"), b"x").unwrap();
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("inner"), b"x").unwrap();
        fs::write(tmp.path().join("z_after"), b"x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let enforced = fs::read_dir(&locked).is_err();
        let (outcome, seen) = visited(tmp.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if !enforced {
            return;
        }

        assert!(matches!(outcome, RootOutcome::Aborted(WalkError::Traversal { .. })));
        let names: Vec<_> = seen.iter().map(|(path, _)| path.clone()).collect();
        assert_eq!(names, vec![PathBuf::from("a_first")]);
    }

    #[test]
    fn visitor_error_aborts_root() {
        let tmp = TempDir::new().unwrap();
        for name in ["one", "two", "three"] {
            fs::write(tmp.path().join(name), b"x").unwrap();
        }

        let mut calls = 0;
        let outcome = walk_root(tmp.path(), |entry, _| {
            calls += 1;
            Err(WalkError::Metadata {
                path: entry.path().to_path_buf(),
                source: std::io::Error::other("boom"),
            })
        });

        assert_eq!(calls, 1);
        assert!(matches!(outcome, RootOutcome::Aborted(WalkError::Metadata { .. })));
    }
}
