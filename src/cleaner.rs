use std::fs;
use std::ops::AddAssign;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::targets::Targets;
use crate::throttle::Throttle;
use crate::walk::{log_outcome, walk_root, EntryKind, RootOutcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanResult {
    pub deleted_files: u64,
    pub deleted_dirs: u64,
}

impl CleanResult {
    pub fn total_deleted(&self) -> u64 {
        self.deleted_files + self.deleted_dirs
    }
}

impl AddAssign for CleanResult {
    fn add_assign(&mut self, rhs: CleanResult) {
        self.deleted_files += rhs.deleted_files;
        self.deleted_dirs += rhs.deleted_dirs;
    }
}

/// Deletes everything below `root`, leaving `root` itself in place.
///
/// Links and special files are unlinked, never followed. Entries that cannot
/// be removed are skipped without being counted. A directory holding such an
/// entry stays behind since it is not empty.
pub fn clean_root(root: &Path, throttle: Throttle) -> (CleanResult, RootOutcome) {
    let mut result = CleanResult::default();

    let outcome = walk_root(root, |entry, kind| {
        let path = entry.path();
        let removed = match kind {
            EntryKind::File | EntryKind::Other => fs::remove_file(path),
            EntryKind::Dir => fs::remove_dir(path),
        };

        match removed {
            Ok(()) => {
                match kind {
                    EntryKind::File | EntryKind::Other => result.deleted_files += 1,
                    EntryKind::Dir => result.deleted_dirs += 1,
                }
                throttle.tick(result.total_deleted());
            }
            Err(err) => debug!(path = %path.display(), error = %err, "skipping entry"),
        }
        Ok(())
    });

    (result, outcome)
}

pub fn clean(targets: &Targets, throttle: Throttle) -> CleanResult {
    let mut total = CleanResult::default();

    for root in targets {
        let (result, outcome) = clean_root(root, throttle);
        log_outcome("clean", root, &outcome);
        total += result;
    }

    info!(
        files = total.deleted_files,
        dirs = total.deleted_dirs,
        "clean finished"
    );
    total
}
