use std::fs;
use std::ops::AddAssign;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::WalkError;
use crate::format::format_size;
use crate::targets::Targets;
use crate::throttle::Throttle;
use crate::walk::{log_outcome, walk_root, EntryKind, RootOutcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub file_count: u64,
    pub dir_count: u64,
    pub total_size: u64,
}

impl ScanResult {
    pub fn entries(&self) -> u64 {
        self.file_count + self.dir_count
    }

    pub fn is_empty(&self) -> bool {
        self.entries() == 0
    }

    pub fn size_human(&self) -> String {
        format_size(self.total_size)
    }
}

impl AddAssign for ScanResult {
    fn add_assign(&mut self, rhs: ScanResult) {
        self.file_count += rhs.file_count;
        self.dir_count += rhs.dir_count;
        self.total_size += rhs.total_size;
    }
}

/// Counts files, directories and bytes under one root.
///
/// Links to files are sized by their target. Other non-directory entries are
/// not counted.
///
/// The partial result is returned alongside the outcome, so an aborted root
/// still contributes what was counted before the failure.
pub fn scan_root(root: &Path, throttle: Throttle) -> (ScanResult, RootOutcome) {
    let mut result = ScanResult::default();

    let outcome = walk_root(root, |entry, kind| {
        match kind {
            EntryKind::File => {
                let metadata = fs::metadata(entry.path()).map_err(|source| WalkError::Metadata {
                    path: entry.path().to_path_buf(),
                    source,
                })?;
                result.file_count += 1;
                result.total_size += metadata.len();
            }
            EntryKind::Dir => result.dir_count += 1,
            EntryKind::Other => return Ok(()),
        }
        throttle.tick(result.entries());
        Ok(())
    });

    (result, outcome)
}

pub fn scan(targets: &Targets, throttle: Throttle) -> ScanResult {
    let mut total = ScanResult::default();

    for root in targets {
        let (result, outcome) = scan_root(root, throttle);
        log_outcome("scan", root, &outcome);
        total += result;
    }

    info!(
        files = total.file_count,
        dirs = total.dir_count,
        bytes = total.total_size,
        "scan finished"
    );
    total
}
