use std::path::PathBuf;

use tracing::info;

use crate::config::{self, EndPolicySetting};
use crate::library::{FileEntry, scan};
use crate::playlist::{ControllerOptions, EndPolicy};

pub fn end_policy_from(setting: EndPolicySetting) -> EndPolicy {
    match setting {
        EndPolicySetting::Wrap => EndPolicy::Wrap,
        EndPolicySetting::StopAtEnd => EndPolicy::StopAtEnd,
    }
}

pub fn controller_options(settings: &config::Settings) -> ControllerOptions {
    ControllerOptions {
        end_policy: end_policy_from(settings.playback.end_policy),
        volume: settings.playback.volume,
    }
}

/// Directories named on the command line, or the current directory.
pub fn startup_dirs(args: &[String]) -> Vec<PathBuf> {
    let dirs: Vec<PathBuf> = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .map(PathBuf::from)
        .collect();
    if !dirs.is_empty() {
        return dirs;
    }
    vec![std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
}

/// Scan every directory in order and concatenate the results.
pub fn scan_dirs(dirs: &[PathBuf], settings: &config::LibrarySettings) -> Vec<FileEntry> {
    let mut entries = Vec::new();
    for dir in dirs {
        let found = scan(dir, settings);
        info!(dir = %dir.display(), files = found.len(), "scanned directory");
        entries.extend(found);
    }
    entries
}
