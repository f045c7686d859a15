//! Source file collection.
//!
//! Recursively walks a root directory and collects every file whose name ends
//! with a given extension. A root that does not exist, is not a directory, or
//! cannot be read yields no files rather than an error; callers treat an empty
//! result as "nothing to do".
//!
//! Symlinks to files are collected under their link path (broken links too, so
//! their read failure is reported later). Symlinked directories are not
//! descended.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extension targeted by the rewrite rules.
pub const DART_EXTENSION: &str = ".dart";

/// Collects all `.dart` files under `root`.
pub fn collect_dart_files(root: &Path) -> Vec<PathBuf> {
    collect_files(root, DART_EXTENSION)
}

/// Collects all regular files under `root` whose name ends with `extension`.
///
/// Entries are visited in file-name order within each directory, so the result
/// is stable across runs. Unreadable entries are skipped.
pub fn collect_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }

    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| is_file_like(entry) && has_extension(entry, extension))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn is_file_like(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && !entry.path().is_dir())
}

fn has_extension(entry: &walkdir::DirEntry, extension: &str) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.ends_with(extension))
}
