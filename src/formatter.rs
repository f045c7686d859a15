//! External formatter discovery and invocation.
//!
//! Locates the `dart` executable on `PATH` and runs `dart format <dir>` once
//! after rewriting. Output is captured; stderr is only surfaced when the
//! formatter exits unsuccessfully.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Name of the formatter executable looked up on `PATH`.
pub const DART: &str = "dart";

/// Failure to run the formatter.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("executable not found at '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("failed to run '{}': {source}", path.display())]
    Spawn { path: PathBuf, source: io::Error },

    #[error("'dart format' failed with exit code {}:\n{stderr}", display_code(.code))]
    Failed { code: Option<i32>, stderr: String },
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string())
}

/// Searches `PATH` for an executable named `name`.
///
/// On Windows a `.bat` sibling of the resolved executable is preferred when
/// present.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let search_path = std::env::var_os("PATH")?;
    let found = find_in(name, &search_path)?;
    if cfg!(windows) {
        Some(prefer_batch_sibling(found))
    } else {
        Some(found)
    }
}

/// Searches the directories of `search_path` (in `PATH` format) for `name`.
pub fn find_in(name: &str, search_path: &OsStr) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    std::env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .find_map(|dir| {
            candidate_names(name)
                .into_iter()
                .map(|candidate| dir.join(candidate))
                .find(|path| is_executable(path))
        })
}

fn candidate_names(name: &str) -> Vec<String> {
    if cfg!(windows) {
        vec![
            format!("{name}.exe"),
            format!("{name}.bat"),
            format!("{name}.cmd"),
            name.to_string(),
        ]
    } else {
        vec![name.to_string()]
    }
}

/// Returns `<path>.bat` if that file exists, otherwise `path`.
pub fn prefer_batch_sibling(path: PathBuf) -> PathBuf {
    let mut bat = path.clone().into_os_string();
    bat.push(".bat");
    let bat = PathBuf::from(bat);
    if bat.is_file() { bat } else { path }
}

fn is_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .is_ok_and(|meta| meta.permissions().mode() & 0o111 != 0)
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Runs `<executable> format <directory>` and waits for it to finish.
pub fn format_directory(executable: &Path, directory: &Path) -> Result<(), FormatError> {
    let output = Command::new(executable)
        .arg("format")
        .arg(directory)
        .output()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => FormatError::NotFound(executable.to_path_buf()),
            _ => FormatError::Spawn {
                path: executable.to_path_buf(),
                source,
            },
        })?;

    if !output.status.success() {
        return Err(FormatError::Failed {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        });
    }

    Ok(())
}
