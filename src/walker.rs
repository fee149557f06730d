//! Pre-order directory traversal with name-based pruning and suffix filtering.

use std::ffi::{OsStr, OsString};
use std::path::Path;

use tracing::{trace, warn};
use walkdir::{DirEntry, WalkDir};

/// Which files to keep and which directory names to prune.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    extensions: Vec<String>,
    excluded_dirs: Vec<OsString>,
}

impl FileFilter {
    pub fn new(
        extensions: impl IntoIterator<Item = impl Into<String>>,
        excluded_dirs: impl IntoIterator<Item = impl Into<OsString>>,
    ) -> Self {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
            excluded_dirs: excluded_dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Case-sensitive suffix match on the raw file name.
    pub fn matches_file(&self, name: &OsStr) -> bool {
        let name = name.as_encoded_bytes();
        self.extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_bytes()))
    }

    pub fn is_excluded_dir(&self, name: &OsStr) -> bool {
        self.excluded_dirs.iter().any(|d| d == name)
    }
}

/// Walk `dir` depth-first. At every level the matching files are visited
/// first, then the non-excluded subdirectories are descended in turn.
///
/// Excluded directories are dropped before recursion, so nothing below them is
/// ever listed. Directories that cannot be listed are skipped with a warning;
/// errors returned by `visit` stop the walk and are passed through.
pub fn walk<E>(
    dir: &Path,
    filter: &FileFilter,
    sort: bool,
    visit: &mut dyn FnMut(&Path) -> Result<(), E>,
) -> Result<(), E> {
    // Files before directories; the stable sort keeps enumeration order
    // within each group unless names are asked for.
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .sort_by(move |a, b| {
            let files_first = a.file_type().is_dir().cmp(&b.file_type().is_dir());
            if sort {
                files_first.then_with(|| a.file_name().cmp(b.file_name()))
            } else {
                files_first
            }
        });

    let entries = walker.into_iter().filter_entry(|e| {
        let pruned =
            e.depth() > 0 && e.file_type().is_dir() && filter.is_excluded_dir(e.file_name());
        if pruned {
            trace!("Pruned {}", e.path().display());
        }
        !pruned
    });

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    "Skipping unreadable directory {}: {}",
                    e.path().unwrap_or(dir).display(),
                    e
                );
                continue;
            }
        };
        if !is_file_like(&entry) {
            continue;
        }
        if filter.matches_file(entry.file_name()) {
            visit(entry.path())?;
        }
    }
    Ok(())
}

/// Regular files and links that do not point at a directory. Linked
/// directories are neither entered nor emitted.
fn is_file_like(entry: &DirEntry) -> bool {
    let ft = entry.file_type();
    if ft.is_dir() {
        return false;
    }
    !(ft.is_symlink() && entry.path().is_dir())
}
