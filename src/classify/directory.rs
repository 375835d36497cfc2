//! Shallow, non-recursive summary of one directory's children.

use std::io;
use std::path::Path;

use serde::Serialize;

use super::language::{Category, Language};

const MAX_DIRS: usize = 15;
const MAX_CODE: usize = 20;
const MAX_CONFIG: usize = 10;
const MAX_DOCS: usize = 10;
const MAX_OTHER: usize = 15;

/// A subdirectory in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedDir {
    /// Directory name.
    pub name: String,
    /// Number of children, when readable.
    pub children: Option<usize>,
}

/// A file in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedFile {
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Detected language.
    pub language: Language,
}

/// One directory's immediate children, partitioned and capped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectorySummary {
    /// Path relative to the root; empty for the root itself.
    pub path: String,
    /// Subdirectories.
    pub dirs: Vec<ListedDir>,
    /// Code files.
    pub code: Vec<ListedFile>,
    /// Configuration files.
    pub config: Vec<ListedFile>,
    /// Documentation files.
    pub docs: Vec<ListedFile>,
    /// Everything else.
    pub other: Vec<ListedFile>,
    /// Visible children not shown because of the caps or the scan limit.
    pub remainder: usize,
}

impl DirectorySummary {
    /// Entries shown across all groups.
    #[must_use]
    pub fn shown(&self) -> usize {
        self.dirs.len() + self.code.len() + self.config.len() + self.docs.len() + self.other.len()
    }

    /// Whether the directory had no visible children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shown() == 0 && self.remainder == 0
    }
}

/// Summarizes the children of `root/rel`, inspecting at most `scan_limit`
/// of them in name order. Hidden entries are ignored.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed.
pub fn summarize(root: &Path, rel: &str, scan_limit: usize) -> io::Result<DirectorySummary> {
    let dir = if rel.is_empty() { root.to_path_buf() } else { root.join(rel) };
    let mut children: Vec<std::fs::DirEntry> = std::fs::read_dir(&dir)?
        .filter_map(Result::ok)
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .collect();
    children.sort_by_key(std::fs::DirEntry::file_name);
    let visible = children.len();

    let mut summary = DirectorySummary { path: rel.to_string(), ..DirectorySummary::default() };
    for entry in children.into_iter().take(scan_limit) {
        let name = entry.file_name().to_string_lossy().into_owned();
        let Ok(meta) = std::fs::metadata(entry.path()) else {
            continue;
        };
        if meta.is_dir() {
            let children = std::fs::read_dir(entry.path()).ok().map(Iterator::count);
            summary.dirs.push(ListedDir { name, children });
            continue;
        }
        let path = Path::new(&name);
        let file = ListedFile { language: Language::of(path), size: meta.len(), name: name.clone() };
        match Category::of(path) {
            Category::Code => summary.code.push(file),
            Category::Config => summary.config.push(file),
            Category::Documentation => summary.docs.push(file),
            Category::Other => summary.other.push(file),
        }
    }

    summary.dirs.truncate(MAX_DIRS);
    summary.code.truncate(MAX_CODE);
    summary.config.truncate(MAX_CONFIG);
    summary.docs.truncate(MAX_DOCS);
    summary.other.truncate(MAX_OTHER);
    summary.remainder = visible - summary.shown();
    Ok(summary)
}
