//! Classifier: walks a working copy and builds a [`RepositoryIndex`].
//!
//! Per-file failures never abort the walk. They are recorded on the file's
//! [`FileRecord`] and counted in [`RepositoryIndex::errors`].

pub mod cache;
pub mod content;
pub mod declarations;
pub mod directory;
pub mod insight;
pub mod key_files;
pub mod language;
pub mod ranking;
pub mod stats;

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

use crate::acquire::WorkingCopy;
use crate::config::ClassifyConfig;
use cache::ContentCache;
use content::{Decoded, TextEncoding};
use directory::DirectorySummary;
use key_files::KeyCategory;
use language::{Category, Language};
use ranking::RankedFile;
use stats::CodeStructure;

/// Members kept per key-file category.
pub const KEY_FILES_PER_CATEGORY: usize = 12;
/// Lines in an extracted snippet.
const SNIPPET_LINES: usize = 10;

/// Why a file's content was not analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Larger than the applicable ceiling.
    TooLarge,
    /// No configured encoding accepted the bytes.
    Undecodable,
    /// A NUL byte appeared in the sniffed head.
    Binary,
    /// The file could not be opened.
    PermissionDenied,
    /// The file vanished or never existed.
    NotFound,
    /// The path is not a regular file.
    NotAFile,
    /// Any other I/O failure.
    Io(String),
}

impl SkipReason {
    fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::Io(err.to_string()),
        }
    }

    /// Whether this skip counts toward the error counter.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Undecodable | Self::PermissionDenied | Self::NotFound | Self::Io(_))
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLarge => f.write_str("too large"),
            Self::Undecodable => f.write_str("undecodable"),
            Self::Binary => f.write_str("binary"),
            Self::PermissionDenied => f.write_str("permission denied"),
            Self::NotFound => f.write_str("not found"),
            Self::NotAFile => f.write_str("not a regular file"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

/// What happened when a file's content was examined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FileStatus {
    /// Decoded and counted.
    Analyzed {
        /// Encoding that decoded the content.
        encoding: TextEncoding,
    },
    /// Zero bytes long.
    Empty,
    /// Content not analyzed.
    Skipped {
        /// Why.
        reason: SkipReason,
    },
}

/// One regular file under the working-copy root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Path relative to the root, `/`-separated.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Language from the extension.
    pub language: Language,
    /// Category from the name.
    pub category: Category,
    /// Analysis outcome.
    #[serde(flatten)]
    pub status: FileStatus,
    /// Non-blank lines; zero unless analyzed.
    pub useful_lines: usize,
    /// Function-like declarations; zero unless analyzed.
    pub functions: usize,
    /// Class-like declarations; zero unless analyzed.
    pub classes: usize,
}

impl FileRecord {
    /// A record with language and category derived from `path` and zero counts.
    #[must_use]
    pub fn new(path: String, size: u64, status: FileStatus) -> Self {
        let p = Path::new(&path);
        let (language, category) = (Language::of(p), Category::of(p));
        Self { path, size, language, category, status, useful_lines: 0, functions: 0, classes: 0 }
    }

    /// Final path component.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// The skip reason, if the file was skipped.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match &self.status {
            FileStatus::Skipped { reason } => Some(reason),
            _ => None,
        }
    }
}

/// A key file with enough metadata to report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyFileEntry {
    /// Path relative to the root.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Detected language.
    pub language: Language,
}

/// Everything the classifier learned about a working copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryIndex {
    /// Root that was walked.
    pub root: PathBuf,
    /// Every non-pruned regular file, in walk order.
    pub records: Vec<FileRecord>,
    /// Shallow summary of every visited directory, keyed by relative path.
    pub directories: BTreeMap<String, DirectorySummary>,
    /// Key files by category.
    pub key_files: BTreeMap<KeyCategory, Vec<KeyFileEntry>>,
    /// Candidates for deep analysis.
    pub ranked: Vec<RankedFile>,
    /// Per-language aggregates.
    pub structure: CodeStructure,
    /// I/O and encoding failures met during the walk.
    pub errors: usize,
    /// The walk stopped early or the root could not be read.
    pub partial: bool,
}

impl RepositoryIndex {
    /// Records whose content was analyzed.
    #[must_use]
    pub fn analyzed(&self) -> usize {
        self.records.iter().filter(|r| matches!(r.status, FileStatus::Analyzed { .. })).count()
    }

    /// Records that were skipped.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.records.iter().filter(|r| r.skip_reason().is_some()).count()
    }

    /// Looks up a record by relative path.
    #[must_use]
    pub fn record(&self, path: &str) -> Option<&FileRecord> {
        self.records.iter().find(|r| r.path == path)
    }
}

/// Content-level detail for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDetail {
    /// Path relative to the root.
    pub path: String,
    /// Size in bytes, zero if unknown.
    pub size: u64,
    /// Detected language.
    pub language: Language,
    /// Outcome of the read.
    #[serde(flatten)]
    pub status: FileStatus,
    /// Newline count plus one.
    pub total_lines: usize,
    /// Non-blank lines.
    pub useful_lines: usize,
    /// Heuristic observations.
    pub notes: Vec<String>,
    /// Leading content.
    pub excerpt: String,
    /// Whether [`Self::excerpt`] was cut short.
    pub truncated: bool,
    /// Lines around an entry-point marker.
    pub snippet: String,
}

impl FileDetail {
    fn bare(path: &str, size: u64, status: FileStatus) -> Self {
        Self {
            path: path.to_string(),
            size,
            language: Language::of(Path::new(path)),
            status,
            total_lines: 0,
            useful_lines: 0,
            notes: Vec::new(),
            excerpt: String::new(),
            truncated: false,
            snippet: String::new(),
        }
    }
}

/// Indexes one working copy.
pub struct Classifier {
    root: PathBuf,
    config: ClassifyConfig,
    cache: ContentCache<String, FileDetail>,
    errors: usize,
}

impl Classifier {
    /// Creates a classifier rooted at `root`.
    #[must_use]
    pub fn new(root: &Path, config: ClassifyConfig) -> Self {
        let cache = ContentCache::new(config.cache_capacity);
        Self { root: root.to_path_buf(), config, cache, errors: 0 }
    }

    /// Creates a classifier for an acquired working copy.
    #[must_use]
    pub fn for_copy(copy: &WorkingCopy, config: ClassifyConfig) -> Self {
        Self::new(copy.root(), config)
    }

    /// Root being classified.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Failures seen so far by this classifier, across walks and reads.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Entries currently held in the detail cache.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Walks the tree and builds the index. Always returns an index.
    pub fn classify(&mut self) -> RepositoryIndex {
        let mut index = RepositoryIndex { root: self.root.clone(), ..RepositoryIndex::default() };

        if let Err(e) = std::fs::read_dir(&self.root) {
            tracing::warn!(root = %self.root.display(), "cannot read root: {e}");
            index.errors = 1;
            index.partial = true;
            self.errors += 1;
            return index;
        }

        let mut visited_dirs: Vec<String> = Vec::new();
        let excluded = &self.config.excluded_dirs;
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_pruned(e, excluded));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("walk error: {e}");
                    index.errors += 1;
                    continue;
                }
            };
            let rel = relative(&self.root, entry.path());
            if entry.file_type().is_dir() {
                if visited_dirs.len() >= self.config.max_dirs {
                    tracing::warn!(limit = self.config.max_dirs, "directory cap reached, index is partial");
                    index.partial = true;
                    break;
                }
                visited_dirs.push(rel);
                continue;
            }
            if !entry.file_type().is_file() || entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let record = self.analyze(entry.path(), rel);
            if record.skip_reason().is_some_and(SkipReason::is_error) {
                index.errors += 1;
            }
            index.records.push(record);
        }

        for rel in visited_dirs {
            match directory::summarize(&self.root, &rel, self.config.directory_scan_limit) {
                Ok(summary) => {
                    index.directories.insert(rel, summary);
                }
                Err(e) => {
                    tracing::warn!(dir = %rel, "cannot summarize directory: {e}");
                    index.errors += 1;
                }
            }
        }

        index.key_files = key_entries(&index.records);
        index.ranked = ranking::rank(&index.records, self.config.top_n);
        index.structure = CodeStructure::from_records(&index.records);
        self.errors += index.errors;

        tracing::info!(
            records = index.records.len(),
            analyzed = index.analyzed(),
            skipped = index.skipped(),
            errors = index.errors,
            partial = index.partial,
            "classification finished"
        );
        index
    }

    fn analyze(&self, path: &Path, rel: String) -> FileRecord {
        let skipped = |rel: String, size: u64, reason: SkipReason| {
            tracing::debug!(path = %rel, %reason, "file skipped");
            FileRecord::new(rel, size, FileStatus::Skipped { reason })
        };

        let size = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => return skipped(rel, 0, SkipReason::from_io(&e)),
        };
        if size == 0 {
            return FileRecord::new(rel, 0, FileStatus::Empty);
        }
        if size > self.config.structural_ceiling_bytes {
            return skipped(rel, size, SkipReason::TooLarge);
        }
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %rel, "cannot read file: {e}");
                return skipped(rel, size, SkipReason::from_io(&e));
            }
        };
        match content::decode(&bytes, &self.config.encodings, self.config.binary_sniff_chars) {
            Decoded::Undecodable => skipped(rel, size, SkipReason::Undecodable),
            Decoded::Binary => skipped(rel, size, SkipReason::Binary),
            Decoded::Text { text, encoding } => {
                let mut record = FileRecord::new(rel, size, FileStatus::Analyzed { encoding });
                record.useful_lines = content::useful_lines(&text);
                if record.category == Category::Code
                    && declarations::is_supported(record.language)
                {
                    let counts = declarations::count(record.language, &text);
                    record.functions = counts.functions;
                    record.classes = counts.classes;
                }
                record
            }
        }
    }

    /// Reads one file for a detail report. Results for analyzed files are
    /// cached for the life of this classifier, first come first served.
    pub fn read_file(&mut self, rel: &str) -> FileDetail {
        let rel = rel.trim_start_matches('/');
        if let Some(hit) = self.cache.get(&rel.to_string()) {
            return hit.clone();
        }
        let detail = self.read_uncached(rel);
        if let FileStatus::Skipped { reason } = &detail.status {
            if reason.is_error() {
                self.errors += 1;
            }
        }
        if matches!(detail.status, FileStatus::Analyzed { .. })
            && self.cache.admit(rel.to_string(), detail.clone())
        {
            tracing::debug!(path = rel, "cached file detail");
        }
        detail
    }

    fn read_uncached(&self, rel: &str) -> FileDetail {
        if Path::new(rel).components().any(|c| matches!(c, Component::ParentDir)) {
            return FileDetail::bare(rel, 0, FileStatus::Skipped { reason: SkipReason::NotFound });
        }
        let path = self.root.join(rel);
        let skipped = |size, reason| FileDetail::bare(rel, size, FileStatus::Skipped { reason });

        let meta = match std::fs::metadata(&path) {
            Ok(meta) => meta,
            Err(e) => return skipped(0, SkipReason::from_io(&e)),
        };
        if !meta.is_file() {
            return skipped(0, SkipReason::NotAFile);
        }
        let size = meta.len();
        if size > self.config.content_ceiling_bytes {
            return skipped(size, SkipReason::TooLarge);
        }
        if size == 0 {
            return FileDetail::bare(rel, 0, FileStatus::Empty);
        }
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => return skipped(size, SkipReason::from_io(&e)),
        };
        match content::decode(&bytes, &self.config.encodings, self.config.binary_sniff_chars) {
            Decoded::Undecodable => skipped(size, SkipReason::Undecodable),
            Decoded::Binary => skipped(size, SkipReason::Binary),
            Decoded::Text { text, encoding } => {
                let mut detail = FileDetail::bare(rel, size, FileStatus::Analyzed { encoding });
                let (excerpt, truncated) = content::excerpt(&text, self.config.excerpt_chars);
                detail.total_lines = content::total_lines(&text);
                detail.useful_lines = content::useful_lines(&text);
                detail.notes = insight::notes(detail.language, &text);
                detail.snippet = insight::snippet(detail.language, &text, SNIPPET_LINES);
                detail.excerpt = excerpt;
                detail.truncated = truncated;
                detail
            }
        }
    }

    /// Detail reports for the ranked candidates of `index`, in rank order.
    pub fn detail_ranked(&mut self, index: &RepositoryIndex) -> Vec<FileDetail> {
        index.ranked.iter().map(|r| self.read_file(&r.path)).collect()
    }
}

fn is_pruned(entry: &DirEntry, excluded: &[String]) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || excluded.iter().any(|x| *x == name)
}

fn relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn key_entries(records: &[FileRecord]) -> BTreeMap<KeyCategory, Vec<KeyFileEntry>> {
    let by_path: HashMap<&str, &FileRecord> =
        records.iter().map(|r| (r.path.as_str(), r)).collect();
    key_files::group(records.iter().map(|r| r.path.as_str()), KEY_FILES_PER_CATEGORY)
        .into_iter()
        .map(|(category, paths)| {
            let entries = paths
                .into_iter()
                .filter_map(|p| by_path.get(p.as_str()).copied())
                .map(|r| KeyFileEntry { path: r.path.clone(), size: r.size, language: r.language })
                .collect();
            (category, entries)
        })
        .collect()
}
