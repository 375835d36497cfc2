//! Priority ranking of files for deep analysis.

use serde::Serialize;

use super::language::{Category, Language};
use super::FileRecord;

/// Name fragments that mark a file as high value (matched case-insensitively).
const HIGH_VALUE_PATTERNS: &[&str] = &[
    "main.py",
    "app.py",
    "server.py",
    "index.js",
    "main.go",
    "readme.md",
    "setup.py",
    "package.json",
    "requirements.txt",
];

/// Priority for a high-value name match.
pub const HIGH_PRIORITY: u8 = 10;
/// Priority for a code file above [`MEDIUM_SIZE_THRESHOLD`].
pub const MEDIUM_PRIORITY: u8 = 5;
/// Bytes a code file must exceed to earn [`MEDIUM_PRIORITY`].
pub const MEDIUM_SIZE_THRESHOLD: u64 = 1000;

/// A file selected for deep analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedFile {
    /// Path relative to the working-copy root.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Detected language.
    pub language: Language,
    /// 10 or 5.
    pub priority: u8,
}

/// Priority of a file from its name, category, and size; 0 means unranked.
#[must_use]
pub fn priority(file_name: &str, category: Category, size: u64) -> u8 {
    let lower = file_name.to_lowercase();
    if HIGH_VALUE_PATTERNS.iter().any(|p| lower.contains(p)) {
        HIGH_PRIORITY
    } else if category == Category::Code && size > MEDIUM_SIZE_THRESHOLD {
        MEDIUM_PRIORITY
    } else {
        0
    }
}

/// Top `n` records by descending (priority, size), ties broken by path.
#[must_use]
pub fn rank(records: &[FileRecord], n: usize) -> Vec<RankedFile> {
    let mut ranked: Vec<RankedFile> = records
        .iter()
        .filter_map(|r| {
            let p = priority(r.file_name(), r.category, r.size);
            (p > 0).then(|| RankedFile {
                path: r.path.clone(),
                size: r.size,
                language: r.language,
                priority: p,
            })
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.priority.cmp(&a.priority).then(b.size.cmp(&a.size)).then_with(|| a.path.cmp(&b.path))
    });
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::FileStatus;

    fn record(path: &str, size: u64) -> FileRecord {
        FileRecord::new(path.to_string(), size, FileStatus::Empty)
    }

    #[test]
    fn priority_tiers() {
        assert_eq!(priority("README.md", Category::Documentation, 10), HIGH_PRIORITY);
        assert_eq!(priority("index.js", Category::Code, 10), HIGH_PRIORITY);
        assert_eq!(priority("lib.rs", Category::Code, 1001), MEDIUM_PRIORITY);
        assert_eq!(priority("lib.rs", Category::Code, 1000), 0);
        assert_eq!(priority("notes.txt", Category::Documentation, 50_000), 0);
    }

    #[test]
    fn ranking_orders_by_priority_then_size_then_path() {
        let records = vec![
            record("src/big.rs", 9000),
            record("README.md", 100),
            record("src/b.rs", 2000),
            record("src/a.rs", 2000),
            record("notes.txt", 5000),
            record("src/main.py", 300),
        ];
        let ranked = rank(&records, 10);
        let paths: Vec<&str> = ranked.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["src/main.py", "README.md", "src/big.rs", "src/a.rs", "src/b.rs"]);
    }

    #[test]
    fn ranking_is_bounded() {
        let records: Vec<FileRecord> =
            (0..30).map(|i| record(&format!("src/m{i}.rs"), 2000 + i)).collect();
        let ranked = rank(&records, 15);
        assert_eq!(ranked.len(), 15);
        assert_eq!(ranked[0].path, "src/m29.rs");
    }
}
