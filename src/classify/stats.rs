//! Per-language aggregates over analyzed code files.

use std::collections::BTreeMap;

use serde::Serialize;

use super::language::{Category, Language};
use super::{FileRecord, FileStatus};

/// Files reported as important, at most.
const IMPORTANT_LIMIT: usize = 15;
/// Useful lines above which a code file is important.
const IMPORTANT_LINES: usize = 50;

/// Totals for one language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LanguageStats {
    /// Analyzed files.
    pub files: usize,
    /// Non-blank lines.
    pub lines: usize,
    /// Function-like declarations.
    pub functions: usize,
    /// Class-like declarations.
    pub classes: usize,
}

/// A code file singled out by size or name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportantFile {
    /// Path relative to the root.
    pub path: String,
    /// Detected language.
    pub language: Language,
    /// Non-blank lines.
    pub lines: usize,
    /// Function-like declarations.
    pub functions: usize,
    /// Class-like declarations.
    pub classes: usize,
}

/// Code-structure aggregate for a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeStructure {
    /// Per-language totals.
    pub languages: BTreeMap<Language, LanguageStats>,
    /// Sum of useful lines.
    pub total_lines: usize,
    /// Sum of function counts.
    pub total_functions: usize,
    /// Sum of class counts.
    pub total_classes: usize,
    /// Largest or entry-looking code files, by line count.
    pub important: Vec<ImportantFile>,
}

impl CodeStructure {
    /// Aggregates analyzed code records; skipped and empty files are ignored.
    #[must_use]
    pub fn from_records(records: &[FileRecord]) -> Self {
        let mut structure = Self::default();
        for record in records {
            if record.category != Category::Code
                || !matches!(record.status, FileStatus::Analyzed { .. })
            {
                continue;
            }
            let stats = structure.languages.entry(record.language).or_default();
            stats.files += 1;
            stats.lines += record.useful_lines;
            stats.functions += record.functions;
            stats.classes += record.classes;
            structure.total_lines += record.useful_lines;
            structure.total_functions += record.functions;
            structure.total_classes += record.classes;

            let name = record.file_name().to_lowercase();
            if record.useful_lines > IMPORTANT_LINES || name.contains("main") || name.contains("app")
            {
                structure.important.push(ImportantFile {
                    path: record.path.clone(),
                    language: record.language,
                    lines: record.useful_lines,
                    functions: record.functions,
                    classes: record.classes,
                });
            }
        }
        structure.important.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.path.cmp(&b.path)));
        structure.important.truncate(IMPORTANT_LIMIT);
        structure
    }

    /// Languages ordered by descending line count.
    #[must_use]
    pub fn by_lines(&self) -> Vec<(Language, LanguageStats)> {
        let mut entries: Vec<(Language, LanguageStats)> =
            self.languages.iter().map(|(l, s)| (*l, *s)).collect();
        entries.sort_by(|a, b| b.1.lines.cmp(&a.1.lines).then(a.0.cmp(&b.0)));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::content::TextEncoding;
    use crate::classify::SkipReason;

    fn analyzed(path: &str, lines: usize, functions: usize) -> FileRecord {
        let mut r =
            FileRecord::new(path.to_string(), 100, FileStatus::Analyzed { encoding: TextEncoding::Utf8 });
        r.useful_lines = lines;
        r.functions = functions;
        r
    }

    #[test]
    fn aggregates_code_files_only() {
        let records = vec![
            analyzed("a.py", 10, 2),
            analyzed("b.py", 70, 5),
            analyzed("main.go", 5, 1),
            analyzed("README.md", 400, 0),
            FileRecord::new("huge.py".into(), 1, FileStatus::Skipped { reason: SkipReason::TooLarge }),
        ];
        let s = CodeStructure::from_records(&records);

        assert_eq!(s.languages.len(), 2);
        assert_eq!(s.languages[&Language::Python], LanguageStats { files: 2, lines: 80, functions: 7, classes: 0 });
        assert_eq!(s.total_lines, 85);
        assert_eq!(s.by_lines()[0].0, Language::Python);

        let important: Vec<&str> = s.important.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(important, ["b.py", "main.go"]);
    }
}
