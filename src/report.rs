//! Plain-text reports over classifier output.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::classify::directory::DirectorySummary;
use crate::classify::key_files::KeyCategory;
use crate::classify::stats::CodeStructure;
use crate::classify::language::Language;
use crate::classify::{FileDetail, FileStatus, KeyFileEntry, RepositoryIndex};

/// Files at or under this many lines get no separate snippet.
const SNIPPET_MIN_LINES: usize = 5;

/// Formats a byte count as `B`, `KB`, or `MB` (integer division).
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    if bytes < KB {
        format!("{bytes}B")
    } else if bytes < KB * KB {
        format!("{}KB", bytes / KB)
    } else {
        format!("{}MB", bytes / (KB * KB))
    }
}

/// Shallow listing of one directory.
#[must_use]
pub fn render_directory_summary(summary: &DirectorySummary) -> String {
    let title = if summary.path.is_empty() { "(root)" } else { summary.path.as_str() };
    let mut out = format!("## Directory: {title}\n\n");
    if summary.is_empty() {
        out.push_str("Empty directory\n");
        return out;
    }

    if !summary.dirs.is_empty() {
        out.push_str("### Directories\n");
        for d in &summary.dirs {
            match d.children {
                Some(n) => {
                    let _ = writeln!(out, "- {}/ ({n} items)", d.name);
                }
                None => {
                    let _ = writeln!(out, "- {}/", d.name);
                }
            }
        }
        out.push('\n');
    }
    for (heading, files, with_language) in [
        ("Code", &summary.code, true),
        ("Configuration", &summary.config, false),
        ("Documentation", &summary.docs, false),
        ("Other", &summary.other, false),
    ] {
        if files.is_empty() {
            continue;
        }
        let _ = writeln!(out, "### {heading}");
        for f in files {
            if with_language {
                let _ = writeln!(out, "- {} ({}) - {}", f.name, format_size(f.size), f.language);
            } else {
                let _ = writeln!(out, "- {} ({})", f.name, format_size(f.size));
            }
        }
        out.push('\n');
    }
    if summary.remainder > 0 {
        let _ = writeln!(out, "... and {} more items", summary.remainder);
    }
    out
}

/// Key files grouped by category.
#[must_use]
pub fn render_key_files(groups: &BTreeMap<KeyCategory, Vec<KeyFileEntry>>) -> String {
    let mut out = String::from("## Key files\n\n");
    if groups.values().all(Vec::is_empty) {
        out.push_str("No obvious key files found\n");
        return out;
    }
    for category in KeyCategory::ALL {
        let Some(entries) = groups.get(&category).filter(|e| !e.is_empty()) else {
            continue;
        };
        let _ = writeln!(out, "### {}", category.title());
        for e in entries {
            let _ = writeln!(out, "- {} ({}, {})", e.path, format_size(e.size), e.language);
        }
        out.push('\n');
    }
    out
}

/// Per-language statistics and important files.
#[must_use]
pub fn render_code_structure(structure: &CodeStructure) -> String {
    let mut out = String::from("## Code structure\n\n");
    let _ = writeln!(out, "- Lines of code: {}", structure.total_lines);
    let _ = writeln!(out, "- Functions: {}", structure.total_functions);
    let _ = writeln!(out, "- Classes: {}", structure.total_classes);
    let _ = writeln!(out, "- Languages: {}\n", structure.languages.len());

    for (language, stats) in structure.by_lines() {
        let _ = writeln!(
            out,
            "### {language}\n- Files: {}\n- Lines: {}\n- Functions: {}\n- Classes: {}\n",
            stats.files, stats.lines, stats.functions, stats.classes
        );
    }
    if !structure.important.is_empty() {
        out.push_str("### Important files\n");
        for f in &structure.important {
            let _ = write!(out, "- {} ({}, {} lines", f.path, f.language, f.lines);
            if f.functions > 0 {
                let _ = write!(out, ", {} functions", f.functions);
            }
            if f.classes > 0 {
                let _ = write!(out, ", {} classes", f.classes);
            }
            out.push_str(")\n");
        }
    }
    out
}

/// Detail report for one file.
#[must_use]
pub fn render_file_detail(detail: &FileDetail) -> String {
    let mut out = format!("## File: {}\n\n", detail.path);
    let _ = writeln!(out, "- Size: {}", format_size(detail.size));
    let _ = writeln!(out, "- Language: {}", detail.language);
    match &detail.status {
        FileStatus::Empty => {
            out.push_str("- Status: empty file\n");
            return out;
        }
        FileStatus::Skipped { reason } => {
            let _ = writeln!(out, "- Status: skipped ({reason})");
            return out;
        }
        FileStatus::Analyzed { encoding } => {
            let _ = writeln!(out, "- Lines: {} ({} non-blank)", detail.total_lines, detail.useful_lines);
            let _ = writeln!(out, "- Encoding: {encoding}");
        }
    }
    if !detail.notes.is_empty() {
        let _ = writeln!(out, "- Notes: {}", detail.notes.join("; "));
    }
    let fence = detail.path.rsplit_once('.').map_or("text", |(_, ext)| ext);
    let _ = write!(out, "\n```{fence}\n{}", detail.excerpt);
    if detail.truncated {
        out.push_str("\n... [truncated]");
    }
    out.push_str("\n```\n");
    if detail.language != Language::Text
        && detail.total_lines > SNIPPET_MIN_LINES
        && !detail.snippet.is_empty()
    {
        let _ = write!(out, "\n### Relevant snippet\n\n```{fence}\n{}\n```\n", detail.snippet);
    }
    out
}

/// The three repository-wide reports, one after another.
#[must_use]
pub fn render_index(index: &RepositoryIndex) -> String {
    let mut out = String::new();
    if let Some(root) = index.directories.get("") {
        out.push_str(&render_directory_summary(root));
        out.push('\n');
    }
    out.push_str(&render_key_files(&index.key_files));
    out.push('\n');
    out.push_str(&render_code_structure(&index.structure));
    if index.partial {
        out.push_str("\nNote: the walk was incomplete; this index is partial.\n");
    }
    out
}
