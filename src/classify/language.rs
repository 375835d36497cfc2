//! Extension to language table and the four-way file taxonomy.

use std::path::Path;

use serde::Serialize;

/// Language detected from a file extension.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    C,
    CHeader,
    Go,
    Rust,
    Php,
    Ruby,
    Scala,
    Kotlin,
    Swift,
    Json,
    Yaml,
    Toml,
    Xml,
    Html,
    Css,
    Markdown,
    Text,
    Sql,
    Shell,
    Batch,
    PowerShell,
    Unknown,
}

impl Language {
    /// Looks up a lower-case extension without the leading dot.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "py" => Self::Python,
            "js" => Self::JavaScript,
            "ts" => Self::TypeScript,
            "java" => Self::Java,
            "cpp" => Self::Cpp,
            "c" => Self::C,
            "h" => Self::CHeader,
            "go" => Self::Go,
            "rs" => Self::Rust,
            "php" => Self::Php,
            "rb" => Self::Ruby,
            "scala" => Self::Scala,
            "kt" => Self::Kotlin,
            "swift" => Self::Swift,
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            "toml" => Self::Toml,
            "xml" => Self::Xml,
            "html" => Self::Html,
            "css" => Self::Css,
            "md" => Self::Markdown,
            "txt" => Self::Text,
            "sql" => Self::Sql,
            "sh" => Self::Shell,
            "bat" => Self::Batch,
            "ps1" => Self::PowerShell,
            _ => Self::Unknown,
        }
    }

    /// Detects the language of `path` by its extension.
    #[must_use]
    pub fn of(path: &Path) -> Self {
        Self::from_extension(&extension(path))
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Java => "Java",
            Self::Cpp => "C++",
            Self::C => "C",
            Self::CHeader => "C/C++ Header",
            Self::Go => "Go",
            Self::Rust => "Rust",
            Self::Php => "PHP",
            Self::Ruby => "Ruby",
            Self::Scala => "Scala",
            Self::Kotlin => "Kotlin",
            Self::Swift => "Swift",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Toml => "TOML",
            Self::Xml => "XML",
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::Markdown => "Markdown",
            Self::Text => "Text",
            Self::Sql => "SQL",
            Self::Shell => "Shell Script",
            Self::Batch => "Batch",
            Self::PowerShell => "PowerShell",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse file category.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Code,
    Config,
    Documentation,
    Other,
}

const CODE_EXTENSIONS: &[&str] =
    &["py", "js", "ts", "java", "cpp", "c", "h", "go", "rs", "php", "rb", "scala", "kt"];
const CONFIG_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml", "ini", "cfg", "conf"];
const DOC_EXTENSIONS: &[&str] = &["md", "txt", "rst", "adoc"];
const DOC_NAMES: &[&str] = &["README", "LICENSE", "CHANGELOG"];

impl Category {
    /// Categorizes a file by its name alone.
    #[must_use]
    pub fn of(path: &Path) -> Self {
        let ext = extension(path);
        if CODE_EXTENSIONS.contains(&ext.as_str()) {
            Self::Code
        } else if CONFIG_EXTENSIONS.contains(&ext.as_str()) {
            Self::Config
        } else if DOC_EXTENSIONS.contains(&ext.as_str()) || is_doc_name(path) {
            Self::Documentation
        } else {
            Self::Other
        }
    }

    /// Label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Config => "config",
            Self::Documentation => "doc",
            Self::Other => "other",
        }
    }
}

fn is_doc_name(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().to_uppercase())
        .is_some_and(|n| DOC_NAMES.contains(&n.as_str()))
}

/// Lower-case extension without the dot, or empty.
#[must_use]
pub fn extension(path: &Path) -> String {
    path.extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default()
}
