//! Catalog of well-known important files, grouped into seven categories.

use std::collections::BTreeMap;

use serde::Serialize;

/// Importance category of a key file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCategory {
    /// Program entry points.
    EntryPoints,
    /// Package manifests and dependency lists.
    ProjectConfig,
    /// READMEs, licenses, and docs directories.
    Documentation,
    /// Build and deployment descriptors.
    BuildDeploy,
    /// Runtime and tooling configuration.
    EnvironmentConfig,
    /// Test sources and test configuration.
    Tests,
    /// Stylesheets, templates, and static assets.
    Frontend,
}

impl KeyCategory {
    /// Every category, in report order.
    pub const ALL: [Self; 7] = [
        Self::EntryPoints,
        Self::ProjectConfig,
        Self::Documentation,
        Self::BuildDeploy,
        Self::EnvironmentConfig,
        Self::Tests,
        Self::Frontend,
    ];

    /// Report heading.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::EntryPoints => "Entry points",
            Self::ProjectConfig => "Project configuration",
            Self::Documentation => "Documentation",
            Self::BuildDeploy => "Build and deploy",
            Self::EnvironmentConfig => "Environment configuration",
            Self::Tests => "Tests",
            Self::Frontend => "Interface / frontend",
        }
    }
}

/// How a catalog pattern is tested. File-name comparisons are case-insensitive.
#[derive(Debug, Clone, Copy)]
enum Pattern {
    Exact(&'static str),
    Prefix(&'static str),
    Suffix(&'static str),
    Contains(&'static str),
    /// A path segment of the containing directory.
    Dir(&'static str),
}

impl Pattern {
    fn matches(self, name: &str, dirs: &[String]) -> bool {
        match self {
            Self::Exact(p) => name == p,
            Self::Prefix(p) => name.starts_with(p),
            Self::Suffix(p) => name.ends_with(p),
            Self::Contains(p) => name.contains(p),
            Self::Dir(p) => dirs.iter().any(|d| d == p),
        }
    }
}

const CATALOG: [(KeyCategory, &[Pattern]); 7] = [
    (
        KeyCategory::EntryPoints,
        &[
            Pattern::Exact("main.py"),
            Pattern::Exact("index.js"),
            Pattern::Exact("app.py"),
            Pattern::Exact("server.py"),
            Pattern::Exact("main.go"),
            Pattern::Exact("index.html"),
            Pattern::Exact("app.js"),
            Pattern::Exact("__init__.py"),
            Pattern::Exact("main.java"),
            Pattern::Exact("index.php"),
            Pattern::Exact("main.rs"),
        ],
    ),
    (
        KeyCategory::ProjectConfig,
        &[
            Pattern::Exact("package.json"),
            Pattern::Exact("requirements.txt"),
            Pattern::Exact("pom.xml"),
            Pattern::Exact("cargo.toml"),
            Pattern::Exact("go.mod"),
            Pattern::Exact("setup.py"),
            Pattern::Exact("pyproject.toml"),
            Pattern::Exact("composer.json"),
            Pattern::Exact("build.gradle"),
        ],
    ),
    (
        KeyCategory::Documentation,
        &[
            Pattern::Exact("readme.md"),
            Pattern::Exact("readme.rst"),
            Pattern::Exact("readme.txt"),
            Pattern::Exact("changelog.md"),
            Pattern::Prefix("license"),
            Pattern::Exact("contributing.md"),
            Pattern::Exact("install.md"),
            Pattern::Dir("docs"),
        ],
    ),
    (
        KeyCategory::BuildDeploy,
        &[
            Pattern::Exact("makefile"),
            Pattern::Prefix("dockerfile"),
            Pattern::Exact("docker-compose.yml"),
            Pattern::Exact("docker-compose.yaml"),
            Pattern::Exact("jenkinsfile"),
            Pattern::Exact("build.gradle"),
            Pattern::Exact("webpack.config.js"),
        ],
    ),
    (
        KeyCategory::EnvironmentConfig,
        &[
            Pattern::Exact("config.py"),
            Pattern::Exact("settings.py"),
            Pattern::Exact("config.json"),
            Pattern::Exact("webpack.config.js"),
            Pattern::Exact("tsconfig.json"),
            Pattern::Exact("pytest.ini"),
            Pattern::Prefix("env."),
        ],
    ),
    (
        KeyCategory::Tests,
        &[
            Pattern::Prefix("test_"),
            Pattern::Suffix("_test.py"),
            Pattern::Suffix("_test.go"),
            Pattern::Contains(".test."),
            Pattern::Contains(".spec."),
            Pattern::Dir("tests"),
            Pattern::Dir("test"),
            Pattern::Exact("pytest.ini"),
            Pattern::Exact("jest.config.js"),
        ],
    ),
    (
        KeyCategory::Frontend,
        &[
            Pattern::Exact("style.css"),
            Pattern::Exact("main.css"),
            Pattern::Exact("app.css"),
            Pattern::Exact("index.html"),
            Pattern::Contains("template"),
            Pattern::Dir("static"),
            Pattern::Dir("public"),
            Pattern::Dir("assets"),
            Pattern::Dir("templates"),
        ],
    ),
];

/// Categories matched by the file at `rel_path` (forward-slash separated).
#[must_use]
pub fn categories_for(rel_path: &str) -> Vec<KeyCategory> {
    let lower = rel_path.to_lowercase();
    let mut segments: Vec<String> = lower.split('/').map(str::to_string).collect();
    let name = segments.pop().unwrap_or_default();
    CATALOG
        .iter()
        .filter(|(_, patterns)| patterns.iter().any(|p| p.matches(&name, &segments)))
        .map(|(category, _)| *category)
        .collect()
}

/// Groups paths into categories; each keeps at most `cap` members.
///
/// Members are kept in path order, so the result does not depend on the
/// order paths are supplied in.
#[must_use]
pub fn group<'a, I>(paths: I, cap: usize) -> BTreeMap<KeyCategory, Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sorted: Vec<&str> = paths.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut groups: BTreeMap<KeyCategory, Vec<String>> = BTreeMap::new();
    for path in sorted {
        for category in categories_for(path) {
            let members = groups.entry(category).or_default();
            if members.len() < cap {
                members.push(path.to_string());
            }
        }
    }
    groups
}
