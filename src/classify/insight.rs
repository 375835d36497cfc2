//! Heuristic notes about a file's content and snippet extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use super::language::Language;

static JS_ARROW_ANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+\s*=>\s*").expect("valid arrow pattern"));
static JS_FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"function\s+\w+").expect("valid function pattern"));
static CLASS_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"class\s+\w+").expect("valid class pattern"));
static METHOD_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(public|private|protected).*?\w+\s*\(").expect("valid method pattern"));

const PYTHON_FRAMEWORKS: &[(&str, &str)] =
    &[("flask", "Flask"), ("django", "Django"), ("streamlit", "Streamlit"), ("fastapi", "FastAPI")];
const JS_FRAMEWORKS: &[(&str, &str)] =
    &[("react", "React"), ("vue", "Vue.js"), ("angular", "Angular"), ("node", "Node.js")];

/// Short observations about `text`, in a stable order.
#[must_use]
pub fn notes(language: Language, text: &str) -> Vec<String> {
    if language == Language::Text {
        return vec!["text or documentation file".to_string()];
    }
    let lines: Vec<&str> = text.split('\n').collect();
    let mut notes = match language {
        Language::Python => python_notes(text, &lines),
        Language::JavaScript => javascript_notes(text, &lines),
        Language::Json => json_notes(text),
        Language::Java | Language::Cpp | Language::Go => compiled_notes(text),
        _ => Vec::new(),
    };

    let code_lines = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with("//"))
        .count();
    if code_lines > 100 {
        notes.push("large file".to_string());
    } else if code_lines < 20 {
        notes.push("small file".to_string());
    }
    notes
}

fn python_notes(text: &str, lines: &[&str]) -> Vec<String> {
    let mut notes = Vec::new();
    let imports: Vec<String> = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| l.starts_with("import ") || l.starts_with("from "))
        .take(5)
        .filter_map(|l| l.split_whitespace().nth(1))
        .map(|module| module.split('.').next().unwrap_or(module).to_string())
        .take(3)
        .collect();
    if !imports.is_empty() {
        notes.push(format!("imports: {}", imports.join(", ")));
    }

    let functions = lines.iter().filter(|l| l.trim().starts_with("def ")).count();
    let classes = lines.iter().filter(|l| l.trim().starts_with("class ")).count();
    if functions > 0 {
        notes.push(format!("{functions} functions"));
    }
    if classes > 0 {
        notes.push(format!("{classes} classes"));
    }
    if let Some(found) = mentions(text, PYTHON_FRAMEWORKS) {
        notes.push(format!("frameworks: {found}"));
    }
    notes
}

fn javascript_notes(text: &str, lines: &[&str]) -> Vec<String> {
    let mut notes = Vec::new();
    let functions = JS_FUNCTION.find_iter(text).count();
    let arrows = JS_ARROW_ANY.find_iter(text).count();
    let consts = lines.iter().filter(|l| l.trim().starts_with("const ")).count();
    if functions > 0 {
        notes.push(format!("{functions} declared functions"));
    }
    if arrows > 0 {
        notes.push(format!("{arrows} arrow functions"));
    }
    if consts > 0 {
        notes.push(format!("{consts} constants"));
    }
    let lower = text.to_lowercase();
    notes.extend(
        JS_FRAMEWORKS
            .iter()
            .filter(|(needle, _)| lower.contains(needle))
            .map(|(_, name)| (*name).to_string()),
    );
    notes
}

fn json_notes(text: &str) -> Vec<String> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Object(map)) => {
            let keys: Vec<&str> = map.keys().take(5).map(String::as_str).collect();
            vec![format!("top-level keys: {}", keys.join(", "))]
        }
        Ok(_) => Vec::new(),
        Err(_) => vec!["possible JSON syntax error".to_string()],
    }
}

fn compiled_notes(text: &str) -> Vec<String> {
    let mut notes = Vec::new();
    let classes = CLASS_KEYWORD.find_iter(text).count();
    let methods = METHOD_LIKE.find_iter(text).count();
    if classes > 0 {
        notes.push(format!("{classes} classes"));
    }
    if methods > 0 {
        notes.push(format!("{methods} methods"));
    }
    notes
}

fn mentions(text: &str, catalog: &[(&str, &str)]) -> Option<String> {
    let lower = text.to_lowercase();
    let found: Vec<&str> =
        catalog.iter().filter(|(needle, _)| lower.contains(needle)).map(|(_, name)| *name).collect();
    (!found.is_empty()).then(|| found.join(", "))
}

/// Up to `max_lines` lines starting at an entry-point marker, else the first
/// non-blank lines.
#[must_use]
pub fn snippet(language: Language, text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let marker = match language {
        Language::Python => lines.iter().position(|l| {
            let t = l.trim();
            l.contains("if __name__") || t.starts_with("class ") || t.starts_with("def main")
        }),
        Language::JavaScript => lines.iter().position(|l| {
            l.contains("export") || l.contains("function main") || l.contains("module.exports")
        }),
        _ => None,
    };
    if let Some(start) = marker {
        return lines[start..].iter().take(max_lines).copied().collect::<Vec<_>>().join("\n");
    }
    lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .take(max_lines)
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}
