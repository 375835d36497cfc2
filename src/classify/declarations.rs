//! Approximate function and class counts by per-language pattern matching.
//!
//! These are line-oriented heuristics, not parsers. Nested or unusual
//! declarations can be over- or under-counted.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::language::Language;

/// A pair of counters for one language.
#[derive(Clone, Copy)]
pub struct DeclarationCounter {
    functions: fn(&str) -> usize,
    classes: fn(&str) -> usize,
}

/// Function and class counts for one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Declarations {
    /// Function-like declarations.
    pub functions: usize,
    /// Class-like declarations.
    pub classes: usize,
}

static PY_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*def\s+\w+").expect("valid python def pattern"));
static PY_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*class\s+\w+").expect("valid python class pattern"));
static JS_FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"function\s+\w+").expect("valid js function pattern"));
static JS_ARROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+\s*=\s*\([^)]*\)\s*=>").expect("valid js arrow pattern"));
static CLASS_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"class\s+\w+").expect("valid class pattern"));
static C_FAMILY_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(public|private|protected).*?\w+\s*\([^)]*\)\s*\{")
        .expect("valid c-family method pattern")
});
static GO_FUNC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"func\s+\w+").expect("valid go func pattern"));

fn none(_: &str) -> usize {
    0
}

static COUNTERS: Lazy<HashMap<Language, DeclarationCounter>> = Lazy::new(|| {
    let c_family = DeclarationCounter {
        functions: |s| C_FAMILY_METHOD.find_iter(s).count(),
        classes: |s| CLASS_KEYWORD.find_iter(s).count(),
    };
    HashMap::from([
        (
            Language::Python,
            DeclarationCounter {
                functions: |s| PY_DEF.find_iter(s).count(),
                classes: |s| PY_CLASS.find_iter(s).count(),
            },
        ),
        (
            Language::JavaScript,
            DeclarationCounter {
                functions: |s| JS_FUNCTION.find_iter(s).count() + JS_ARROW.find_iter(s).count(),
                classes: |s| CLASS_KEYWORD.find_iter(s).count(),
            },
        ),
        (Language::Java, c_family),
        (Language::Cpp, c_family),
        (
            Language::Go,
            DeclarationCounter { functions: |s| GO_FUNC.find_iter(s).count(), classes: none },
        ),
    ])
});

/// Counts declarations in `text`; languages without a counter yield zeros.
#[must_use]
pub fn count(language: Language, text: &str) -> Declarations {
    COUNTERS.get(&language).map_or_else(Declarations::default, |counter| Declarations {
        functions: (counter.functions)(text),
        classes: (counter.classes)(text),
    })
}

/// Whether `language` has declaration counters.
#[must_use]
pub fn is_supported(language: Language) -> bool {
    COUNTERS.contains_key(&language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_counts_indented_defs_and_classes() {
        let src = "import os\n\nclass A:\n    def f(self):\n        pass\n\ndef g():\n    pass\n";
        assert_eq!(count(Language::Python, src), Declarations { functions: 2, classes: 1 });
    }

    #[test]
    fn javascript_counts_functions_and_arrows() {
        let src = "function a() {}\nconst b = (x, y) => x + y;\nclass C {}\n";
        assert_eq!(count(Language::JavaScript, src), Declarations { functions: 2, classes: 1 });
    }

    #[test]
    fn java_and_cpp_share_the_c_family_counters() {
        let src = "public class Foo {\n  private int bar(int x) {\n    return x;\n  }\n}\n";
        let java = count(Language::Java, src);
        assert_eq!(java, Declarations { functions: 1, classes: 1 });
        assert_eq!(count(Language::Cpp, src), java);
    }

    #[test]
    fn go_counts_funcs_only() {
        let src = "package main\n\nfunc main() {}\nfunc helper(x int) int { return x }\n";
        assert_eq!(count(Language::Go, src), Declarations { functions: 2, classes: 0 });
    }

    #[test]
    fn unsupported_languages_count_nothing() {
        assert_eq!(count(Language::Rust, "fn main() {}"), Declarations::default());
        assert!(!is_supported(Language::TypeScript));
        assert!(is_supported(Language::Go));
    }
}
