use crate::error::{ExtractorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Language of an analyzed file, detected from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    JavaScript,
    TypeScript,
    Tsx,
    Python,
    Rust,
    Go,
    Java,
    C,
    Cpp,
}

impl LanguageId {
    /// Language used when an extension is not recognized
    pub const DEFAULT: LanguageId = LanguageId::JavaScript;

    pub const ALL: [LanguageId; 9] = [
        LanguageId::JavaScript,
        LanguageId::TypeScript,
        LanguageId::Tsx,
        LanguageId::Python,
        LanguageId::Rust,
        LanguageId::Go,
        LanguageId::Java,
        LanguageId::C,
        LanguageId::Cpp,
    ];

    /// Map an extension (without the dot) to a language, if recognized
    pub fn from_extension(ext: &str) -> Option<Self> {
        let language = match ext.to_ascii_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => LanguageId::JavaScript,
            "ts" | "mts" | "cts" => LanguageId::TypeScript,
            "tsx" => LanguageId::Tsx,
            "py" | "pyw" | "pyi" => LanguageId::Python,
            "rs" => LanguageId::Rust,
            "go" => LanguageId::Go,
            "java" => LanguageId::Java,
            "c" | "h" => LanguageId::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => LanguageId::Cpp,
            _ => return None,
        };
        Some(language)
    }

    /// Recognize a file by its name; `None` for unknown or missing extensions
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageId::JavaScript => "javascript",
            LanguageId::TypeScript => "typescript",
            LanguageId::Tsx => "tsx",
            LanguageId::Python => "python",
            LanguageId::Rust => "rust",
            LanguageId::Go => "go",
            LanguageId::Java => "java",
            LanguageId::C => "c",
            LanguageId::Cpp => "cpp",
        }
    }

    /// Whether a tree-sitter grammar is bundled for this language
    pub fn has_grammar(self) -> bool {
        matches!(
            self,
            LanguageId::JavaScript
                | LanguageId::TypeScript
                | LanguageId::Tsx
                | LanguageId::Python
                | LanguageId::Rust
        )
    }

    /// Source extensions recognized for this language, canonical first
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            LanguageId::JavaScript => &["js", "jsx", "mjs", "cjs"],
            LanguageId::TypeScript => &["ts", "mts", "cts"],
            LanguageId::Tsx => &["tsx"],
            LanguageId::Python => &["py", "pyw", "pyi"],
            LanguageId::Rust => &["rs"],
            LanguageId::Go => &["go"],
            LanguageId::Java => &["java"],
            LanguageId::C => &["c", "h"],
            LanguageId::Cpp => &["cpp", "cc", "cxx", "hpp", "hh", "hxx"],
        }
    }

    /// File stems that stand for their directory when a module path names it
    pub fn index_stems(self) -> &'static [&'static str] {
        match self {
            LanguageId::JavaScript | LanguageId::TypeScript | LanguageId::Tsx => &["index"],
            LanguageId::Python => &["__init__"],
            LanguageId::Rust => &["mod", "lib"],
            _ => &[],
        }
    }

    /// Whether this language belongs to the ECMAScript family
    pub fn is_ecmascript(self) -> bool {
        matches!(
            self,
            LanguageId::JavaScript | LanguageId::TypeScript | LanguageId::Tsx
        )
    }

    /// Get Tree-sitter language instance
    pub(crate) fn tree_sitter_language(self) -> Result<tree_sitter::Language> {
        match self {
            LanguageId::JavaScript => Ok(tree_sitter_javascript::LANGUAGE.into()),
            LanguageId::TypeScript => Ok(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            LanguageId::Tsx => Ok(tree_sitter_typescript::LANGUAGE_TSX.into()),
            LanguageId::Python => Ok(tree_sitter_python::LANGUAGE.into()),
            LanguageId::Rust => Ok(tree_sitter_rust::LANGUAGE.into()),
            _ => Err(ExtractorError::unsupported_language(self.as_str())),
        }
    }
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the language of a file from its name.
///
/// Total: unknown or missing extensions fall back to [`LanguageId::DEFAULT`].
pub fn detect_language(filename: &str) -> LanguageId {
    LanguageId::from_path(filename).unwrap_or(LanguageId::DEFAULT)
}
