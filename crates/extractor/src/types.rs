use crate::language::LanguageId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Kind of a declared symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Class,
    Variable,
    Interface,
    Type,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
            SymbolKind::Variable => "variable",
            SymbolKind::Interface => "interface",
            SymbolKind::Type => "type",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a symbol is referenced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Call,
    Instantiation,
    Usage,
    Inheritance,
}

/// A named declaration site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,

    /// Start line (1-indexed)
    pub start_line: usize,
    /// Start column (0-indexed, bytes)
    pub start_column: usize,

    /// Present only for constructs with a body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
}

impl Symbol {
    /// Whether `line` falls inside this symbol's span (open-ended without an end line)
    pub fn spans_line(&self, line: usize) -> bool {
        line >= self.start_line && self.end_line.map_or(true, |end| line <= end)
    }
}

/// A call expression attributed to a callee name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSite {
    pub callee_name: String,
    pub line: usize,
    pub column: usize,
    pub caller_file: String,
}

/// A non-call relationship to a named symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolReference {
    pub symbol_name: String,
    pub symbol_kind: SymbolKind,
    pub referenced_in_file: String,
    pub line: usize,
    pub column: usize,
    pub reference_kind: ReferenceKind,
}

/// Everything extracted from one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStructure {
    pub path: String,
    pub language: LanguageId,
    pub symbols: Vec<Symbol>,
    /// Module paths as written in source, unresolved
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub call_sites: Vec<CallSite>,
    pub symbol_references: Vec<SymbolReference>,
}

impl FileStructure {
    /// File name component of the path
    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }

    /// Symbols of one kind, in source order
    pub fn symbols_of(&self, kind: SymbolKind) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(move |symbol| symbol.kind == kind)
    }

    /// First symbol with the given name
    pub fn find_symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|symbol| symbol.name == name)
    }
}

/// Analyzed files keyed by path, in analysis order
pub type FileStructureMap = IndexMap<String, FileStructure>;

/// Last component of a `/`- or `\`-separated path
pub fn file_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path)
}
