use canvas_extractor::{FileStructure, Symbol, SymbolKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canvas coordinates of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Identity of a queried symbol
///
/// Every node and edge added by a usage query carries the key of the symbol
/// it was added for, so the query can later be retracted precisely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolKey {
    /// File declaring the symbol
    pub file: String,
    pub name: String,
    pub kind: SymbolKind,
    /// Declaration line (1-indexed)
    pub line: usize,
}

impl SymbolKey {
    pub fn new(file: impl Into<String>, symbol: &Symbol) -> Self {
        Self {
            file: file.into(),
            name: symbol.name.clone(),
            kind: symbol.kind,
            line: symbol.start_line,
        }
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}@{}", self.file, self.kind, self.name, self.line)
    }
}

/// Scope a usage is attributed to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum CallerContext {
    /// Innermost enclosing function
    Function { name: String, start_line: usize },
    /// Top level of the file
    File,
}

/// Synthetic node standing for a function that uses a queried symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerNode {
    pub function: String,
    pub file: String,
    pub start_line: usize,
    /// Number of uses inside this function
    pub occurrences: usize,
}

/// What a node stands for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodePayload {
    File(FileStructure),
    Caller(CallerNode),
}

/// Node on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// File path for file nodes, synthetic id for caller nodes
    pub id: String,
    pub position: Position,
    pub payload: NodePayload,

    /// Query that added this node; `None` for base file nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<SymbolKey>,
}

impl GraphNode {
    pub fn file(structure: FileStructure) -> Self {
        Self {
            id: structure.path.clone(),
            position: Position::default(),
            payload: NodePayload::File(structure),
            origin: None,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.payload, NodePayload::File(_))
    }
}

/// Type of relationship between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Source file imports target file
    Imports,
    /// Caller invokes a function declared in the target file
    Calls,
    /// Caller instantiates, extends or names a type declared in the target file
    References,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Imports => "imports",
            EdgeKind::Calls => "calls",
            EdgeKind::References => "references",
        }
    }
}

/// Directed edge on the canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Query that added this edge; `None` for import edges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<SymbolKey>,
}

/// Line/column of one matched use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occurrence {
    pub line: usize,
    pub column: usize,
}

/// Uses of a symbol attributed to one caller context in one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageGroup {
    pub context: CallerContext,
    pub file: String,
    pub occurrences: Vec<Occurrence>,
}

/// All uses of a symbol across a file selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageResolution {
    pub subject: SymbolKey,
    /// Groups in order of first occurrence
    pub groups: Vec<UsageGroup>,
}

impl UsageResolution {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn occurrence_count(&self) -> usize {
        self.groups.iter().map(|group| group.occurrences.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_symbol_key_display() {
        let symbol = Symbol {
            name: "add".into(),
            kind: SymbolKind::Function,
            start_line: 4,
            start_column: 0,
            end_line: Some(6),
            end_column: Some(1),
        };
        let key = SymbolKey::new("src/util.js", &symbol);
        assert_eq!(key.to_string(), "src/util.js:function:add@4");
    }

    #[test]
    fn test_serialized_shapes() {
        let context = serde_json::to_value(CallerContext::Function {
            name: "g".into(),
            start_line: 2,
        })
        .unwrap();
        assert_eq!(
            context,
            serde_json::json!({"scope": "function", "name": "g", "start_line": 2})
        );

        let edge = GraphEdge {
            id: "imports:a->b#0".into(),
            source: "a".into(),
            target: "b".into(),
            kind: EdgeKind::Imports,
            label: None,
            origin: None,
        };
        assert_eq!(
            serde_json::to_value(&edge).unwrap(),
            serde_json::json!({"id": "imports:a->b#0", "source": "a", "target": "b", "kind": "imports"})
        );
    }
}
