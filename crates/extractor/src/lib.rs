//! # Canvas Extractor
//!
//! Syntax-driven structure extraction for source files.
//!
//! ## Architecture
//!
//! ```text
//! Source File
//!     │
//!     ├──> Language Detection (from extension, configurable fallback)
//!     │
//!     ├──> Grammar Registry → cached tree-sitter grammar
//!     │
//!     ├──> Parser Session → owned SyntaxTree (normalized NodeKind)
//!     │
//!     └──> Fact Extractor (single pre-order pass)
//!          ├─> Symbols (function, class, variable, interface, type)
//!          ├─> Imports / Exports
//!          └─> Call sites / Symbol references
//! ```
//!
//! ## Example
//!
//! ```rust
//! use canvas_extractor::{Analyzer, AnalyzerConfig};
//!
//! let mut analyzer = Analyzer::new(AnalyzerConfig::default()).unwrap();
//! analyzer.initialize().unwrap();
//!
//! let code = r#"
//! import { add } from './util';
//! export function main() { return add(1, 2); }
//! "#;
//!
//! let structure = analyzer.analyze_file(code, "main.js").unwrap();
//! assert_eq!(structure.imports, vec!["./util"]);
//! assert_eq!(structure.call_sites[0].callee_name, "add");
//! ```

mod analyzer;
mod builtins;
mod config;
mod error;
mod extractor;
mod language;
mod registry;
mod session;
mod syntax;
mod types;

pub use analyzer::{Analyzer, BatchAnalysis};
pub use builtins::{BUILTIN_FUNCTIONS, BUILTIN_METHODS};
pub use config::AnalyzerConfig;
pub use error::{ExtractorError, Result};
pub use extractor::{FactExtractor, Facts};
pub use language::{detect_language, LanguageId};
pub use registry::{Grammar, GrammarRegistry};
pub use session::ParserSession;
pub use syntax::{NodeId, NodeKind, Point, SyntaxNode, SyntaxTree};
pub use types::{
    file_name, CallSite, FileStructure, FileStructureMap, ReferenceKind, Symbol, SymbolKind,
    SymbolReference,
};
