//! # Canvas Graph
//!
//! Cross-file relationships between analyzed source files, laid out for a canvas.
//!
//! ## Features
//!
//! - **Import resolution** - match raw import paths against the file selection
//! - **Usage lookup** - find callers, instantiations and type uses of a symbol
//! - **Usage overlay** - add caller nodes for one query, retract them for the next
//! - **Layout** - connected components placed left to right
//!
//! ## Architecture
//!
//! ```text
//! FileStructureMap
//!     │
//!     ├──> Resolver
//!     │      ├─ Import edges (file → file)
//!     │      └─ Symbol usages grouped by caller context
//!     │
//!     ├──> CanvasGraph
//!     │      ├─ Nodes: files + caller contexts
//!     │      └─ Edges: imports, calls, references (tagged by query)
//!     │
//!     └──> Layout (petgraph components)
//!            ├─ Singletons in a row
//!            ├─ Small components in a circle
//!            └─ Large components in a grid
//! ```

mod canvas;
mod error;
mod layout;
mod resolver;
mod types;

pub use canvas::CanvasGraph;
pub use error::{GraphError, Result};
pub use layout::{layout, partition, LayoutConfig};
pub use resolver::{resolve_import_edges, resolve_symbol_usages};
pub use types::{
    CallerContext, CallerNode, EdgeKind, GraphEdge, GraphNode, NodePayload, Occurrence, Position,
    SymbolKey, UsageGroup, UsageResolution,
};
