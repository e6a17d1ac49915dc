use crate::error::{GraphError, Result};
use crate::layout::{layout, LayoutConfig};
use crate::resolver::resolve_import_edges;
use crate::types::{
    CallerContext, CallerNode, EdgeKind, GraphEdge, GraphNode, NodePayload, Position, SymbolKey,
    UsageResolution,
};
use canvas_extractor::{FileStructureMap, SymbolKind};
use serde::Serialize;

/// Node and edge set of one analysis pass plus at most one usage overlay
#[derive(Debug, Clone, Default, Serialize)]
pub struct CanvasGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    active: Option<SymbolKey>,
}

impl CanvasGraph {
    /// One file node per structure (map order) and the resolved import edges
    pub fn build(structures: &FileStructureMap, candidates: &[String]) -> Self {
        let nodes: Vec<GraphNode> = structures
            .values()
            .cloned()
            .map(GraphNode::file)
            .collect();
        let edges = resolve_import_edges(structures, candidates);

        log::info!(
            "Built canvas graph: {} files, {} import edges",
            nodes.len(),
            edges.len()
        );

        Self {
            nodes,
            edges,
            active: None,
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Key of the usage overlay currently shown
    pub fn active_query(&self) -> Option<&SymbolKey> {
        self.active.as_ref()
    }

    /// Overlay the usages of one symbol, replacing the previous overlay.
    ///
    /// Function-level groups get a caller node; file-level groups start
    /// their edge at the caller's file node. Every edge ends at the file
    /// node declaring the subject.
    pub fn show_usages(&mut self, resolution: &UsageResolution) -> Result<()> {
        let subject = &resolution.subject;
        if self.node(&subject.file).is_none() {
            return Err(GraphError::UnknownNode(subject.file.clone()));
        }

        self.clear_usages();

        let kind = match subject.kind {
            SymbolKind::Function => EdgeKind::Calls,
            _ => EdgeKind::References,
        };

        for group in &resolution.groups {
            let caller = match &group.context {
                CallerContext::Function { name, start_line } => {
                    let id = format!("usage:{subject}:{}:{name}@{start_line}", group.file);
                    self.nodes.push(GraphNode {
                        id: id.clone(),
                        position: Position::default(),
                        payload: NodePayload::Caller(CallerNode {
                            function: name.clone(),
                            file: group.file.clone(),
                            start_line: *start_line,
                            occurrences: group.occurrences.len(),
                        }),
                        origin: Some(subject.clone()),
                    });
                    id
                }
                CallerContext::File => group.file.clone(),
            };

            self.edges.push(GraphEdge {
                id: format!("usage:{}:{caller}->{}", kind.as_str(), subject.file),
                source: caller,
                target: subject.file.clone(),
                kind,
                label: Some(format!("{} ({})", subject.name, group.occurrences.len())),
                origin: Some(subject.clone()),
            });
        }

        log::info!(
            "Showing {} usage groups for {}",
            resolution.groups.len(),
            subject
        );
        self.active = Some(subject.clone());
        Ok(())
    }

    /// Remove every node and edge added for `key`; returns how many were removed
    pub fn retract(&mut self, key: &SymbolKey) -> usize {
        let before = self.nodes.len() + self.edges.len();
        self.nodes.retain(|node| node.origin.as_ref() != Some(key));
        self.edges.retain(|edge| edge.origin.as_ref() != Some(key));
        if self.active.as_ref() == Some(key) {
            self.active = None;
        }
        before - self.nodes.len() - self.edges.len()
    }

    /// Retract the active usage overlay, if any
    pub fn clear_usages(&mut self) {
        if let Some(key) = self.active.take() {
            let removed = self.retract(&key);
            log::debug!("Retracted {removed} overlay items for {key}");
        }
    }

    /// Recompute every node position
    pub fn relayout(&mut self, config: &LayoutConfig) {
        self.nodes = layout(&self.nodes, &self.edges, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Occurrence, UsageGroup};
    use canvas_extractor::{FileStructure, LanguageId};
    use pretty_assertions::assert_eq;

    fn structure(path: &str, imports: &[&str]) -> FileStructure {
        FileStructure {
            path: path.to_string(),
            language: LanguageId::JavaScript,
            symbols: Vec::new(),
            imports: imports.iter().map(|i| i.to_string()).collect(),
            exports: Vec::new(),
            call_sites: Vec::new(),
            symbol_references: Vec::new(),
        }
    }

    fn canvas() -> CanvasGraph {
        let structures: FileStructureMap = [
            structure("main.js", &["./util"]),
            structure("util.js", &[]),
            structure("other.js", &[]),
        ]
        .into_iter()
        .map(|s| (s.path.clone(), s))
        .collect();
        let candidates: Vec<String> = structures.keys().cloned().collect();
        CanvasGraph::build(&structures, &candidates)
    }

    fn key(file: &str, name: &str, kind: SymbolKind) -> SymbolKey {
        SymbolKey {
            file: file.to_string(),
            name: name.to_string(),
            kind,
            line: 1,
        }
    }

    fn resolution(subject: SymbolKey, groups: Vec<(CallerContext, &str)>) -> UsageResolution {
        UsageResolution {
            subject,
            groups: groups
                .into_iter()
                .map(|(context, file)| UsageGroup {
                    context,
                    file: file.to_string(),
                    occurrences: vec![Occurrence { line: 3, column: 0 }],
                })
                .collect(),
        }
    }

    fn g() -> CallerContext {
        CallerContext::Function {
            name: "g".into(),
            start_line: 2,
        }
    }

    #[test]
    fn test_build() {
        let canvas = canvas();
        let ids: Vec<&str> = canvas.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["main.js", "util.js", "other.js"]);
        assert_eq!(canvas.edges().len(), 1);
        assert_eq!(canvas.edges()[0].source, "main.js");
        assert_eq!(canvas.edges()[0].target, "util.js");
        assert!(canvas.nodes().iter().all(GraphNode::is_file));
    }

    #[test]
    fn test_show_usages_adds_tagged_overlay() {
        let mut canvas = canvas();
        let subject = key("util.js", "add", SymbolKind::Function);
        canvas
            .show_usages(&resolution(
                subject.clone(),
                vec![(g(), "main.js"), (CallerContext::File, "other.js")],
            ))
            .unwrap();

        assert_eq!(canvas.nodes().len(), 4);
        let caller = &canvas.nodes()[3];
        assert_eq!(caller.origin.as_ref(), Some(&subject));
        assert!(matches!(
            &caller.payload,
            NodePayload::Caller(CallerNode { function, .. }) if function == "g"
        ));

        let overlay: Vec<(&str, &str, EdgeKind)> = canvas
            .edges()
            .iter()
            .filter(|e| e.origin.is_some())
            .map(|e| (e.source.as_str(), e.target.as_str(), e.kind))
            .collect();
        assert_eq!(
            overlay,
            vec![
                (caller.id.as_str(), "util.js", EdgeKind::Calls),
                ("other.js", "util.js", EdgeKind::Calls),
            ]
        );
        assert_eq!(canvas.active_query(), Some(&subject));
    }

    #[test]
    fn test_non_function_subjects_reference() {
        let mut canvas = canvas();
        canvas
            .show_usages(&resolution(
                key("util.js", "Widget", SymbolKind::Class),
                vec![(CallerContext::File, "main.js")],
            ))
            .unwrap();
        assert_eq!(canvas.edges().last().unwrap().kind, EdgeKind::References);
    }

    #[test]
    fn test_next_query_retracts_previous() {
        let mut canvas = canvas();
        let base_nodes = canvas.nodes().to_vec();
        let base_edges = canvas.edges().to_vec();

        let first = key("util.js", "add", SymbolKind::Function);
        canvas
            .show_usages(&resolution(first.clone(), vec![(g(), "main.js")]))
            .unwrap();

        let second = key("main.js", "run", SymbolKind::Function);
        canvas
            .show_usages(&resolution(second.clone(), vec![(g(), "other.js")]))
            .unwrap();

        assert!(canvas.nodes().iter().all(|n| n.origin.as_ref() != Some(&first)));
        assert!(canvas.edges().iter().all(|e| e.origin.as_ref() != Some(&first)));
        assert_eq!(canvas.nodes().len(), base_nodes.len() + 1);

        canvas.clear_usages();
        assert_eq!(canvas.nodes(), base_nodes.as_slice());
        assert_eq!(canvas.edges(), base_edges.as_slice());
        assert_eq!(canvas.active_query(), None);
    }

    #[test]
    fn test_retract_counts_removed_items() {
        let mut canvas = canvas();
        let subject = key("util.js", "add", SymbolKind::Function);
        canvas
            .show_usages(&resolution(
                subject.clone(),
                vec![(g(), "main.js"), (CallerContext::File, "other.js")],
            ))
            .unwrap();

        // one caller node, two edges
        assert_eq!(canvas.retract(&subject), 3);
        assert_eq!(canvas.retract(&subject), 0);
    }

    #[test]
    fn test_unknown_subject_file_fails_without_changes() {
        let mut canvas = canvas();
        let before = canvas.clone();
        let err = canvas
            .show_usages(&resolution(
                key("missing.js", "x", SymbolKind::Function),
                vec![(CallerContext::File, "main.js")],
            ))
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownNode(id) if id == "missing.js"));
        assert_eq!(canvas.nodes(), before.nodes());
    }

    #[test]
    fn test_relayout_places_overlay_nodes() {
        let mut canvas = canvas();
        canvas
            .show_usages(&resolution(
                key("util.js", "add", SymbolKind::Function),
                vec![(g(), "other.js")],
            ))
            .unwrap();
        canvas.relayout(&LayoutConfig::default());

        // main.js, util.js and the caller form one circle; other.js follows it
        let caller = &canvas.nodes()[3];
        assert_ne!(caller.position, Position::default());
        assert_eq!(canvas.node("other.js").unwrap().position, Position::new(790.0, 50.0));
    }
}
