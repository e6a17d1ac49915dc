//! Component partitioning and deterministic canvas placement.

use crate::error::{GraphError, Result};
use crate::types::{GraphEdge, GraphNode, Position};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Dfs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Placement constants for [`layout`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// X of the first component
    pub origin_x: f64,

    /// Row used for isolated nodes
    pub singleton_y: f64,
    /// Cursor advance after an isolated node
    pub singleton_step: f64,

    /// Circle centre offset from the component's left edge
    pub cluster_offset_x: f64,
    pub cluster_center_y: f64,
    pub min_radius: f64,
    pub radius_per_node: f64,
    /// Largest component still drawn as a circle
    pub circle_max_nodes: usize,

    /// Grid cell size
    pub column_pitch: f64,
    pub row_pitch: f64,
    pub grid_origin_y: f64,

    /// Gap after a multi-node component
    pub component_margin: f64,
    pub min_component_advance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 50.0,
            singleton_y: 50.0,
            singleton_step: 350.0,
            cluster_offset_x: 200.0,
            cluster_center_y: 200.0,
            min_radius: 100.0,
            radius_per_node: 30.0,
            circle_max_nodes: 6,
            column_pitch: 320.0,
            row_pitch: 250.0,
            grid_origin_y: 50.0,
            component_margin: 100.0,
            min_component_advance: 400.0,
        }
    }
}

impl LayoutConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("origin_x", self.origin_x),
            ("singleton_y", self.singleton_y),
            ("singleton_step", self.singleton_step),
            ("cluster_offset_x", self.cluster_offset_x),
            ("cluster_center_y", self.cluster_center_y),
            ("min_radius", self.min_radius),
            ("radius_per_node", self.radius_per_node),
            ("column_pitch", self.column_pitch),
            ("row_pitch", self.row_pitch),
            ("grid_origin_y", self.grid_origin_y),
            ("component_margin", self.component_margin),
            ("min_component_advance", self.min_component_advance),
        ];
        if let Some((name, _)) = values.iter().find(|(_, value)| !value.is_finite()) {
            return Err(GraphError::InvalidConfig(format!("{name} must be finite")));
        }

        if self.singleton_step <= 0.0 || self.column_pitch <= 0.0 || self.row_pitch <= 0.0 {
            return Err(GraphError::InvalidConfig(
                "singleton_step, column_pitch and row_pitch must be positive".to_string(),
            ));
        }

        if self.min_radius < 0.0 || self.radius_per_node < 0.0 {
            return Err(GraphError::InvalidConfig(
                "radii must not be negative".to_string(),
            ));
        }

        if self.circle_max_nodes < 2 {
            return Err(GraphError::InvalidConfig(format!(
                "circle_max_nodes ({}) must be at least 2",
                self.circle_max_nodes
            )));
        }

        Ok(())
    }
}

/// Split nodes into connected components, ignoring edge direction.
///
/// Components are discovered by depth-first search from each unvisited node
/// in node order; members are indices into `nodes`, ascending. Edges naming
/// an unknown node are ignored.
pub fn partition(nodes: &[GraphNode], edges: &[GraphEdge]) -> Vec<Vec<usize>> {
    let mut graph = UnGraph::<(), ()>::with_capacity(nodes.len(), edges.len());
    let indices: Vec<NodeIndex> = nodes.iter().map(|_| graph.add_node(())).collect();
    let lookup: HashMap<&str, NodeIndex> = nodes
        .iter()
        .map(|node| node.id.as_str())
        .zip(indices.iter().copied())
        .collect();

    for edge in edges {
        match (
            lookup.get(edge.source.as_str()),
            lookup.get(edge.target.as_str()),
        ) {
            (Some(&a), Some(&b)) => {
                graph.add_edge(a, b, ());
            }
            _ => log::debug!("Layout skips edge {} with unknown endpoint", edge.id),
        }
    }

    let mut visited = vec![false; nodes.len()];
    let mut components = Vec::new();
    for start in graph.node_indices() {
        if visited[start.index()] {
            continue;
        }

        let mut members = Vec::new();
        let mut dfs = Dfs::new(&graph, start);
        while let Some(index) = dfs.next(&graph) {
            visited[index.index()] = true;
            members.push(index.index());
        }
        members.sort_unstable();
        components.push(members);
    }

    components
}

/// Place every node on the canvas, one component after another from left to right.
///
/// Isolated nodes share a row; small components form a circle; larger
/// ones a square-ish grid. Output order matches `nodes`.
pub fn layout(nodes: &[GraphNode], edges: &[GraphEdge], config: &LayoutConfig) -> Vec<GraphNode> {
    let mut placed = nodes.to_vec();
    let mut cursor = config.origin_x;

    for component in partition(nodes, edges) {
        let count = component.len();
        if count == 1 {
            placed[component[0]].position = Position::new(cursor, config.singleton_y);
            cursor += config.singleton_step;
            continue;
        }

        let columns = (count as f64).sqrt().ceil();
        if count <= config.circle_max_nodes {
            let radius = (count as f64 * config.radius_per_node).max(config.min_radius);
            let center_x = cursor + config.cluster_offset_x;
            for (i, &member) in component.iter().enumerate() {
                let angle = 2.0 * PI * i as f64 / count as f64;
                placed[member].position = Position::new(
                    center_x + radius * angle.cos(),
                    config.cluster_center_y + radius * angle.sin(),
                );
            }
        } else {
            let per_row = columns as usize;
            for (i, &member) in component.iter().enumerate() {
                placed[member].position = Position::new(
                    cursor + (i % per_row) as f64 * config.column_pitch,
                    config.grid_origin_y + (i / per_row) as f64 * config.row_pitch,
                );
            }
        }

        cursor += (columns * config.column_pitch + config.component_margin)
            .max(config.min_component_advance);
    }

    placed
}
