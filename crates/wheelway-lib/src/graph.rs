//! Street network model: intersections, directed street segments and the
//! read-only graph handed to the search engine.
//!
//! Graphs are assembled through [`GraphBuilder`], which validates the data
//! once so the search never has to. The built [`Graph`] keeps its tables behind
//! `Arc`, so cloning it to share between threads is cheap.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// Numeric identifier for an intersection (OSM node ids are 64-bit).
pub type NodeId = i64;

/// Planar position of a node: `x` is longitude, `y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Build a position from a `(latitude, longitude)` pair.
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self { x: lon, y: lat }
    }

    /// Calculate the Euclidean distance to another position in coordinate units.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Wheelchair accessibility of a street segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wheelchair {
    Accessible,
    NotAccessible,
    #[default]
    Unknown,
}

impl Wheelchair {
    /// Interpret an OSM `wheelchair=*` tag value.
    ///
    /// Only `yes` counts as accessible and only `no` as inaccessible. Every
    /// other value (`limited`, `designated`, typos, a missing tag) is unknown.
    pub fn from_tag(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(tag) if tag.eq_ignore_ascii_case("yes") => Wheelchair::Accessible,
            Some(tag) if tag.eq_ignore_ascii_case("no") => Wheelchair::NotAccessible,
            _ => Wheelchair::Unknown,
        }
    }
}

impl fmt::Display for Wheelchair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Wheelchair::Accessible => "accessible",
            Wheelchair::NotAccessible => "not_accessible",
            Wheelchair::Unknown => "unknown",
        };
        f.write_str(value)
    }
}

/// Street intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Node {
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self {
            id,
            position: Position::new(x, y),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Directed street segment from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Physical length in meters, when the source data carried one.
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub wheelchair: Wheelchair,
}

impl Edge {
    pub fn new(
        source: NodeId,
        target: NodeId,
        length: Option<f64>,
        wheelchair: Wheelchair,
    ) -> Self {
        Self {
            source,
            target,
            length,
            wheelchair,
        }
    }

    /// Accessible segment with a known length.
    pub fn accessible(source: NodeId, target: NodeId, length: f64) -> Self {
        Self::new(source, target, Some(length), Wheelchair::Accessible)
    }

    /// Length of the segment, or `fallback` when none was recorded.
    pub fn length_or(&self, fallback: f64) -> f64 {
        self.length.unwrap_or(fallback)
    }
}

/// Street network used by the search engine.
///
/// Parallel edges between the same pair of nodes are kept as separate records
/// in the adjacency list of their source node.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Arc<HashMap<NodeId, Node>>,
    adjacency: Arc<HashMap<NodeId, Vec<Edge>>>,
    name_to_id: Arc<HashMap<String, NodeId>>,
    edge_count: usize,
}

impl Graph {
    /// Start assembling a new graph.
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.nodes.get(&id).map(|node| node.position)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Return the outgoing edges for a given node identifier.
    pub fn outgoing(&self, id: NodeId) -> &[Edge] {
        self.adjacency
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Lookup a node identifier by its case-sensitive display name.
    ///
    /// When several nodes share a name, the one added to the builder first wins.
    pub fn node_id_by_name(&self, name: &str) -> Option<NodeId> {
        self.name_to_id.get(name).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.adjacency.values().flatten()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Collects nodes and edges and validates them into a [`Graph`].
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    #[must_use]
    pub fn edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn push_node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn push_edge(&mut self, edge: Edge) -> &mut Self {
        self.edges.push(edge);
        self
    }

    /// Validate the collected data and freeze it into a graph.
    ///
    /// Rejects duplicate node ids, non-finite positions, edges whose endpoints
    /// were never added and lengths that are negative or not finite.
    pub fn build(self) -> Result<Graph> {
        let mut nodes: HashMap<NodeId, Node> = HashMap::with_capacity(self.nodes.len());
        let mut name_to_id: HashMap<String, NodeId> = HashMap::new();

        for node in self.nodes {
            if !node.position.is_finite() {
                return Err(Error::InvalidPosition { id: node.id });
            }
            if nodes.contains_key(&node.id) {
                return Err(Error::DuplicateNode { id: node.id });
            }
            if let Some(name) = &node.name {
                name_to_id.entry(name.clone()).or_insert(node.id);
            }
            nodes.insert(node.id, node);
        }

        let mut adjacency: HashMap<NodeId, Vec<Edge>> = HashMap::with_capacity(nodes.len());
        let edge_count = self.edges.len();

        for edge in self.edges {
            for endpoint in [edge.source, edge.target] {
                if !nodes.contains_key(&endpoint) {
                    return Err(Error::DanglingEdge {
                        from: edge.source,
                        to: edge.target,
                        missing: endpoint,
                    });
                }
            }
            if let Some(length) = edge.length {
                if !length.is_finite() || length < 0.0 {
                    return Err(Error::InvalidEdgeLength {
                        from: edge.source,
                        to: edge.target,
                        length,
                    });
                }
            }
            adjacency.entry(edge.source).or_default().push(edge);
        }

        info!(
            nodes = nodes.len(),
            edges = edge_count,
            "built street graph"
        );

        Ok(Graph {
            nodes: Arc::new(nodes),
            adjacency: Arc::new(adjacency),
            name_to_id: Arc::new(name_to_id),
            edge_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheelchair_tag_parsing_is_strict() {
        assert_eq!(Wheelchair::from_tag(Some("yes")), Wheelchair::Accessible);
        assert_eq!(Wheelchair::from_tag(Some(" YES ")), Wheelchair::Accessible);
        assert_eq!(Wheelchair::from_tag(Some("no")), Wheelchair::NotAccessible);
        assert_eq!(Wheelchair::from_tag(Some("limited")), Wheelchair::Unknown);
        assert_eq!(Wheelchair::from_tag(Some("designated")), Wheelchair::Unknown);
        assert_eq!(Wheelchair::from_tag(None), Wheelchair::Unknown);
    }

    #[test]
    fn position_distance_is_euclidean() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn lat_lon_constructor_swaps_axes() {
        let position = Position::from_lat_lon(39.25, -76.71);
        assert_eq!(position.x, -76.71);
        assert_eq!(position.y, 39.25);
    }
}
