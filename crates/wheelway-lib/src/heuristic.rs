//! Remaining-distance estimates used to order the A* frontier.
//!
//! A* only guarantees optimal routes when the estimate never exceeds the true
//! remaining cost. [`EuclideanHeuristic`] measures in raw coordinate units and
//! is only admissible when edge lengths use those same units; for lon/lat
//! graphs with lengths in meters use [`HaversineHeuristic`].

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeId, Position};

/// Mean earth radius in meters (IUGG).
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Estimates the cost of travelling between two nodes.
pub trait NodeHeuristic: Send + Sync {
    fn estimate(&self, graph: &Graph, from: NodeId, to: NodeId) -> f64;
}

impl<F> NodeHeuristic for F
where
    F: Fn(&Graph, NodeId, NodeId) -> f64 + Send + Sync,
{
    fn estimate(&self, graph: &Graph, from: NodeId, to: NodeId) -> f64 {
        self(graph, from, to)
    }
}

/// Straight-line distance between node positions, in coordinate units.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanHeuristic;

impl NodeHeuristic for EuclideanHeuristic {
    fn estimate(&self, graph: &Graph, from: NodeId, to: NodeId) -> f64 {
        positions(graph, from, to)
            .map(|(a, b)| a.distance_to(&b))
            .unwrap_or(0.0)
    }
}

/// Great-circle distance in meters between lon/lat node positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineHeuristic;

impl NodeHeuristic for HaversineHeuristic {
    fn estimate(&self, graph: &Graph, from: NodeId, to: NodeId) -> f64 {
        positions(graph, from, to)
            .map(|(a, b)| haversine_meters(&a, &b))
            .unwrap_or(0.0)
    }
}

/// Always zero; turns A* into Dijkstra's algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl NodeHeuristic for ZeroHeuristic {
    fn estimate(&self, _graph: &Graph, _from: NodeId, _to: NodeId) -> f64 {
        0.0
    }
}

/// Heuristic selection used by [`RouteConfig`](crate::RouteConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    #[default]
    Euclidean,
    Haversine,
    Zero,
}

impl HeuristicKind {
    pub fn build(self) -> Box<dyn NodeHeuristic> {
        match self {
            HeuristicKind::Euclidean => Box::new(EuclideanHeuristic),
            HeuristicKind::Haversine => Box::new(HaversineHeuristic),
            HeuristicKind::Zero => Box::new(ZeroHeuristic),
        }
    }
}

/// Great-circle distance between two lon/lat positions.
pub fn haversine_meters(a: &Position, b: &Position) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.x - a.x).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

// Missing nodes estimate zero, which keeps the heuristic admissible.
fn positions(graph: &Graph, from: NodeId, to: NodeId) -> Option<(Position, Position)> {
    Some((graph.position(from)?, graph.position(to)?))
}
