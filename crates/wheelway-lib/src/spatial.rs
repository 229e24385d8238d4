//! KD-tree index for snapping coordinates to the nearest graph node.
//!
//! Distances are measured in raw coordinate units (degrees for lon/lat
//! graphs). That is fine for picking the closest intersection within a campus
//! or a city, where the distortion between axes is small.
//!
//! # Example
//!
//! ```no_run
//! use wheelway_lib::{LocationResolver, Position, SpatialIndex};
//!
//! # let graph = wheelway_lib::Graph::default();
//! let index = SpatialIndex::build(&graph);
//! let node = index.resolve(Position::from_lat_lon(39.2557, -76.7110));
//! ```

use std::collections::HashMap;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::info;

use crate::graph::{Graph, NodeId, Position};

/// KD-tree bucket size (kiddo default).
///
/// kiddo cannot split a bucket holding more than this many identical points,
/// so nodes that share a position are stored as a single tree entry.
const BUCKET_SIZE: usize = 32;

/// Maps a location to a graph node.
pub trait LocationResolver {
    fn resolve(&self, position: Position) -> Option<NodeId>;
}

impl<F> LocationResolver for F
where
    F: Fn(Position) -> Option<NodeId>,
{
    fn resolve(&self, position: Position) -> Option<NodeId> {
        self(position)
    }
}

/// Nearest-node index over every node of a graph.
pub struct SpatialIndex {
    /// Items are indices into `slots`.
    tree: KdTree<f64, usize, 2, BUCKET_SIZE, u32>,
    /// Node ids per distinct position, in ascending order.
    slots: Vec<Vec<NodeId>>,
    node_count: usize,
}

impl SpatialIndex {
    /// Index every node of `graph` by position.
    pub fn build(graph: &Graph) -> Self {
        let mut tree: KdTree<f64, usize, 2, BUCKET_SIZE, u32> = KdTree::new();
        let mut slots: Vec<Vec<NodeId>> = Vec::new();
        let mut slot_of: HashMap<(u64, u64), usize> = HashMap::new();
        let mut node_count = 0;

        for node in graph.nodes() {
            // Adding 0.0 folds -0.0 into 0.0 so both land in one slot.
            let point = [node.position.x + 0.0, node.position.y + 0.0];
            let key = (point[0].to_bits(), point[1].to_bits());
            let slot = *slot_of.entry(key).or_insert_with(|| {
                tree.add(&point, slots.len());
                slots.push(Vec::new());
                slots.len() - 1
            });
            slots[slot].push(node.id);
            node_count += 1;
        }
        for ids in &mut slots {
            ids.sort_unstable();
        }

        info!(
            node_count,
            distinct_positions = slots.len(),
            "built spatial index"
        );

        Self {
            tree,
            slots,
            node_count,
        }
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.node_count
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Find the `k` nearest nodes to a position.
    ///
    /// Returns (NodeId, distance) pairs sorted by distance. Nodes sharing a
    /// position are listed in ascending id order.
    pub fn nearest(&self, position: Position, k: usize) -> Vec<(NodeId, f64)> {
        if k == 0 || self.slots.is_empty() {
            return Vec::new();
        }

        // Every slot holds at least one node, so `k` slots always cover `k` nodes.
        let results = self
            .tree
            .nearest_n::<SquaredEuclidean>(&[position.x, position.y], k);

        results
            .into_iter()
            .flat_map(|neighbor| {
                let distance = neighbor.distance.sqrt();
                self.slots[neighbor.item].iter().map(move |&id| (id, distance))
            })
            .take(k)
            .collect()
    }

    /// The single closest node, with its distance. Ties at one position go to
    /// the smallest id.
    pub fn nearest_node(&self, position: Position) -> Option<(NodeId, f64)> {
        self.nearest(position, 1).into_iter().next()
    }
}

impl LocationResolver for SpatialIndex {
    fn resolve(&self, position: Position) -> Option<NodeId> {
        self.nearest_node(position).map(|(id, _)| id)
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.node_count)
            .field("distinct_positions", &self.slots.len())
            .finish_non_exhaustive()
    }
}
