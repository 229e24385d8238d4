//! Wheelway library entry points.
//!
//! This crate finds the cheapest street route between two intersections using
//! only segments confirmed wheelchair accessible. Callers hand in a [`Graph`]
//! built with [`GraphBuilder`], then either call [`find_path`] directly or go
//! through a configured [`Router`]. Loading map files, geocoding and rendering
//! belong to higher-level consumers.
//!
//! ```
//! use wheelway_lib::{find_path, Edge, Graph, Node, SearchOutcome, Wheelchair};
//!
//! let graph = Graph::builder()
//!     .node(Node::new(1, 0.0, 0.0))
//!     .node(Node::new(2, 3.0, 4.0))
//!     .edge(Edge::new(1, 2, Some(5.0), Wheelchair::Accessible))
//!     .build()?;
//!
//! let outcome = find_path(&graph, 1, 2)?;
//! assert_eq!(outcome.into_nodes(), vec![1, 2]);
//! # Ok::<(), wheelway_lib::Error>(())
//! ```

#![deny(warnings)]

pub mod coords;
pub mod cost;
pub mod error;
pub mod graph;
pub mod heuristic;
pub mod path;
pub mod routing;
pub mod spatial;

pub use coords::{dms_to_decimal, Hemisphere};
pub use cost::{
    validate_default_length, DistanceCost, EdgeCostPolicy, UnknownAccess, WheelchairCost,
    DEFAULT_EDGE_LENGTH, DEFAULT_UNKNOWN_ACCESS,
};
pub use error::{Error, Result};
pub use graph::{Edge, Graph, GraphBuilder, Node, NodeId, Position, Wheelchair};
pub use heuristic::{
    haversine_meters, EuclideanHeuristic, HaversineHeuristic, HeuristicKind, NodeHeuristic,
    ZeroHeuristic,
};
pub use path::{
    find_path, find_path_with, CancellationToken, Path, SearchLimits, SearchOutcome,
};
pub use routing::{RouteConfig, Router};
pub use spatial::{LocationResolver, SpatialIndex};
