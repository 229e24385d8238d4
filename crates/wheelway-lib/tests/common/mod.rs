// Shared fixtures for wheelway-lib integration tests
#![allow(dead_code)]

use wheelway_lib::{Edge, Graph, GraphBuilder, Node, NodeId, Wheelchair};

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn edge(source: NodeId, target: NodeId, length: f64, wheelchair: Wheelchair) -> Edge {
    Edge::new(source, target, Some(length), wheelchair)
}

/// Two nodes joined by a single directed edge `1 -> 2` of length 5.
pub fn two_node_graph(wheelchair: Wheelchair) -> Graph {
    Graph::builder()
        .node(Node::new(1, 0.0, 0.0))
        .node(Node::new(2, 3.0, 4.0))
        .edge(edge(1, 2, 5.0, wheelchair))
        .build()
        .expect("two node graph builds")
}

/// Triangle where the direct edge `1 -> 3` is short but inaccessible and the
/// detour `1 -> 2 -> 3` is accessible with total length 8.
pub fn detour_graph() -> Graph {
    Graph::builder()
        .node(Node::new(1, 0.0, 0.0))
        .node(Node::new(2, 1.5, 2.0))
        .node(Node::new(3, 3.0, 0.0))
        .edge(edge(1, 3, 3.0, Wheelchair::NotAccessible))
        .edge(edge(1, 2, 4.0, Wheelchair::Accessible))
        .edge(edge(2, 3, 4.0, Wheelchair::Accessible))
        .build()
        .expect("detour graph builds")
}

/// `width` x `height` grid with unit spacing and accessible edges in both
/// directions between orthogonal neighbours. Node ids are `y * width + x`.
pub fn grid_builder(width: i64, height: i64) -> GraphBuilder {
    let mut builder = GraphBuilder::new();
    for y in 0..height {
        for x in 0..width {
            builder.push_node(Node::new(y * width + x, x as f64, y as f64));
        }
    }
    for y in 0..height {
        for x in 0..width {
            let id = y * width + x;
            if x + 1 < width {
                builder.push_edge(edge(id, id + 1, 1.0, Wheelchair::Accessible));
                builder.push_edge(edge(id + 1, id, 1.0, Wheelchair::Accessible));
            }
            if y + 1 < height {
                builder.push_edge(edge(id, id + width, 1.0, Wheelchair::Accessible));
                builder.push_edge(edge(id + width, id, 1.0, Wheelchair::Accessible));
            }
        }
    }
    builder
}

pub fn grid(width: i64, height: i64) -> Graph {
    grid_builder(width, height).build().expect("grid builds")
}

/// Sum the cheapest edge cost along `nodes` under `cost`.
pub fn path_cost(graph: &Graph, nodes: &[NodeId], cost: impl Fn(&Edge) -> f64) -> f64 {
    nodes
        .windows(2)
        .map(|pair| {
            graph
                .outgoing(pair[0])
                .iter()
                .filter(|edge| edge.target == pair[1])
                .map(&cost)
                .fold(f64::INFINITY, f64::min)
        })
        .sum()
}
