use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;
use wheelway_lib::{
    find_path, find_path_with, Edge, Graph, GraphBuilder, Node, NodeId, SearchLimits, Wheelchair,
    WheelchairCost, ZeroHeuristic,
};

const SIDE: i64 = 120;

/// Street grid where every fifth vertical segment is inaccessible, forcing
/// detours through neighbouring columns.
fn street_grid() -> Graph {
    let mut builder = GraphBuilder::new();
    let id = |x: i64, y: i64| -> NodeId { y * SIDE + x };

    for y in 0..SIDE {
        for x in 0..SIDE {
            builder.push_node(Node::new(id(x, y), x as f64, y as f64));
        }
    }
    for y in 0..SIDE {
        for x in 0..SIDE {
            if x + 1 < SIDE {
                builder.push_edge(Edge::accessible(id(x, y), id(x + 1, y), 1.0));
                builder.push_edge(Edge::accessible(id(x + 1, y), id(x, y), 1.0));
            }
            if y + 1 < SIDE {
                let wheelchair = if (x + y) % 5 == 0 {
                    Wheelchair::NotAccessible
                } else {
                    Wheelchair::Accessible
                };
                builder.push_edge(Edge::new(id(x, y), id(x, y + 1), Some(1.0), wheelchair));
                builder.push_edge(Edge::new(id(x, y + 1), id(x, y), Some(1.0), wheelchair));
            }
        }
    }
    builder.build().expect("benchmark grid builds")
}

static GRID: Lazy<Graph> = Lazy::new(street_grid);

fn benchmark_pathfinding(c: &mut Criterion) {
    let graph = &*GRID;
    let goal = SIDE * SIDE - 1;

    c.bench_function("astar_euclidean_corner_to_corner", |b| {
        b.iter(|| {
            let outcome = find_path(graph, 0, goal).expect("valid endpoints");
            black_box(outcome.cost())
        });
    });

    c.bench_function("dijkstra_corner_to_corner", |b| {
        let policy = WheelchairCost::default();
        let limits = SearchLimits::none();
        b.iter(|| {
            let outcome = find_path_with(graph, 0, goal, &policy, &ZeroHeuristic, &limits)
                .expect("valid endpoints");
            black_box(outcome.cost())
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
