//! A* search over a [`Graph`] with pluggable edge costs and heuristics.
//!
//! Each call owns its frontier, score and parent tables, so one graph can be
//! searched from many threads at once without locking.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cost::{EdgeCostPolicy, WheelchairCost};
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::heuristic::{EuclideanHeuristic, NodeHeuristic};

/// Route found by the search: node identifiers from origin to destination
/// inclusive, and the summed cost of the edges taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    pub cost: f64,
}

impl Path {
    /// Number of edges in the route.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn origin(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

/// Result of a completed search.
///
/// `NoPathFound` is a legitimate answer about the network, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Path),
    NoPathFound,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NoPathFound => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NoPathFound => None,
        }
    }

    pub fn cost(&self) -> Option<f64> {
        self.path().map(|path| path.cost)
    }

    /// Node sequence of the route; empty when no accessible path exists.
    pub fn into_nodes(self) -> Vec<NodeId> {
        self.into_path().map(|path| path.nodes).unwrap_or_default()
    }
}

/// Shared flag used to abort running searches from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// Optional bounds on a single search, checked every time a node is popped
/// from the frontier.
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    pub deadline: Option<Instant>,
    pub cancel: Option<CancellationToken>,
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    /// No bounds at all.
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[must_use]
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    fn check(&self, expansions: usize) -> Result<()> {
        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(Error::SearchCancelled);
        }
        if let Some(limit) = self.max_expansions {
            if expansions >= limit {
                return Err(Error::ExpansionLimitReached { limit });
            }
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(Error::DeadlineExceeded);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SearchStats {
    expansions: usize,
    relaxations: usize,
    unusable_edges: usize,
}

/// Find the cheapest wheelchair-accessible route between two nodes.
///
/// Uses [`WheelchairCost`] with its defaults, [`EuclideanHeuristic`] and no
/// search limits.
pub fn find_path(graph: &Graph, origin: NodeId, destination: NodeId) -> Result<SearchOutcome> {
    find_path_with(
        graph,
        origin,
        destination,
        &WheelchairCost::default(),
        &EuclideanHeuristic,
        &SearchLimits::none(),
    )
}

/// Run A* search with the given cost policy, heuristic and limits.
///
/// Edges whose cost is infinite (or otherwise unusable) are never relaxed.
/// Ties in frontier priority are broken by insertion order.
pub fn find_path_with(
    graph: &Graph,
    origin: NodeId,
    destination: NodeId,
    cost_policy: &dyn EdgeCostPolicy,
    heuristic: &dyn NodeHeuristic,
    limits: &SearchLimits,
) -> Result<SearchOutcome> {
    for id in [origin, destination] {
        if !graph.contains(id) {
            return Err(Error::UnknownNode { id });
        }
    }

    if origin == destination {
        return Ok(SearchOutcome::Found(Path {
            nodes: vec![origin],
            cost: 0.0,
        }));
    }

    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut parents: HashMap<NodeId, Option<NodeId>> = HashMap::new();
    let mut finalized: HashSet<NodeId> = HashSet::new();
    let mut queue = BinaryHeap::new();
    let mut sequence: u64 = 0;
    let mut stats = SearchStats::default();

    g_score.insert(origin, 0.0);
    parents.insert(origin, None);
    let start_estimate = heuristic.estimate(graph, origin, destination);
    queue.push(AStarEntry::new(origin, start_estimate, sequence));

    while let Some(entry) = queue.pop() {
        if let Err(error) = limits.check(stats.expansions) {
            warn!(
                origin,
                destination,
                expansions = stats.expansions,
                %error,
                "a* search stopped early"
            );
            return Err(error);
        }

        if !finalized.insert(entry.node) {
            continue;
        }
        stats.expansions += 1;

        let current_score = g_score.get(&entry.node).copied().unwrap_or(f64::INFINITY);

        if entry.node == destination {
            let path = Path {
                nodes: reconstruct_path(&parents, origin, destination),
                cost: current_score,
            };
            log_summary(origin, destination, &stats, Some(path.cost));
            return Ok(SearchOutcome::Found(path));
        }

        for edge in graph.outgoing(entry.node) {
            let next = edge.target;
            if finalized.contains(&next) {
                continue;
            }

            let cost = cost_policy.cost(edge);
            if cost.is_nan() || cost < 0.0 || cost.is_infinite() {
                stats.unusable_edges += 1;
                continue;
            }

            let tentative_g = current_score + cost;
            if tentative_g < *g_score.get(&next).unwrap_or(&f64::INFINITY) {
                stats.relaxations += 1;
                g_score.insert(next, tentative_g);
                parents.insert(next, Some(entry.node));
                let estimate = heuristic.estimate(graph, next, destination);
                sequence += 1;
                queue.push(AStarEntry::new(next, tentative_g + estimate, sequence));
            }
        }
    }

    log_summary(origin, destination, &stats, None);
    Ok(SearchOutcome::NoPathFound)
}

fn log_summary(origin: NodeId, destination: NodeId, stats: &SearchStats, cost: Option<f64>) {
    debug!(
        origin,
        destination,
        expansions = stats.expansions,
        relaxations = stats.relaxations,
        unusable_edges = stats.unusable_edges,
        found = cost.is_some(),
        cost = cost.unwrap_or(f64::INFINITY),
        "a* search finished"
    );
}

fn reconstruct_path(
    parents: &HashMap<NodeId, Option<NodeId>>,
    origin: NodeId,
    destination: NodeId,
) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = Some(destination);
    while let Some(node) = current {
        path.push(node);
        if node == origin {
            break;
        }
        current = parents.get(&node).copied().flatten();
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct AStarEntry {
    node: NodeId,
    priority: FloatOrd,
    sequence: u64,
}

impl AStarEntry {
    fn new(node: NodeId, priority: f64, sequence: u64) -> Self {
        Self {
            node,
            priority: FloatOrd(priority),
            sequence,
        }
    }
}

impl Ord for AStarEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap; earlier pushes win ties.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for AStarEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
