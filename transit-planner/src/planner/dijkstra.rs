//! Shortest path search over a `TransitGraph`.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use super::graph::{NodeId, TransitGraph};

/// Cooperative cancellation for a running search.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
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

/// The search was cancelled before it finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// A cheapest path, from the start node to the goal it reached.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub nodes: Vec<NodeId>,
    /// Sum of edge weights along the path (minutes).
    pub cost: f64,
}

#[derive(Debug, Clone, Copy)]
struct State {
    cost: f64,
    node: NodeId,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

// Min-heap by cost, then by node for a deterministic pop order
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra from `start` to the first settled node in `goals`.
///
/// Returns `Ok(None)` when no goal is reachable. The flag is checked once per
/// settled node.
pub fn shortest_path(
    graph: &TransitGraph,
    start: NodeId,
    goals: &HashSet<NodeId>,
    cancel: &CancelFlag,
) -> Result<Option<PathResult>, Cancelled> {
    let n = graph.node_count();
    if start.0 >= n || goals.is_empty() {
        return Ok(None);
    }

    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<NodeId>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();

    dist[start.0] = 0.0;
    heap.push(State {
        cost: 0.0,
        node: start,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if settled[node.0] {
            continue;
        }
        settled[node.0] = true;

        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        if goals.contains(&node) {
            return Ok(Some(PathResult {
                nodes: unwind(&prev, node),
                cost,
            }));
        }

        for edge in graph.edges_from(node) {
            let next = edge.to;
            if settled[next.0] {
                continue;
            }

            let next_cost = cost + edge.weight;
            if next_cost < dist[next.0] {
                dist[next.0] = next_cost;
                prev[next.0] = Some(node);
                heap.push(State {
                    cost: next_cost,
                    node: next,
                });
            }
        }
    }

    Ok(None)
}

/// Follow predecessors back from `goal`, returning the path start-first.
fn unwind(prev: &[Option<NodeId>], goal: NodeId) -> Vec<NodeId> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(p) = prev[current.0] {
        path.push(p);
        current = p;
    }
    path.reverse();
    path
}
