//! Routing graph: "at stop S riding line L" nodes and weighted edges.
//!
//! Nodes are interned into an arena and addressed by `NodeId`, so the solver
//! works on dense indices and flat adjacency lists instead of hashing
//! composite keys in its hot loop.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Line, LineId, Stop, StopId, TransportMode};

/// Dense index of a node in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// The state of being at `stop` while served by `line`.
///
/// `line` is `None` for walking-only contexts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransitNode {
    pub stop: StopId,
    pub line: Option<LineId>,
}

impl TransitNode {
    pub fn new(stop: StopId, line: Option<LineId>) -> Self {
        Self { stop, line }
    }

    pub fn on_line(stop: StopId, line: LineId) -> Self {
        Self::new(stop, Some(line))
    }
}

/// Display metadata carried by ride edges.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMeta {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub mode: TransportMode,
}

impl From<&Line> for LineMeta {
    fn from(line: &Line) -> Self {
        Self {
            id: line.id.clone(),
            name: line.name.clone(),
            color: line.display_color().to_string(),
            mode: line.mode,
        }
    }
}

/// What an edge represents.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeKind {
    /// Travel between consecutive stops of a line.
    Ride(Arc<LineMeta>),
    /// A change of line, at the same stop or by walking to another one.
    Transfer,
}

/// A directed, weighted connection between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// Cost in minutes.
    pub weight: f64,
    pub kind: EdgeKind,
}

impl TransitEdge {
    pub fn is_ride(&self) -> bool {
        matches!(self.kind, EdgeKind::Ride(_))
    }

    pub fn is_transfer(&self) -> bool {
        matches!(self.kind, EdgeKind::Transfer)
    }
}

/// The routing graph for one planning session.
///
/// # Invariants
///
/// - every edge's endpoints are nodes of this graph
/// - every edge weight is finite and strictly positive
/// - `nodes_at` lists a stop's nodes ordered by line id (line-less first)
#[derive(Debug, Clone, Default)]
pub struct TransitGraph {
    nodes: Vec<TransitNode>,
    node_index: HashMap<TransitNode, NodeId>,
    adjacency: Vec<Vec<TransitEdge>>,
    by_stop: HashMap<StopId, Vec<NodeId>>,
    stops: HashMap<StopId, Stop>,
    lines: HashMap<LineId, Arc<LineMeta>>,
    edge_count: usize,
}

impl TransitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a node, returning its id (existing or new).
    pub fn add_node(&mut self, node: TransitNode) -> NodeId {
        if let Some(&id) = self.node_index.get(&node) {
            return id;
        }

        let id = NodeId(self.nodes.len());
        let at_stop = self.by_stop.entry(node.stop.clone()).or_default();
        let nodes = &self.nodes;
        let pos = at_stop.partition_point(|other| nodes[other.0].line <= node.line);
        at_stop.insert(pos, id);

        self.node_index.insert(node.clone(), id);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        id
    }

    /// Add a directed edge.
    ///
    /// Returns `false` (adding nothing) when an endpoint is unknown or the
    /// weight is not a positive finite number.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64, kind: EdgeKind) -> bool {
        if from.0 >= self.nodes.len() || to.0 >= self.nodes.len() {
            return false;
        }
        if !weight.is_finite() || weight <= 0.0 {
            return false;
        }

        self.adjacency[from.0].push(TransitEdge {
            from,
            to,
            weight,
            kind,
        });
        self.edge_count += 1;
        true
    }

    /// Record a resolved stop. The first record for an id wins.
    pub fn insert_stop(&mut self, stop: Stop) {
        self.stops.entry(stop.id.clone()).or_insert(stop);
    }

    /// Register line metadata, returning the shared handle used on ride edges.
    pub fn insert_line(&mut self, meta: LineMeta) -> Arc<LineMeta> {
        self.lines
            .entry(meta.id.clone())
            .or_insert_with(|| Arc::new(meta))
            .clone()
    }

    pub fn node(&self, id: NodeId) -> &TransitNode {
        &self.nodes[id.0]
    }

    pub fn find_node(&self, node: &TransitNode) -> Option<NodeId> {
        self.node_index.get(node).copied()
    }

    /// Nodes at a stop, ordered by line id.
    pub fn nodes_at(&self, stop: &StopId) -> &[NodeId] {
        self.by_stop.get(stop).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edges_from(&self, id: NodeId) -> &[TransitEdge] {
        &self.adjacency[id.0]
    }

    /// Every edge, grouped by source node.
    pub fn edges(&self) -> impl Iterator<Item = &TransitEdge> {
        self.adjacency.iter().flatten()
    }

    /// A resolved stop.
    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.stops.get(id)
    }

    pub fn line(&self, id: &LineId) -> Option<&Arc<LineMeta>> {
        self.lines.get(id)
    }

    /// Ids of stops that have at least one node, sorted.
    pub fn stop_ids(&self) -> Vec<StopId> {
        let mut ids: Vec<StopId> = self.by_stop.keys().cloned().collect();
        ids.sort();
        ids
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
