//! Journey planner using Dijkstra over a line-aware transit graph.
//!
//! This module answers: "what is the quickest way from stop A to stop B?"
//!
//! Each request builds a graph whose nodes are "at stop S riding line L",
//! with ride edges between consecutive stops of a line and transfer edges
//! for changes of line. The cheapest path is then split into ride and walk
//! segments and drawn along the lines' published shapes.

mod builder;
mod config;
mod dijkstra;
mod graph;
mod reconstruct;
mod search;
mod shape;

pub use builder::{BuildReport, GraphBuilder};
pub use config::PlannerConfig;
pub use dijkstra::{CancelFlag, Cancelled, PathResult, shortest_path};
pub use graph::{EdgeKind, LineMeta, NodeId, TransitEdge, TransitGraph, TransitNode};
pub use reconstruct::SegmentReconstructor;
pub use search::{PlanError, Planner};
pub use shape::{ShapeProjector, extract_shape_segment};
