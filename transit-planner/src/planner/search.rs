//! Journey search: build the graph, run the solver, shape the result.
//!
//! Answers "what is the quickest way from stop A to stop B?" for one
//! request. Every call to `find_route` builds a fresh graph, so the answer
//! always reflects the network data at the time of the call.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::domain::{Journey, StopId};
use crate::network::{NetworkError, NetworkProvider};

use super::builder::GraphBuilder;
use super::config::PlannerConfig;
use super::dijkstra::{CancelFlag, Cancelled, PathResult, shortest_path};
use super::graph::TransitGraph;
use super::reconstruct::SegmentReconstructor;
use super::shape::ShapeProjector;

/// Error from journey planning.
///
/// "No route" is not an error: `find_route` answers `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Origin or destination is not served by any routed line
    #[error("stop not found: {0}")]
    StopNotFound(StopId),

    /// Every line failed to load, so there is nothing to route on
    #[error("network unavailable: {0}")]
    NetworkUnavailable(#[source] NetworkError),

    /// The cancel flag was raised while searching
    #[error("planning cancelled")]
    Cancelled,
}

impl From<Cancelled> for PlanError {
    fn from(_: Cancelled) -> Self {
        PlanError::Cancelled
    }
}

/// Plans journeys over a network.
pub struct Planner<'a, P: NetworkProvider> {
    provider: &'a P,
    catalog: &'a Catalog,
    config: &'a PlannerConfig,
    cancel: CancelFlag,
}

impl<'a, P: NetworkProvider> Planner<'a, P> {
    pub fn new(provider: &'a P, catalog: &'a Catalog, config: &'a PlannerConfig) -> Self {
        Self {
            provider,
            catalog,
            config,
            cancel: CancelFlag::new(),
        }
    }

    /// Use `cancel` to abort the search from elsewhere.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Find the cheapest journey from `origin` to `destination`.
    pub async fn find_route(
        &self,
        origin: &StopId,
        destination: &StopId,
    ) -> Result<Option<Journey>, PlanError> {
        let (graph, report) = GraphBuilder::new(self.provider, self.catalog, self.config)
            .build()
            .await;

        if report.network_unavailable() {
            if let Some(e) = report.last_error {
                return Err(PlanError::NetworkUnavailable(e));
            }
        }

        let Some(mut journey) = self.plan_on_graph(&graph, origin, destination)? else {
            info!(origin = %origin, destination = %destination, "No route found");
            return Ok(None);
        };

        let mut projector = ShapeProjector::new(self.provider, self.catalog, self.config);
        projector.project(journey.segments_mut()).await;

        info!(
            origin = %origin,
            destination = %destination,
            minutes = journey.total_duration_minutes(),
            segments = journey.segments().len(),
            transfers = journey.transfer_count(),
            shape_fetches = projector.fetches(),
            "Route found"
        );

        Ok(Some(journey))
    }

    /// Solve on an already built graph. Segment geometry is left empty.
    pub fn plan_on_graph(
        &self,
        graph: &TransitGraph,
        origin: &StopId,
        destination: &StopId,
    ) -> Result<Option<Journey>, PlanError> {
        let origin_stop = graph
            .stop(origin)
            .ok_or_else(|| PlanError::StopNotFound(origin.clone()))?;
        let destination_stop = graph
            .stop(destination)
            .ok_or_else(|| PlanError::StopNotFound(destination.clone()))?;

        let goals: HashSet<_> = graph.nodes_at(destination).iter().copied().collect();

        // Origin nodes come ordered by line id; only a strictly cheaper
        // run replaces the current best.
        let mut best: Option<PathResult> = None;
        for &start in graph.nodes_at(origin) {
            let Some(found) = shortest_path(graph, start, &goals, &self.cancel)? else {
                continue;
            };

            debug!(
                line = ?graph.node(start).line,
                cost = found.cost,
                "Candidate route"
            );

            if best.as_ref().is_none_or(|b| found.cost < b.cost) {
                best = Some(found);
            }
        }

        let Some(best) = best else {
            return Ok(None);
        };

        let segments = SegmentReconstructor::new(graph, self.config).reconstruct(&best.nodes);
        Ok(Some(Journey::new(
            origin_stop.clone(),
            destination_stop.clone(),
            segments,
            best.cost,
        )))
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
