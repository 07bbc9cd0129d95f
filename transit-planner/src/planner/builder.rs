//! Graph construction from the line catalog and network data.
//!
//! Building happens in three passes:
//!
//! 1. fetch every line's stop sequence (concurrently) and add a pair of
//!    ride edges between each two consecutive stops;
//! 2. add same-stop transfer edges between the nodes of different lines
//!    sharing a stop;
//! 3. fetch every stop's correspondences (concurrently) and add walking
//!    transfer edges to the nodes of the correspondence's target stop.
//!
//! A failed fetch never aborts the build: the line or stop simply
//! contributes nothing.

use std::future::Future;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::domain::{Line, RouteId, Stop, StopId, travel_minutes};
use crate::network::{NetworkError, NetworkProvider};

use super::config::PlannerConfig;
use super::graph::{EdgeKind, LineMeta, TransitGraph, TransitNode};

/// What happened while building a graph.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Lines whose stops were requested from the network.
    pub lines_attempted: usize,
    /// Lines that contributed ride edges.
    pub lines_routed: usize,
    /// Lines without a route or with fewer than two stops.
    pub lines_skipped: usize,
    /// Lines whose stop fetch failed.
    pub lines_failed: usize,
    /// Stops whose correspondence fetch failed.
    pub stops_failed: usize,
    /// The most recent fetch error, if any.
    pub last_error: Option<NetworkError>,
}

impl BuildReport {
    /// True when lines were attempted and every one of them failed to fetch.
    ///
    /// Lines without a route never reach the network and do not count.
    pub fn network_unavailable(&self) -> bool {
        self.lines_failed > 0 && self.lines_failed == self.lines_attempted
    }
}

/// Builds a fresh `TransitGraph` per call.
pub struct GraphBuilder<'a, P: NetworkProvider> {
    provider: &'a P,
    catalog: &'a Catalog,
    config: &'a PlannerConfig,
}

impl<'a, P: NetworkProvider> GraphBuilder<'a, P> {
    pub fn new(provider: &'a P, catalog: &'a Catalog, config: &'a PlannerConfig) -> Self {
        Self {
            provider,
            catalog,
            config,
        }
    }

    /// Build the graph for every line in the catalog.
    pub async fn build(&self) -> (TransitGraph, BuildReport) {
        let mut graph = TransitGraph::new();
        let mut report = BuildReport::default();

        self.add_ride_edges(&mut graph, &mut report).await;
        self.add_same_stop_transfers(&mut graph);
        self.add_walking_transfers(&mut graph, &mut report).await;

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            lines_attempted = report.lines_attempted,
            lines_routed = report.lines_routed,
            lines_skipped = report.lines_skipped,
            lines_failed = report.lines_failed,
            stops_failed = report.stops_failed,
            "Transit graph built"
        );

        (graph, report)
    }

    /// Minutes to ride between two stops.
    fn ride_weight(&self, from: &Stop, to: &Stop) -> f64 {
        let meters = from.position.haversine_meters(&to.position);
        travel_minutes(meters, self.config.ride_speed_kmh).max(self.config.min_edge_weight_mins)
    }

    async fn add_ride_edges(&self, graph: &mut TransitGraph, report: &mut BuildReport) {
        let mut routed: Vec<(&Line, RouteId)> = Vec::new();
        for line in self.catalog.lines() {
            match line.primary_route() {
                Some(route) => routed.push((line, route.clone())),
                None => report.lines_skipped += 1,
            }
        }
        report.lines_attempted = routed.len();

        let provider = self.provider;
        let results = fetch_batched(
            routed.iter().map(|(_, route)| route.clone()).collect(),
            self.config.fetch_batch_size,
            move |route: RouteId| async move { provider.fetch_stops_for_route(&route).await },
        )
        .await;

        for ((line, _), (route, result)) in routed.iter().zip(results) {
            let stops = match result {
                Ok(stops) => stops,
                Err(e) => {
                    warn!(line = %line.id, route = %route, error = %e, "Failed to fetch route stops, skipping line");
                    report.lines_failed += 1;
                    report.last_error = Some(e);
                    continue;
                }
            };

            if stops.len() < 2 {
                debug!(line = %line.id, stops = stops.len(), "Line has too few stops, skipping");
                report.lines_skipped += 1;
                continue;
            }

            let meta = graph.insert_line(LineMeta::from(*line));
            for pair in stops.windows(2) {
                let (from, to) = (&pair[0], &pair[1]);
                if from.id == to.id {
                    continue;
                }

                let weight = self.ride_weight(from, to);
                let a = graph.add_node(TransitNode::on_line(from.id.clone(), line.id.clone()));
                let b = graph.add_node(TransitNode::on_line(to.id.clone(), line.id.clone()));
                graph.add_edge(a, b, weight, EdgeKind::Ride(meta.clone()));
                graph.add_edge(b, a, weight, EdgeKind::Ride(meta.clone()));
            }

            for stop in stops {
                graph.insert_stop(stop);
            }
            report.lines_routed += 1;
        }
    }

    fn add_same_stop_transfers(&self, graph: &mut TransitGraph) {
        let penalty = self
            .config
            .transfer_penalty_mins
            .max(self.config.min_edge_weight_mins);

        for stop in graph.stop_ids() {
            let nodes = graph.nodes_at(&stop).to_vec();
            for &from in &nodes {
                for &to in &nodes {
                    if graph.node(from).line != graph.node(to).line {
                        graph.add_edge(from, to, penalty, EdgeKind::Transfer);
                    }
                }
            }
        }
    }

    async fn add_walking_transfers(&self, graph: &mut TransitGraph, report: &mut BuildReport) {
        let provider = self.provider;
        let results = fetch_batched(
            graph.stop_ids(),
            self.config.fetch_batch_size,
            move |stop: StopId| async move { provider.fetch_correspondences(&stop).await },
        )
        .await;

        for (stop, result) in results {
            let correspondences = match result {
                Ok(c) => c,
                Err(e) => {
                    warn!(stop = %stop, error = %e, "Failed to fetch correspondences, skipping stop");
                    report.stops_failed += 1;
                    report.last_error = Some(e);
                    continue;
                }
            };

            let sources = graph.nodes_at(&stop).to_vec();
            for correspondence in correspondences {
                if correspondence.to_stop == stop {
                    continue;
                }

                let targets = graph.nodes_at(&correspondence.to_stop).to_vec();
                if targets.is_empty() {
                    continue;
                }

                let weight = (correspondence.walk_minutes() + self.config.transfer_penalty_mins)
                    .max(self.config.min_edge_weight_mins);
                for &from in &sources {
                    for &to in &targets {
                        graph.add_edge(from, to, weight, EdgeKind::Transfer);
                    }
                }
            }
        }
    }
}

/// Run `fetch` for every key, `batch_size` at a time.
///
/// Results come back in key order, paired with their key.
async fn fetch_batched<K, T, F, Fut>(
    keys: Vec<K>,
    batch_size: usize,
    fetch: F,
) -> Vec<(K, Result<T, NetworkError>)>
where
    K: Clone,
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<T, NetworkError>>,
{
    let mut results = Vec::with_capacity(keys.len());

    for batch in keys.chunks(batch_size.max(1)) {
        let futures: Vec<_> = batch
            .iter()
            .map(|key| {
                let fetching = fetch(key.clone());
                let key = key.clone();
                async move { (key, fetching.await) }
            })
            .collect();

        results.extend(join_all(futures).await);
    }

    results
}
