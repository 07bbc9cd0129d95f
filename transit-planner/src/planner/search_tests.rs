//! Scenario tests for journey planning.

use super::*;
use crate::domain::{
    Coordinate, Correspondence, Line, LineId, RouteId, SegmentKind, Stop, TransportMode,
};
use crate::network::StaticNetwork;
use crate::planner::graph::NodeId;
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Mutex;

fn stop_id(s: &str) -> StopId {
    StopId::parse(s).unwrap()
}

fn line_id(s: &str) -> LineId {
    LineId::parse(s).unwrap()
}

fn route_id(s: &str) -> RouteId {
    RouteId::parse(s).unwrap()
}

/// Latitude `m` meters north of 40N along the -3.7 meridian.
fn north(m: f64) -> Coordinate {
    Coordinate::new(40.0 + m / (6_371_008.8 * std::f64::consts::PI / 180.0), -3.7)
}

fn stop(id: &str, north_m: f64) -> Stop {
    Stop::new(stop_id(id), id, north(north_m))
}

fn line(id: &str, route: &str, mode: TransportMode) -> Line {
    Line::new(line_id(id), id, mode).with_route(route_id(route))
}

/// L1: A -2km- B -3km- C; correspondence C -> D (300 s); L2: D -1km- E.
fn scenario() -> (StaticNetwork, Catalog) {
    let network = StaticNetwork::new()
        .with_route(
            route_id("R1"),
            vec![stop("A", 0.0), stop("B", 2000.0), stop("C", 5000.0)],
        )
        .with_route(route_id("R2"), vec![stop("D", 5200.0), stop("E", 6200.0)])
        .with_correspondence(stop_id("C"), Correspondence::new(stop_id("D"), 300.0, 200.0));
    let catalog = Catalog::new(vec![
        line("L1", "R1", TransportMode::Metro),
        line("L2", "R2", TransportMode::Tram),
    ]);
    (network, catalog)
}

/// Wraps a network and counts shape fetches per route.
struct CountingProvider {
    inner: StaticNetwork,
    shape_calls: Mutex<HashMap<RouteId, usize>>,
}

impl CountingProvider {
    fn new(inner: StaticNetwork) -> Self {
        Self {
            inner,
            shape_calls: Mutex::new(HashMap::new()),
        }
    }

    fn shape_calls(&self) -> HashMap<RouteId, usize> {
        self.shape_calls.lock().unwrap().clone()
    }
}

impl NetworkProvider for CountingProvider {
    async fn fetch_stops_for_route(
        &self,
        route: &RouteId,
    ) -> Result<Vec<Stop>, NetworkError> {
        self.inner.fetch_stops_for_route(route).await
    }

    async fn fetch_correspondences(
        &self,
        stop: &StopId,
    ) -> Result<Vec<Correspondence>, NetworkError> {
        self.inner.fetch_correspondences(stop).await
    }

    async fn fetch_route_shape(&self, route: &RouteId) -> Result<Vec<Coordinate>, NetworkError> {
        *self
            .shape_calls
            .lock()
            .unwrap()
            .entry(route.clone())
            .or_default() += 1;
        self.inner.fetch_route_shape(route).await
    }
}

#[tokio::test]
async fn ride_walk_ride_scenario() {
    let (network, catalog) = scenario();
    let config = PlannerConfig::default();
    let planner = Planner::new(&network, &catalog, &config);

    let journey = planner
        .find_route(&stop_id("A"), &stop_id("E"))
        .await
        .unwrap()
        .unwrap();

    // 4 + 6 ride, 5 + 3 walk transfer, 2 ride
    assert!((journey.total_duration_minutes() - 20.0).abs() < 1e-3);
    assert_eq!(journey.origin().id, stop_id("A"));
    assert_eq!(journey.destination().id, stop_id("E"));

    let segments = journey.segments();
    assert_eq!(segments.len(), 3);

    assert_eq!(segments[0].line_id(), Some(&line_id("L1")));
    assert_eq!(segments[0].origin.id, stop_id("A"));
    assert_eq!(segments[0].destination.id, stop_id("C"));
    assert_eq!(segments[0].intermediate_stops.len(), 1);

    assert!(segments[1].is_walking());
    assert_eq!(segments[1].origin.id, stop_id("C"));
    assert_eq!(segments[1].destination.id, stop_id("D"));
    assert_eq!(segments[1].geometry.len(), 15);

    assert_eq!(segments[2].line_id(), Some(&line_id("L2")));
    assert_eq!(segments[2].origin.id, stop_id("D"));
    assert_eq!(segments[2].destination.id, stop_id("E"));

    assert_eq!(journey.transfer_count(), 1);
    assert_eq!(journey.total_walking_minutes(), segments[1].duration_minutes);
    assert_eq!(journey.lines(), vec![&line_id("L1"), &line_id("L2")]);
}

#[tokio::test]
async fn rides_without_shapes_draw_stop_positions() {
    let (network, catalog) = scenario();
    let config = PlannerConfig::default();
    let planner = Planner::new(&network, &catalog, &config);

    let journey = planner
        .find_route(&stop_id("A"), &stop_id("E"))
        .await
        .unwrap()
        .unwrap();

    let ride = &journey.segments()[0];
    assert_eq!(ride.geometry, vec![north(0.0), north(2000.0), north(5000.0)]);
}

#[tokio::test]
async fn rides_follow_route_shape() {
    let (network, catalog) = scenario();
    let shape: Vec<Coordinate> = (0..=50).map(|i| north(i as f64 * 100.0)).collect();
    let network = network.with_shape(route_id("R1"), shape.clone());
    let config = PlannerConfig::default();
    let planner = Planner::new(&network, &catalog, &config);

    let journey = planner
        .find_route(&stop_id("A"), &stop_id("C"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(journey.segments().len(), 1);
    assert_eq!(journey.segments()[0].geometry, shape);
}

#[tokio::test]
async fn reverse_direction_runs_from_origin() {
    let (network, catalog) = scenario();
    let shape: Vec<Coordinate> = (0..=50).map(|i| north(i as f64 * 100.0)).collect();
    let network = network.with_shape(route_id("R1"), shape.clone());
    let config = PlannerConfig::default();
    let planner = Planner::new(&network, &catalog, &config);

    let journey = planner
        .find_route(&stop_id("C"), &stop_id("A"))
        .await
        .unwrap()
        .unwrap();

    let geometry = &journey.segments()[0].geometry;
    assert_eq!(geometry.first(), Some(&shape[50]));
    assert_eq!(geometry.last(), Some(&shape[0]));
}

#[tokio::test]
async fn shapes_fetched_once_per_line() {
    let (network, catalog) = scenario();
    let provider = CountingProvider::new(network);
    let config = PlannerConfig::default();
    let planner = Planner::new(&provider, &catalog, &config);

    planner
        .find_route(&stop_id("A"), &stop_id("E"))
        .await
        .unwrap()
        .unwrap();

    let calls = provider.shape_calls();
    assert_eq!(calls.get(&route_id("R1")), Some(&1));
    assert_eq!(calls.get(&route_id("R2")), Some(&1));
}

#[tokio::test]
async fn disjoint_components_have_no_route() {
    let network = StaticNetwork::new()
        .with_route(route_id("R1"), vec![stop("A", 0.0), stop("B", 1000.0)])
        .with_route(route_id("R2"), vec![stop("X", 5000.0), stop("Y", 6000.0)]);
    let catalog = Catalog::new(vec![
        line("L1", "R1", TransportMode::Metro),
        line("L2", "R2", TransportMode::Metro),
    ]);
    let config = PlannerConfig::default();
    let planner = Planner::new(&network, &catalog, &config);

    let result = planner.find_route(&stop_id("A"), &stop_id("Y")).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn correspondences_are_one_way() {
    let (network, catalog) = scenario();
    let config = PlannerConfig::default();
    let planner = Planner::new(&network, &catalog, &config);

    let result = planner.find_route(&stop_id("E"), &stop_id("A")).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn unknown_stops_rejected() {
    let (network, catalog) = scenario();
    let config = PlannerConfig::default();
    let planner = Planner::new(&network, &catalog, &config);

    let err = planner
        .find_route(&stop_id("NOPE"), &stop_id("E"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::StopNotFound(ref s) if *s == stop_id("NOPE")));

    let err = planner
        .find_route(&stop_id("A"), &stop_id("NOPE"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::StopNotFound(ref s) if *s == stop_id("NOPE")));
}

#[tokio::test]
async fn stops_of_failed_lines_are_unknown() {
    let (network, catalog) = scenario();
    let network = network.with_failing_route(route_id("R2"));
    let config = PlannerConfig::default();
    let planner = Planner::new(&network, &catalog, &config);

    let err = planner
        .find_route(&stop_id("A"), &stop_id("E"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::StopNotFound(_)));

    // The surviving line still routes
    let journey = planner
        .find_route(&stop_id("A"), &stop_id("C"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(journey.segments().len(), 1);
}

#[tokio::test]
async fn every_line_failing_is_network_unavailable() {
    let (network, catalog) = scenario();
    let network = network
        .with_failing_route(route_id("R1"))
        .with_failing_route(route_id("R2"));
    let config = PlannerConfig::default();
    let planner = Planner::new(&network, &catalog, &config);

    let err = planner
        .find_route(&stop_id("A"), &stop_id("E"))
        .await
        .unwrap_err();
    match err {
        PlanError::NetworkUnavailable(source) => assert!(source.is_transient()),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn routeless_lines_do_not_mask_an_outage() {
    let (network, catalog) = scenario();
    let network = network
        .with_failing_route(route_id("R1"))
        .with_failing_route(route_id("R2"));
    let mut lines = catalog.lines().to_vec();
    lines.push(Line::new(line_id("L3"), "3", TransportMode::Tram));
    let catalog = Catalog::new(lines);
    let config = PlannerConfig::default();
    let planner = Planner::new(&network, &catalog, &config);

    let err = planner
        .find_route(&stop_id("A"), &stop_id("E"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::NetworkUnavailable(_)), "{err}");
}

#[tokio::test]
async fn cancelled_search() {
    let (network, catalog) = scenario();
    let config = PlannerConfig::default();
    let cancel = CancelFlag::new();
    cancel.cancel();
    let planner = Planner::new(&network, &catalog, &config).with_cancel(cancel);

    let err = planner
        .find_route(&stop_id("A"), &stop_id("E"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::Cancelled));
}

#[tokio::test]
async fn origin_is_destination() {
    let (network, catalog) = scenario();
    let config = PlannerConfig::default();
    let planner = Planner::new(&network, &catalog, &config);

    let journey = planner
        .find_route(&stop_id("B"), &stop_id("B"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(journey.total_duration_minutes(), 0.0);
    assert!(journey.segments().is_empty());
}

#[tokio::test]
async fn equal_cost_origins_prefer_lowest_line_id() {
    // Two lines running over the same two stops
    let network = StaticNetwork::new()
        .with_route(route_id("R1"), vec![stop("O", 0.0), stop("P", 3000.0)])
        .with_route(route_id("R2"), vec![stop("O", 0.0), stop("P", 3000.0)]);
    let catalog = Catalog::new(vec![
        line("L2", "R2", TransportMode::Tram),
        line("L1", "R1", TransportMode::Metro),
    ]);
    let config = PlannerConfig::default();
    let planner = Planner::new(&network, &catalog, &config);

    for _ in 0..5 {
        let journey = planner
            .find_route(&stop_id("O"), &stop_id("P"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(journey.lines(), vec![&line_id("L1")]);
    }
}

#[tokio::test]
async fn same_stop_change_costs_penalty() {
    // L1: A - X, L2: X - Z. Change at X without walking.
    let network = StaticNetwork::new()
        .with_route(route_id("R1"), vec![stop("A", 0.0), stop("X", 1000.0)])
        .with_route(route_id("R2"), vec![stop("X", 1000.0), stop("Z", 2500.0)]);
    let catalog = Catalog::new(vec![
        line("L1", "R1", TransportMode::Metro),
        line("L2", "R2", TransportMode::Metro),
    ]);
    let config = PlannerConfig::default();
    let planner = Planner::new(&network, &catalog, &config);

    let journey = planner
        .find_route(&stop_id("A"), &stop_id("Z"))
        .await
        .unwrap()
        .unwrap();

    // 2 + 3 + 3
    assert!((journey.total_duration_minutes() - 8.0).abs() < 1e-3);
    assert_eq!(journey.transfer_count(), 0);
    assert_eq!(journey.segments().len(), 2);
    assert!(journey.segments().iter().all(|s| s.is_transit()));
}

#[tokio::test]
async fn higher_penalty_prefers_staying_on_line() {
    // L1 detours via Q: A-M-Q-Z is 2 + 10 + 6 minutes. L2 cuts across M-Z in 4.
    let network = StaticNetwork::new()
        .with_route(
            route_id("R1"),
            vec![
                stop("A", 0.0),
                stop("M", 1000.0),
                stop("Q", 6000.0),
                stop("Z", 3000.0),
            ],
        )
        .with_route(route_id("R2"), vec![stop("M", 1000.0), stop("Z", 3000.0)]);
    let catalog = Catalog::new(vec![
        line("L1", "R1", TransportMode::Metro),
        line("L2", "R2", TransportMode::Metro),
    ]);

    let cheap = PlannerConfig::default().with_transfer_penalty(1.0);
    let planner = Planner::new(&network, &catalog, &cheap);
    let journey = planner
        .find_route(&stop_id("A"), &stop_id("Z"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(journey.lines(), vec![&line_id("L1"), &line_id("L2")]);
    assert!((journey.total_duration_minutes() - 7.0).abs() < 1e-3);

    let dear = PlannerConfig::default().with_transfer_penalty(15.0);
    let planner = Planner::new(&network, &catalog, &dear);
    let journey = planner
        .find_route(&stop_id("A"), &stop_id("Z"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(journey.lines(), vec![&line_id("L1")]);
    assert!((journey.total_duration_minutes() - 18.0).abs() < 1e-3);
}

#[tokio::test]
async fn journey_serializes_to_json() {
    let (network, catalog) = scenario();
    let config = PlannerConfig::default();
    let planner = Planner::new(&network, &catalog, &config);

    let journey = planner
        .find_route(&stop_id("A"), &stop_id("E"))
        .await
        .unwrap()
        .unwrap();
    let json = serde_json::to_value(&journey).unwrap();

    assert_eq!(json["origin"]["id"], "A");
    assert_eq!(json["transfer_count"], 1);
    assert_eq!(json["segments"][0]["type"], "transit");
    assert_eq!(json["segments"][0]["mode"], "metro");
    assert_eq!(json["segments"][0]["line_id"], "L1");
    assert_eq!(json["segments"][1]["type"], "walking");
    assert_eq!(json["segments"][2]["mode"], "tram");
}

#[test]
fn segments_keep_every_stop() {
    let (network, catalog) = scenario();
    let config = PlannerConfig::default();
    let graph = build(&network, &catalog);
    let planner = Planner::new(&network, &catalog, &config);

    let journey = planner
        .plan_on_graph(&graph, &stop_id("A"), &stop_id("E"))
        .unwrap()
        .unwrap();

    let mut seen: Vec<&str> = Vec::new();
    for segment in journey.segments() {
        for stop in std::iter::once(&segment.origin)
            .chain(&segment.intermediate_stops)
            .chain(std::iter::once(&segment.destination))
        {
            if seen.last() != Some(&stop.id.as_str()) {
                seen.push(stop.id.as_str());
            }
        }
    }
    assert_eq!(seen, vec!["A", "B", "C", "D", "E"]);
    assert!(journey.segments().iter().all(|s| s.geometry.is_empty()));
}

fn build(network: &StaticNetwork, catalog: &Catalog) -> TransitGraph {
    let config = PlannerConfig::default();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    runtime
        .block_on(GraphBuilder::new(network, catalog, &config).build())
        .0
}

/// Cheapest cost over every simple path from any `from` node to any `to`
/// node, by depth-first enumeration.
fn brute_force_cost(graph: &TransitGraph, from: &StopId, to: &StopId) -> Option<f64> {
    fn dfs(
        graph: &TransitGraph,
        node: NodeId,
        goals: &[NodeId],
        cost: f64,
        visited: &mut Vec<bool>,
        best: &mut Option<f64>,
    ) {
        if goals.contains(&node) {
            if best.is_none_or(|b| cost < b) {
                *best = Some(cost);
            }
            return;
        }
        for edge in graph.edges_from(node) {
            if !visited[edge.to.0] {
                visited[edge.to.0] = true;
                dfs(graph, edge.to, goals, cost + edge.weight, visited, best);
                visited[edge.to.0] = false;
            }
        }
    }

    let goals = graph.nodes_at(to).to_vec();
    let mut best = None;
    for &start in graph.nodes_at(from) {
        let mut visited = vec![false; graph.node_count()];
        visited[start.0] = true;
        dfs(graph, start, &goals, 0.0, &mut visited, &mut best);
    }
    best
}

/// Four stops, two lines, one correspondence.
///
/// L1: S0 - S1 - S2, L2: S1 - S3, walk S2 -> S3.
fn small_network(positions: [f64; 4], walk_secs: f64) -> (StaticNetwork, Catalog) {
    let stops: Vec<Stop> = positions
        .iter()
        .enumerate()
        .map(|(i, m)| stop(&format!("S{i}"), *m))
        .collect();
    let network = StaticNetwork::new()
        .with_route(
            route_id("R1"),
            vec![stops[0].clone(), stops[1].clone(), stops[2].clone()],
        )
        .with_route(route_id("R2"), vec![stops[1].clone(), stops[3].clone()])
        .with_correspondence(
            stops[2].id.clone(),
            Correspondence::new(stops[3].id.clone(), walk_secs, 100.0),
        );
    let catalog = Catalog::new(vec![
        line("L1", "R1", TransportMode::Metro),
        line("L2", "R2", TransportMode::Commuter),
    ]);
    (network, catalog)
}

fn assert_optimal(network: &StaticNetwork, catalog: &Catalog) -> Result<(), TestCaseError> {
    let config = PlannerConfig::default();
    let graph = build(network, catalog);
    let planner = Planner::new(network, catalog, &config);
    let stops = graph.stop_ids();

    for from in &stops {
        for to in &stops {
            if from == to {
                continue;
            }
            let planned = planner
                .plan_on_graph(&graph, from, to)
                .unwrap()
                .map(|j| j.total_duration_minutes());
            let expected = brute_force_cost(&graph, from, to);

            match (planned, expected) {
                (Some(p), Some(e)) => prop_assert!((p - e).abs() < 1e-9, "{from}->{to}: {p} vs {e}"),
                (None, None) => {}
                (p, e) => prop_assert!(false, "{from}->{to}: planned {p:?}, brute force {e:?}"),
            }
        }
    }
    Ok(())
}

#[test]
fn optimal_on_small_network() {
    let (network, catalog) = small_network([0.0, 2000.0, 4500.0, 2600.0], 240.0);
    assert_optimal(&network, &catalog).unwrap();
}

proptest! {
    #[test]
    fn optimal_on_random_small_networks(
        positions in prop::array::uniform4(0.0f64..10_000.0),
        walk_secs in 0.0f64..1800.0,
    ) {
        let (network, catalog) = small_network(positions, walk_secs);
        assert_optimal(&network, &catalog)?;
    }

    #[test]
    fn total_walking_matches_walk_segments(
        positions in prop::array::uniform4(0.0f64..10_000.0),
        walk_secs in 0.0f64..1800.0,
    ) {
        let (network, catalog) = small_network(positions, walk_secs);
        let config = PlannerConfig::default();
        let graph = build(&network, &catalog);
        let planner = Planner::new(&network, &catalog, &config);

        if let Some(journey) = planner
            .plan_on_graph(&graph, &stop_id("S0"), &stop_id("S3"))
            .unwrap()
        {
            let walks: Vec<_> = journey
                .segments()
                .iter()
                .filter(|s| matches!(s.kind, SegmentKind::Walking))
                .collect();
            prop_assert_eq!(journey.transfer_count(), walks.len());
            let walked: f64 = walks.iter().map(|s| s.duration_minutes).sum();
            prop_assert!((journey.total_walking_minutes() - walked).abs() < 1e-9);
            prop_assert!(journey.total_duration_minutes() > 0.0);
        }
    }
}
