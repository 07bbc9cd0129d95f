//! In-memory network for offline use and testing.
//!
//! Serves a whole network (lines, route stop lists, correspondences and
//! shapes) from memory, optionally loaded from a single JSON file, as if it
//! were the live API.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::domain::{Coordinate, Correspondence, Line, RouteId, Stop, StopId};

use super::error::NetworkError;
use super::provider::NetworkProvider;

/// On-disk layout of a static network file.
#[derive(Debug, Default, Deserialize)]
struct NetworkFile {
    #[serde(default)]
    lines: Vec<Line>,
    #[serde(default)]
    routes: HashMap<RouteId, Vec<Stop>>,
    #[serde(default)]
    correspondences: HashMap<StopId, Vec<Correspondence>>,
    #[serde(default)]
    shapes: HashMap<RouteId, Vec<Coordinate>>,
}

/// Network data held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticNetwork {
    lines: Vec<Line>,
    routes: HashMap<RouteId, Vec<Stop>>,
    correspondences: HashMap<StopId, Vec<Correspondence>>,
    shapes: HashMap<RouteId, Vec<Coordinate>>,
    failing_routes: HashSet<RouteId>,
    failing_stops: HashSet<StopId>,
}

impl StaticNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a network from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        let file: NetworkFile = serde_json::from_str(json).map_err(|e| NetworkError::Json {
            message: e.to_string(),
            body: None,
        })?;

        Ok(Self {
            lines: file.lines,
            routes: file.routes,
            correspondences: file.correspondences,
            shapes: file.shapes,
            ..Self::default()
        })
    }

    /// Load a network from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| NetworkError::Data(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Add a line to the catalog listing.
    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    /// Set the stop list of a route.
    pub fn with_route(mut self, route: RouteId, stops: Vec<Stop>) -> Self {
        self.routes.insert(route, stops);
        self
    }

    /// Add a correspondence leaving `from`.
    pub fn with_correspondence(mut self, from: StopId, correspondence: Correspondence) -> Self {
        self.correspondences
            .entry(from)
            .or_default()
            .push(correspondence);
        self
    }

    /// Set the shape of a route.
    pub fn with_shape(mut self, route: RouteId, shape: Vec<Coordinate>) -> Self {
        self.shapes.insert(route, shape);
        self
    }

    /// Make every fetch for this route fail, as a flaky backend would.
    pub fn with_failing_route(mut self, route: RouteId) -> Self {
        self.failing_routes.insert(route);
        self
    }

    /// Make correspondence fetches for this stop fail.
    pub fn with_failing_stop(mut self, stop: StopId) -> Self {
        self.failing_stops.insert(stop);
        self
    }

    /// Lines in this network.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn unavailable(what: String) -> NetworkError {
        NetworkError::Api {
            status: 503,
            message: format!("{what} unavailable"),
        }
    }
}

impl NetworkProvider for StaticNetwork {
    async fn fetch_stops_for_route(&self, route: &RouteId) -> Result<Vec<Stop>, NetworkError> {
        if self.failing_routes.contains(route) {
            return Err(Self::unavailable(format!("route {route}")));
        }
        self.routes
            .get(route)
            .cloned()
            .ok_or_else(|| NetworkError::NotFound(format!("route {route}")))
    }

    async fn fetch_correspondences(
        &self,
        stop: &StopId,
    ) -> Result<Vec<Correspondence>, NetworkError> {
        if self.failing_stops.contains(stop) {
            return Err(Self::unavailable(format!("stop {stop}")));
        }
        // Stops without correspondences are normal: answer with an empty list
        Ok(self.correspondences.get(stop).cloned().unwrap_or_default())
    }

    async fn fetch_route_shape(&self, route: &RouteId) -> Result<Vec<Coordinate>, NetworkError> {
        if self.failing_routes.contains(route) {
            return Err(Self::unavailable(format!("shape of route {route}")));
        }
        Ok(self.shapes.get(route).cloned().unwrap_or_default())
    }
}
