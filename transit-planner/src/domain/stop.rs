//! Stops, lines and walking correspondences as supplied by the network.

use serde::{Deserialize, Serialize};

use super::{Coordinate, LineId, RouteId, StopId, TransportMode};

/// A physical stop with its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    #[serde(flatten)]
    pub position: Coordinate,
}

impl Stop {
    pub fn new(id: StopId, name: impl Into<String>, position: Coordinate) -> Self {
        Self {
            id,
            name: name.into(),
            position,
        }
    }
}

/// A known walking link from one stop to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    /// Stop reached by walking.
    pub to_stop: StopId,
    /// Walking time in seconds.
    pub walk_time_secs: f64,
    /// Walking distance in meters.
    pub distance_m: f64,
}

impl Correspondence {
    pub fn new(to_stop: StopId, walk_time_secs: f64, distance_m: f64) -> Self {
        Self {
            to_stop,
            walk_time_secs,
            distance_m,
        }
    }

    /// Walking time in minutes.
    pub fn walk_minutes(&self) -> f64 {
        self.walk_time_secs / 60.0
    }
}

/// A commercial line from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    /// Short display name, e.g. "L1" or "C-4".
    pub name: String,
    /// Hex RGB without '#'; falls back to the mode's color.
    #[serde(default)]
    pub color: Option<String>,
    pub mode: TransportMode,
    /// Routes (itineraries) of this line; the first one is routed on.
    #[serde(default)]
    pub routes: Vec<RouteId>,
}

impl Line {
    pub fn new(id: LineId, name: impl Into<String>, mode: TransportMode) -> Self {
        Self {
            id,
            name: name.into(),
            color: None,
            mode,
            routes: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_route(mut self, route: RouteId) -> Self {
        self.routes.push(route);
        self
    }

    /// The route whose stops and shape represent this line.
    pub fn primary_route(&self) -> Option<&RouteId> {
        self.routes.first()
    }

    /// The line's own color, or the default color of its mode.
    pub fn display_color(&self) -> &str {
        self.color
            .as_deref()
            .unwrap_or_else(|| self.mode.default_color())
    }
}
