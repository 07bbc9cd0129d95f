//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Journey, Line, TransportMode};

/// Query for a journey between two stops.
#[derive(Debug, Deserialize)]
pub struct JourneyQuery {
    /// Origin stop id
    pub from: String,

    /// Destination stop id
    pub to: String,
}

/// Result of a journey query.
///
/// `journey` is `null` when the stops exist but no route connects them.
#[derive(Debug, Serialize)]
pub struct JourneyResponse {
    pub from: String,
    pub to: String,
    pub journey: Option<Journey>,
}

/// A line in the catalog listing.
#[derive(Debug, Serialize)]
pub struct LineResult {
    pub id: String,
    pub name: String,

    /// Hex RGB without '#'
    pub color: String,

    pub mode: TransportMode,

    /// Human-readable mode, e.g. "Cercanías"
    pub mode_label: &'static str,

    /// Icon name for map markers
    pub icon: &'static str,

    /// Whether the line has a route to plan on
    pub routable: bool,
}

impl LineResult {
    pub fn from_line(line: &Line) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            color: line.display_color().to_string(),
            mode: line.mode,
            mode_label: line.mode.label(),
            icon: line.mode.icon(),
            routable: line.primary_route().is_some(),
        }
    }
}

/// Catalog listing.
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub lines: Vec<LineResult>,
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
