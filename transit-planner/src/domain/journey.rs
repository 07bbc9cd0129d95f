//! Journey types.
//!
//! A `Journey` is the planned itinerary between two stops: rides on lines,
//! separated by walks where a change involves moving to another stop.

use serde::Serialize;

use super::{Coordinate, LineId, Stop, TransportMode};

/// What a segment is: a ride on a line, or a walk between stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentKind {
    Transit {
        mode: TransportMode,
        line_id: LineId,
        line_name: String,
        color: String,
    },
    Walking,
}

/// One leg of a journey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneySegment {
    #[serde(flatten)]
    pub kind: SegmentKind,
    pub origin: Stop,
    pub destination: Stop,
    /// Stops passed between origin and destination, in travel order.
    pub intermediate_stops: Vec<Stop>,
    pub duration_minutes: f64,
    /// Path to draw, origin first.
    pub geometry: Vec<Coordinate>,
}

impl JourneySegment {
    pub fn is_transit(&self) -> bool {
        matches!(self.kind, SegmentKind::Transit { .. })
    }

    pub fn is_walking(&self) -> bool {
        matches!(self.kind, SegmentKind::Walking)
    }

    /// Line ridden, if this is a transit segment.
    pub fn line_id(&self) -> Option<&LineId> {
        match &self.kind {
            SegmentKind::Transit { line_id, .. } => Some(line_id),
            SegmentKind::Walking => None,
        }
    }

    /// Number of stops touched, origin and destination included.
    pub fn stop_count(&self) -> usize {
        self.intermediate_stops.len() + 2
    }

    /// Coordinates of every stop on the segment, origin first.
    pub fn stop_positions(&self) -> Vec<Coordinate> {
        std::iter::once(&self.origin)
            .chain(&self.intermediate_stops)
            .chain(std::iter::once(&self.destination))
            .map(|s| s.position)
            .collect()
    }
}

/// A complete itinerary from origin to destination.
///
/// `total_duration_minutes` is the cost of the cheapest path through the
/// routing graph. Segment durations are estimated separately and need not
/// add up to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Journey {
    origin: Stop,
    destination: Stop,
    segments: Vec<JourneySegment>,
    total_duration_minutes: f64,
    total_walking_minutes: f64,
    transfer_count: usize,
}

impl Journey {
    /// Builds a journey, deriving walking time and transfer count from the
    /// walking segments.
    pub fn new(
        origin: Stop,
        destination: Stop,
        segments: Vec<JourneySegment>,
        total_duration_minutes: f64,
    ) -> Self {
        let walks = segments.iter().filter(|s| s.is_walking());
        let total_walking_minutes = walks.clone().map(|s| s.duration_minutes).sum();
        let transfer_count = walks.count();

        Self {
            origin,
            destination,
            segments,
            total_duration_minutes,
            total_walking_minutes,
            transfer_count,
        }
    }

    pub fn origin(&self) -> &Stop {
        &self.origin
    }

    pub fn destination(&self) -> &Stop {
        &self.destination
    }

    pub fn segments(&self) -> &[JourneySegment] {
        &self.segments
    }

    pub(crate) fn segments_mut(&mut self) -> &mut [JourneySegment] {
        &mut self.segments
    }

    pub fn total_duration_minutes(&self) -> f64 {
        self.total_duration_minutes
    }

    pub fn total_walking_minutes(&self) -> f64 {
        self.total_walking_minutes
    }

    pub fn transfer_count(&self) -> usize {
        self.transfer_count
    }

    /// Lines ridden, in order.
    pub fn lines(&self) -> Vec<&LineId> {
        self.segments.iter().filter_map(|s| s.line_id()).collect()
    }
}
