//! Turning a node path into ride and walking segments.
//!
//! Consecutive nodes on the same line form one ride. A change of line closes
//! the ride; if the change also moves to another stop, a walk between the
//! two stops is emitted. Geometry is left empty here and filled in by the
//! shape projector.

use tracing::debug;

use crate::domain::{JourneySegment, LineId, SegmentKind, Stop, StopId, travel_minutes};

use super::config::PlannerConfig;
use super::graph::{NodeId, TransitGraph};

/// A ride being accumulated while walking the path.
struct PendingRide {
    line: Option<LineId>,
    stops: Vec<StopId>,
}

pub struct SegmentReconstructor<'a> {
    graph: &'a TransitGraph,
    config: &'a PlannerConfig,
}

impl<'a> SegmentReconstructor<'a> {
    pub fn new(graph: &'a TransitGraph, config: &'a PlannerConfig) -> Self {
        Self { graph, config }
    }

    /// Group `path` into segments, in travel order.
    pub fn reconstruct(&self, path: &[NodeId]) -> Vec<JourneySegment> {
        let mut segments = Vec::new();
        let mut pending: Option<PendingRide> = None;

        for &id in path {
            let node = self.graph.node(id);

            let Some(ride) = pending.as_mut() else {
                pending = Some(PendingRide {
                    line: node.line.clone(),
                    stops: vec![node.stop.clone()],
                });
                continue;
            };

            if ride.line == node.line {
                ride.stops.push(node.stop.clone());
                continue;
            }

            let last_stop = ride.stops.last().cloned();
            let both_lines = ride.line.is_some() && node.line.is_some();
            if let Some(closed) = pending.take() {
                segments.extend(self.ride_segment(closed));
            }

            if let Some(from) = last_stop {
                if from != node.stop && both_lines {
                    segments.extend(self.walk_segment(&from, &node.stop));
                }
            }

            pending = Some(PendingRide {
                line: node.line.clone(),
                stops: vec![node.stop.clone()],
            });
        }

        if let Some(closed) = pending {
            segments.extend(self.ride_segment(closed));
        }

        segments
    }

    fn ride_segment(&self, ride: PendingRide) -> Option<JourneySegment> {
        if ride.stops.len() < 2 {
            return None;
        }
        let line = self.graph.line(ride.line.as_ref()?)?;

        let stops: Vec<Stop> = ride
            .stops
            .iter()
            .filter_map(|id| self.resolve(id))
            .collect();
        let [origin, intermediate @ .., destination] = stops.as_slice() else {
            return None;
        };

        let duration = (stops.len() as f64 * line.mode.minutes_per_stop())
            .max(self.config.min_segment_mins);

        Some(JourneySegment {
            kind: SegmentKind::Transit {
                mode: line.mode,
                line_id: line.id.clone(),
                line_name: line.name.clone(),
                color: line.color.clone(),
            },
            origin: origin.clone(),
            destination: destination.clone(),
            intermediate_stops: intermediate.to_vec(),
            duration_minutes: duration,
            geometry: Vec::new(),
        })
    }

    fn walk_segment(&self, from: &StopId, to: &StopId) -> Option<JourneySegment> {
        let origin = self.resolve(from)?;
        let destination = self.resolve(to)?;

        let meters = origin.position.haversine_meters(&destination.position);
        let duration = travel_minutes(meters, self.config.walking_speed_kmh)
            .max(self.config.min_segment_mins);

        Some(JourneySegment {
            kind: SegmentKind::Walking,
            origin,
            destination,
            intermediate_stops: Vec::new(),
            duration_minutes: duration,
            geometry: Vec::new(),
        })
    }

    fn resolve(&self, id: &StopId) -> Option<Stop> {
        let stop = self.graph.stop(id).cloned();
        if stop.is_none() {
            debug!(stop = %id, "Stop on path has no record, dropping it from the segment");
        }
        stop
    }
}
