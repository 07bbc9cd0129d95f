//! Segment geometry.
//!
//! Ride segments are drawn along their line's published shape, cut between
//! the points nearest to the segment's end stops. When no usable shape
//! exists the stop coordinates are drawn instead. Walking segments are
//! straight lines.

use std::collections::HashMap;

use tracing::debug;

use crate::catalog::Catalog;
use crate::domain::{
    Coordinate, JourneySegment, LineId, SegmentKind, densify, interpolate_line,
};
use crate::network::NetworkProvider;

use super::config::PlannerConfig;

/// Fills in segment geometry for one planning session.
///
/// Each line's shape is fetched at most once, however many segments ride it.
pub struct ShapeProjector<'a, P: NetworkProvider> {
    provider: &'a P,
    catalog: &'a Catalog,
    config: &'a PlannerConfig,
    shapes: HashMap<LineId, Option<Vec<Coordinate>>>,
    fetches: usize,
}

impl<'a, P: NetworkProvider> ShapeProjector<'a, P> {
    pub fn new(provider: &'a P, catalog: &'a Catalog, config: &'a PlannerConfig) -> Self {
        Self {
            provider,
            catalog,
            config,
            shapes: HashMap::new(),
            fetches: 0,
        }
    }

    /// Number of shape fetches issued so far.
    pub fn fetches(&self) -> usize {
        self.fetches
    }

    /// Set the geometry of every segment.
    pub async fn project(&mut self, segments: &mut [JourneySegment]) {
        for segment in segments.iter_mut() {
            let geometry = match &segment.kind {
                SegmentKind::Walking => interpolate_line(
                    segment.origin.position,
                    segment.destination.position,
                    self.config.walk_geometry_points,
                ),
                SegmentKind::Transit { line_id, .. } => {
                    self.load_shape(line_id).await;
                    let shape = self.shapes.get(line_id).and_then(|s| s.as_deref());
                    self.ride_geometry(shape, segment)
                }
            };
            segment.geometry = geometry;
        }
    }

    fn ride_geometry(
        &self,
        shape: Option<&[Coordinate]>,
        segment: &JourneySegment,
    ) -> Vec<Coordinate> {
        let Some(shape) = shape.filter(|s| s.len() >= 2) else {
            return segment.stop_positions();
        };

        let extracted = extract_shape_segment(
            shape,
            segment.origin.position,
            segment.destination.position,
        );
        if extracted.len() < 2 {
            return segment.stop_positions();
        }

        if extracted.len() < self.config.shape_dense_threshold {
            densify(&extracted, self.config.upsample_target(extracted.len()))
        } else {
            extracted
        }
    }

    async fn load_shape(&mut self, line_id: &LineId) {
        if !self.shapes.contains_key(line_id) {
            let shape = self.fetch_shape(line_id).await;
            self.shapes.insert(line_id.clone(), shape);
        }
    }

    async fn fetch_shape(&mut self, line_id: &LineId) -> Option<Vec<Coordinate>> {
        let route = self.catalog.get(line_id)?.primary_route()?.clone();

        self.fetches += 1;
        match self.provider.fetch_route_shape(&route).await {
            Ok(shape) if !shape.is_empty() => Some(shape),
            Ok(_) => {
                debug!(line = %line_id, route = %route, "Route has no shape");
                None
            }
            Err(e) => {
                debug!(line = %line_id, route = %route, error = %e, "Failed to fetch route shape");
                None
            }
        }
    }
}

/// The part of `shape` between the points nearest to `from` and `to`,
/// running from `from` towards `to`.
///
/// Nearest means smallest planar distance in degrees; ties go to the lower
/// index. An empty shape yields an empty result.
pub fn extract_shape_segment(
    shape: &[Coordinate],
    from: Coordinate,
    to: Coordinate,
) -> Vec<Coordinate> {
    let (Some(start), Some(end)) = (nearest_index(shape, from), nearest_index(shape, to)) else {
        return Vec::new();
    };

    if start <= end {
        shape[start..=end].to_vec()
    } else {
        shape[end..=start].iter().rev().copied().collect()
    }
}

fn nearest_index(shape: &[Coordinate], target: Coordinate) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, point) in shape.iter().enumerate() {
        let d = point.planar_distance(&target);
        if best.is_none_or(|(_, b)| d < b) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}
