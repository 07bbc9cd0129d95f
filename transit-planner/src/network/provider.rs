//! The data-provider seam between the planner and the transit network.

use std::future::Future;

use crate::domain::{Coordinate, Correspondence, RouteId, Stop, StopId};

use super::NetworkError;

/// Source of network data for graph building and shape projection.
///
/// Implementations may hit a remote API, serve from memory, or wrap another
/// provider with a cache. Implementors can write the methods as `async fn`.
pub trait NetworkProvider: Send + Sync {
    /// Ordered stop sequence of a route.
    fn fetch_stops_for_route(
        &self,
        route: &RouteId,
    ) -> impl Future<Output = Result<Vec<Stop>, NetworkError>> + Send;

    /// Walking correspondences leaving a stop.
    fn fetch_correspondences(
        &self,
        stop: &StopId,
    ) -> impl Future<Output = Result<Vec<Correspondence>, NetworkError>> + Send;

    /// Published shape of a route, in travel order.
    fn fetch_route_shape(
        &self,
        route: &RouteId,
    ) -> impl Future<Output = Result<Vec<Coordinate>, NetworkError>> + Send;
}
