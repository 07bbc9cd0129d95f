//! Runtime choice between the live API and a static network file.

use crate::domain::{Coordinate, Correspondence, Line, RouteId, Stop, StopId};

use super::client::NetworkClient;
use super::error::NetworkError;
use super::provider::NetworkProvider;
use super::static_network::StaticNetwork;

/// The network provider selected at startup.
#[derive(Debug, Clone)]
pub enum NetworkSource {
    Http(NetworkClient),
    Static(StaticNetwork),
}

impl NetworkSource {
    /// Fetch the line catalog from whichever source is configured.
    pub async fn fetch_lines(&self) -> Result<Vec<Line>, NetworkError> {
        match self {
            NetworkSource::Http(client) => client.fetch_lines().await,
            NetworkSource::Static(network) => Ok(network.lines().to_vec()),
        }
    }
}

impl NetworkProvider for NetworkSource {
    async fn fetch_stops_for_route(&self, route: &RouteId) -> Result<Vec<Stop>, NetworkError> {
        match self {
            NetworkSource::Http(client) => client.fetch_stops_for_route(route).await,
            NetworkSource::Static(network) => network.fetch_stops_for_route(route).await,
        }
    }

    async fn fetch_correspondences(
        &self,
        stop: &StopId,
    ) -> Result<Vec<Correspondence>, NetworkError> {
        match self {
            NetworkSource::Http(client) => client.fetch_correspondences(stop).await,
            NetworkSource::Static(network) => network.fetch_correspondences(stop).await,
        }
    }

    async fn fetch_route_shape(&self, route: &RouteId) -> Result<Vec<Coordinate>, NetworkError> {
        match self {
            NetworkSource::Http(client) => client.fetch_route_shape(route).await,
            NetworkSource::Static(network) => network.fetch_route_shape(route).await,
        }
    }
}
