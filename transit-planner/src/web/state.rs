//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedNetwork;
use crate::catalog::Catalog;
use crate::network::NetworkSource;
use crate::planner::PlannerConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached network provider
    pub network: Arc<CachedNetwork<NetworkSource>>,

    /// Lines available for routing
    pub catalog: Arc<Catalog>,

    /// Journey planner configuration
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        network: CachedNetwork<NetworkSource>,
        catalog: Catalog,
        config: PlannerConfig,
    ) -> Self {
        Self {
            network: Arc::new(network),
            catalog: Arc::new(catalog),
            config: Arc::new(config),
        }
    }
}
