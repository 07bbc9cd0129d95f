use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use transit_planner::cache::{CacheConfig, CachedNetwork};
use transit_planner::catalog::Catalog;
use transit_planner::network::{NetworkClient, NetworkConfig, NetworkSource, StaticNetwork};
use transit_planner::planner::PlannerConfig;
use transit_planner::web::{AppState, create_router};

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

fn init_logger() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();
}

/// Pick the network source from the environment.
///
/// A static data file takes precedence over the live API.
async fn network_source() -> NetworkSource {
    if let Ok(path) = std::env::var("NETWORK_DATA_FILE") {
        info!(path = %path, "Loading static network");
        let network = StaticNetwork::load(&path)
            .await
            .expect("Failed to load network data file");
        return NetworkSource::Static(network);
    }

    let api_key = std::env::var("NETWORK_API_KEY").unwrap_or_else(|_| {
        warn!("NETWORK_API_KEY not set. Authenticated API calls will fail.");
        String::new()
    });

    let mut config = NetworkConfig::new(api_key);
    if let Ok(url) = std::env::var("NETWORK_API_URL") {
        config = config.with_base_url(url);
    }
    info!(base_url = %config.base_url, "Using network API");

    NetworkSource::Http(NetworkClient::new(config).expect("Failed to create network client"))
}

#[tokio::main]
async fn main() {
    init_logger();

    let source = network_source().await;

    // Fetch the line catalog (fail fast if unavailable)
    let lines = source
        .fetch_lines()
        .await
        .expect("Failed to fetch line catalog");
    let catalog = Catalog::new(lines);
    info!(lines = catalog.len(), "Loaded line catalog");

    let network = CachedNetwork::new(source, &CacheConfig::default());
    let state = AppState::new(network, catalog, PlannerConfig::default());
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .expect("Invalid BIND_ADDR");

    info!(%addr, "Transit journey planner listening");
    info!("  GET  /health                  - Health check");
    info!("  GET  /lines                   - Line catalog");
    info!("  GET  /journey?from=..&to=..   - Plan a journey");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
