use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use charge_server::cache::{StatusCache, StatusCacheConfig};
use charge_server::opendata::{ChargerInfoClient, ChargerInfoConfig, MockStatusSource};
use charge_server::stations::{StationDirectory, load_stations};
use charge_server::web::{AppState, create_router};

/// Default port, matching what the frontend dev setup expects.
const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load the static station snapshot (fail fast if unavailable)
    let csv_path =
        std::env::var("STATIONS_CSV").unwrap_or_else(|_| "data/stations.csv".to_string());
    let stations = load_stations(&csv_path)
        .unwrap_or_else(|e| panic!("Failed to load station snapshot from {csv_path}: {e}"));
    println!("Loaded {} stations from {csv_path}", stations.len());

    // Build the status cache over the real client, or a mock source when
    // no service key is configured.
    let cache_config = StatusCacheConfig::default();
    let status = match std::env::var("CHARGER_API_SERVICE_KEY") {
        Ok(service_key) if !service_key.is_empty() => {
            let client_config = ChargerInfoConfig::new(service_key);
            let client =
                ChargerInfoClient::new(client_config).expect("Failed to create charger client");
            StatusCache::new(Arc::new(client), &cache_config)
        }
        _ => {
            eprintln!(
                "Warning: CHARGER_API_SERVICE_KEY not set. Serving mock charger statuses."
            );
            let mock = MockStatusSource::all_available(&stations);
            StatusCache::new(Arc::new(mock), &cache_config)
        }
    };

    // Build app state and router
    let state = AppState::new(StationDirectory::new(stations), status);
    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "dist".to_string());
    let app = create_router(state, &static_dir);

    // Bind and serve
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("EV charge map listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET /health              - Health check");
    println!("  GET /api/stations        - Station snapshot");
    println!("  GET /api/stations/:id    - One station");
    println!("  GET /api/charger-status  - Live availability (?statId=...)");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
