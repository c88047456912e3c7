use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayplan::config::Config;
use wayplan::constants::DEFAULT_SEGMENT_CACHE_MAX_ENTRIES;
use wayplan::db::{PoiStore, RouteRepository, SqlitePoiStore, SqliteRouteRepository};
use wayplan::directions::{CachedDirections, DirectionsApi, MapboxDirections};
use wayplan::location::{FixedLocationProvider, LocationProvider};
use wayplan::planner::RoutePlanner;
use wayplan::search::{MapboxSearchClient, PoiSearch, SearchGateway};
use wayplan::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayplan=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting wayplan server");

    // Open the database and make sure the schema exists
    let pool = wayplan::db::create_pool(&config.database_url).await?;
    SqliteRouteRepository::create_schema(&pool).await?;
    SqlitePoiStore::create_schema(&pool).await?;
    tracing::info!("Database ready at {}", config.database_url);

    let repository: Arc<dyn RouteRepository> =
        Arc::new(SqliteRouteRepository::new(pool.clone()));
    let poi_store: Arc<dyn PoiStore> = Arc::new(SqlitePoiStore::new(pool));

    // Directions client, memoized in memory
    let mapbox = match config.mapbox_base_url.clone() {
        Some(base_url) => {
            MapboxDirections::with_base_url(config.mapbox_api_key.clone(), base_url)
        }
        None => MapboxDirections::new(config.mapbox_api_key.clone()),
    };
    let directions: Arc<dyn DirectionsApi> = Arc::new(CachedDirections::new(
        mapbox,
        config.segment_cache_ttl,
        DEFAULT_SEGMENT_CACHE_MAX_ENTRIES,
    ));

    let gateway: Arc<dyn SearchGateway> =
        Arc::new(MapboxSearchClient::new(config.mapbox_api_key.clone()));
    let location: Arc<dyn LocationProvider> =
        Arc::new(FixedLocationProvider::new(config.device_location));

    // One planning session per process; warm its saved-route cache
    let mut planner = RoutePlanner::new(
        directions,
        repository,
        Duration::from_secs(config.segment_timeout_secs),
    );
    planner.refresh_saved_routes().await?;
    tracing::info!(saved_routes = planner.saved_routes().len(), "Planner ready");

    let state = Arc::new(AppState {
        planner: Mutex::new(planner),
        search: PoiSearch::new(gateway),
        poi_store,
        location,
        default_search_radius_m: config.search_radius_m,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", wayplan::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
