// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod db;
pub mod directions;
pub mod error;
pub mod location;
pub mod models;
pub mod planner;
pub mod routes;
pub mod search;

// Re-export commonly used types
pub use error::{AppError, Result};

use crate::db::PoiStore;
use crate::location::LocationProvider;
use crate::planner::RoutePlanner;
use crate::search::PoiSearch;
use std::sync::Arc;
use tokio::sync::Mutex;

// App state for sharing across the application.
// One logical planning session per process: the working route and the cached
// saved-route list live inside the planner, mutated by one user action at a
// time behind the mutex.
pub struct AppState {
    pub planner: Mutex<RoutePlanner>,
    pub search: PoiSearch,
    pub poi_store: Arc<dyn PoiStore>,
    pub location: Arc<dyn LocationProvider>,
    pub default_search_radius_m: f64,
}
