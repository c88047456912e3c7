mod poi_store;
mod route_repository;

pub use poi_store::SqlitePoiStore;
pub use route_repository::SqliteRouteRepository;

use crate::error::Result;
use crate::models::{PointOfInterest, SavedRoute};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::time::Duration;
use uuid::Uuid;

/// Persistence for named routes. A route exclusively owns its waypoints:
/// deleting the route deletes them.
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// All saved routes, most recently modified first.
    async fn list(&self) -> Result<Vec<SavedRoute>>;

    async fn insert(&self, route: &SavedRoute) -> Result<()>;

    /// Remove a route and its waypoints.
    async fn delete(&self, route_id: Uuid) -> Result<()>;
}

/// Persistence for user-saved points of interest.
#[async_trait]
pub trait PoiStore: Send + Sync {
    async fn insert(&self, poi: &PointOfInterest) -> Result<()>;

    /// Saved POIs, newest first.
    async fn list(&self) -> Result<Vec<PointOfInterest>>;
}

pub async fn create_pool(database_url: &str) -> std::result::Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}
