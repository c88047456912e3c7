use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use wayplan::directions::{DirectionsApi, Segment};
use wayplan::error::Result;
use wayplan::models::{Coordinate, PointOfInterest, TransportMode};
use wayplan::search::SearchGateway;

/// In-memory SQLite pool. A single connection keeps every query on the same
/// database.
#[allow(dead_code)]
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool")
}

#[allow(dead_code)]
pub fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).expect("test coordinate out of range")
}

/// Directions stub that answers with the straight-line distance at walking
/// pace (1.4 m/s).
pub struct StraightLineDirections;

#[async_trait]
impl DirectionsApi for StraightLineDirections {
    async fn resolve(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        _mode: TransportMode,
    ) -> Result<Segment> {
        let distance = origin.distance_to(&destination);
        Ok(Segment {
            distance_meters: distance,
            duration_seconds: distance / 1.4,
            path: vec![origin, destination],
        })
    }
}

/// Search stub that returns one POI at the query location.
#[allow(dead_code)]
pub struct StubSearchGateway;

#[async_trait]
impl SearchGateway for StubSearchGateway {
    async fn search(
        &self,
        query: &str,
        near: Coordinate,
        _radius_meters: f64,
    ) -> Result<Vec<PointOfInterest>> {
        Ok(vec![PointOfInterest::new(
            format!("{} spot", query),
            query.to_string(),
            near,
            "1 Test Street".to_string(),
        )])
    }
}
