mod cached;
mod mapbox;

pub use cached::CachedDirections;
pub use mapbox::MapboxDirections;

use crate::error::Result;
use crate::models::{Coordinate, TransportMode};
use async_trait::async_trait;
use serde::Serialize;

/// One resolved travel leg between two consecutive waypoints.
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// Polyline for display; the planner only passes it through.
    pub path: Vec<Coordinate>,
}

/// Capability to resolve an origin/destination pair into a travel segment.
/// The planner depends on this seam, never on a concrete provider.
#[async_trait]
pub trait DirectionsApi: Send + Sync {
    async fn resolve(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TransportMode,
    ) -> Result<Segment>;
}
