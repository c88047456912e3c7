use crate::models::{Coordinate, RouteWaypoint};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: Uuid,
    pub name: String,
    /// Provider category tag, e.g. "cafe" or "museum". Open-ended rather than
    /// a closed enum: values also drive marker styling downstream, so unknown
    /// tags must survive round-trips untouched.
    pub category: String,
    pub coordinate: Coordinate,
    /// Formatted address; empty when the provider supplied none.
    #[serde(default)]
    pub address: String,
    /// 0.0 means unscored.
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub visited: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl PointOfInterest {
    pub fn new(name: String, category: String, coordinate: Coordinate, address: String) -> Self {
        PointOfInterest {
            id: Uuid::new_v4(),
            name,
            category,
            coordinate,
            address,
            rating: 0.0,
            description: String::new(),
            visited: false,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Rebuild a selectable POI from a saved route's waypoint, so a loaded
    /// route can be edited and re-optimized like a fresh selection.
    pub fn from_waypoint(waypoint: &RouteWaypoint) -> Self {
        PointOfInterest::new(
            waypoint.name.clone(),
            "waypoint".to_string(),
            waypoint.coordinate,
            String::new(),
        )
    }
}
