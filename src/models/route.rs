use crate::models::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Driving,
    Walking,
    Transit,
}

impl TransportMode {
    /// Returns the Mapbox routing profile for this transport mode.
    /// Mapbox has no transit profile; driving-traffic is the closest stand-in.
    pub fn profile(&self) -> &str {
        match self {
            TransportMode::Driving => "driving",
            TransportMode::Walking => "walking",
            TransportMode::Transit => "driving-traffic",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Driving => write!(f, "driving"),
            TransportMode::Walking => write!(f, "walking"),
            TransportMode::Transit => write!(f, "transit"),
        }
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "driving" | "drive" | "car" => Ok(TransportMode::Driving),
            "walking" | "walk" | "foot" => Ok(TransportMode::Walking),
            "transit" | "public" => Ok(TransportMode::Transit),
            _ => Err(format!("Invalid transport mode: '{}'", s)),
        }
    }
}

/// One stop in an ordered route. `distance_to_next` / `travel_time_to_next`
/// describe the leg toward the following stop and stay zero on the last one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteWaypoint {
    pub id: Uuid,
    pub coordinate: Coordinate,
    pub name: String,
    /// 0-based position; contiguous and unique within one route.
    pub order: u32,
    /// Meters to the next waypoint; 0 for the last.
    pub distance_to_next: f64,
    /// Seconds to the next waypoint; 0 for the last.
    pub travel_time_to_next: f64,
}

impl RouteWaypoint {
    pub fn new(coordinate: Coordinate, name: String, order: u32) -> Self {
        RouteWaypoint {
            id: Uuid::new_v4(),
            coordinate,
            name,
            order,
            distance_to_next: 0.0,
            travel_time_to_next: 0.0,
        }
    }
}

/// A persisted named route. Owns its waypoints exclusively: deleting the
/// route deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedRoute {
    pub id: Uuid,
    pub name: String,
    /// Sum of the waypoints' `distance_to_next`, meters.
    pub total_distance: f64,
    /// Sum of the waypoints' `travel_time_to_next`, seconds.
    pub estimated_duration: f64,
    pub transport_mode: TransportMode,
    pub waypoints: Vec<RouteWaypoint>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified: OffsetDateTime,
    /// True once the sequence came out of the optimizer rather than hand
    /// ordering.
    pub is_optimized: bool,
}

impl SavedRoute {
    pub fn from_waypoints(
        name: String,
        transport_mode: TransportMode,
        waypoints: Vec<RouteWaypoint>,
        is_optimized: bool,
    ) -> Self {
        let total_distance = waypoints.iter().map(|w| w.distance_to_next).sum();
        let estimated_duration = waypoints.iter().map(|w| w.travel_time_to_next).sum();
        let now = OffsetDateTime::now_utc();

        SavedRoute {
            id: Uuid::new_v4(),
            name,
            total_distance,
            estimated_duration,
            transport_mode,
            waypoints,
            created_at: now,
            last_modified: now,
            is_optimized,
        }
    }

    /// Waypoints sorted by `order`: the exact sequence the segments were
    /// computed for.
    pub fn waypoints_in_order(&self) -> Vec<RouteWaypoint> {
        let mut waypoints = self.waypoints.clone();
        waypoints.sort_by_key(|w| w.order);
        waypoints
    }

    /// Aggregates must equal the sums over the order-sorted waypoints; a
    /// mismatch means a stale aggregate and is a defect.
    pub fn totals_consistent(&self) -> bool {
        let ordered = self.waypoints_in_order();
        let distance: f64 = ordered.iter().map(|w| w.distance_to_next).sum();
        let duration: f64 = ordered.iter().map(|w| w.travel_time_to_next).sum();
        (distance - self.total_distance).abs() < 1e-6
            && (duration - self.estimated_duration).abs() < 1e-6
    }
}

// Request/Response types for API endpoints

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub waypoints: Vec<Coordinate>,
    #[serde(default)]
    pub mode: TransportMode,
}

impl OptimizeRequest {
    pub fn validate(&self) -> Result<(), String> {
        for (i, c) in self.waypoints.iter().enumerate() {
            if !(-90.0..=90.0).contains(&c.lat) {
                return Err(format!("waypoint {}: lat must be between -90 and 90", i));
            }
            if !(-180.0..=180.0).contains(&c.lng) {
                return Err(format!("waypoint {}: lng must be between -180 and 180", i));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveRouteRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mode: TransportMode,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub from: Coordinate,
    pub to: Coordinate,
    #[serde(default)]
    pub mode: TransportMode,
}

impl PreviewRequest {
    pub fn validate(&self) -> Result<(), String> {
        for (label, c) in [("from", &self.from), ("to", &self.to)] {
            if !(-90.0..=90.0).contains(&c.lat) {
                return Err(format!("{}: lat must be between -90 and 90", label));
            }
            if !(-180.0..=180.0).contains(&c.lng) {
                return Err(format!("{}: lng must be between -180 and 180", label));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub waypoints: Vec<RouteWaypoint>,
    pub total_distance: f64,
    pub estimated_duration: f64,
}

#[derive(Debug, Serialize)]
pub struct RouteListResponse {
    pub routes: Vec<SavedRoute>,
    pub count: usize,
}
