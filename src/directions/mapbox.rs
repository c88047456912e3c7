use crate::directions::{DirectionsApi, Segment};
use crate::error::{AppError, Result};
use crate::models::{Coordinate, TransportMode};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const MAPBOX_DIRECTIONS_BASE_URL: &str = "https://api.mapbox.com/directions/v5/mapbox";

#[derive(Clone)]
pub struct MapboxDirections {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MapboxDirections {
    pub fn new(api_key: String) -> Self {
        MapboxDirections {
            client: Client::new(),
            api_key,
            base_url: MAPBOX_DIRECTIONS_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        MapboxDirections {
            client: Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl DirectionsApi for MapboxDirections {
    /// Resolve a single origin/destination pair into a segment.
    async fn resolve(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TransportMode,
    ) -> Result<Segment> {
        // Coordinates go into the path as "lng,lat;lng,lat"
        let url = format!(
            "{}/{}/{},{};{},{}",
            self.base_url,
            mode.profile(),
            origin.lng,
            origin.lat,
            destination.lng,
            destination.lat
        );

        tracing::debug!(
            profile = %mode.profile(),
            "Directions request: {:?} -> {:?}",
            origin,
            destination
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("geometries", "geojson"),
                ("overview", "full"),
                ("steps", "false"),
                ("access_token", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Directions(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                "Directions API HTTP error {}: {}",
                status, error_text
            );
            return Err(AppError::Directions(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let directions: DirectionsApiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Directions(format!("Failed to parse response: {}", e)))?;

        let Some(route) = directions.routes.first() else {
            tracing::warn!(
                profile = %mode.profile(),
                "Directions API returned 0 routes for {:?} -> {:?}",
                origin, destination
            );
            return Err(AppError::Directions("No route found".to_string()));
        };

        tracing::debug!(
            distance_km = %format!("{:.2}", route.distance / 1000.0),
            duration_min = %format!("{:.0}", route.duration / 60.0),
            path_points = route.geometry.coordinates.len(),
            "Directions response: {:.2}km, {:.0}min",
            route.distance / 1000.0, route.duration / 60.0
        );

        Ok(Segment {
            distance_meters: route.distance,
            duration_seconds: route.duration,
            path: route
                .geometry
                .coordinates
                .iter()
                .filter_map(|c| Coordinate::new(c[1], c[0]).ok())
                .collect(),
        })
    }
}

// Mapbox API response types

#[derive(Debug, Deserialize)]
struct DirectionsApiResponse {
    routes: Vec<ApiRoute>,
}

#[derive(Debug, Deserialize)]
struct ApiRoute {
    distance: f64, // meters
    duration: f64, // seconds
    geometry: ApiGeometry,
}

#[derive(Debug, Deserialize)]
struct ApiGeometry {
    coordinates: Vec<[f64; 2]>, // [lng, lat] pairs
}
