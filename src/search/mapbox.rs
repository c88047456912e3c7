use crate::constants::SEARCH_RESULT_LIMIT;
use crate::error::{AppError, Result};
use crate::models::{BoundingBox, Coordinate, PointOfInterest};
use crate::search::SearchGateway;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const MAPBOX_GEOCODING_BASE_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

#[derive(Clone)]
pub struct MapboxSearchClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MapboxSearchClient {
    pub fn new(api_key: String) -> Self {
        MapboxSearchClient {
            client: Client::new(),
            api_key,
            base_url: MAPBOX_GEOCODING_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        MapboxSearchClient {
            client: Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl SearchGateway for MapboxSearchClient {
    async fn search(
        &self,
        query: &str,
        near: Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<PointOfInterest>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        // The query is a path segment in the geocoding API
        let url = format!("{}/{}.json", self.base_url, urlencoding::encode(query));
        let bbox = BoundingBox::from_center_radius(&near, radius_meters);

        tracing::debug!(
            query,
            radius_m = radius_meters,
            "Search request near {:?}",
            near
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("proximity", format!("{},{}", near.lng, near.lat)),
                (
                    "bbox",
                    format!(
                        "{},{},{},{}",
                        bbox.min_lng, bbox.min_lat, bbox.max_lng, bbox.max_lat
                    ),
                ),
                ("types", "poi".to_string()),
                ("limit", SEARCH_RESULT_LIMIT.to_string()),
                ("access_token", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Search(format!("HTTP {}: {}", status, error_text)));
        }

        let payload: GeocodingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse response: {}", e)))?;

        Ok(payload
            .features
            .into_iter()
            .filter_map(feature_to_poi)
            .collect())
    }
}

// Mapbox geocoding response types

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    features: Vec<GeocodingFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodingFeature {
    /// Place name without context, e.g. "Louvre Museum".
    text: String,
    center: [f64; 2], // [lng, lat]
    #[serde(default)]
    properties: FeatureProperties,
    #[serde(default)]
    context: Vec<ContextEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct FeatureProperties {
    /// Comma-separated category tags, e.g. "cafe, coffee".
    #[serde(default)]
    category: Option<String>,
    /// Street-level address when the provider has one.
    #[serde(default)]
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContextEntry {
    #[serde(default)]
    text: String,
}

fn feature_to_poi(feature: GeocodingFeature) -> Option<PointOfInterest> {
    // Features with out-of-range coordinates are dropped rather than failing
    // the whole page.
    let coordinate = Coordinate::new(feature.center[1], feature.center[0]).ok()?;

    let category = feature
        .properties
        .category
        .as_deref()
        .and_then(|c| c.split(',').next())
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    let address = format_address(&feature);

    Some(PointOfInterest::new(
        feature.text,
        category,
        coordinate,
        address,
    ))
}

/// Join the non-empty address components the provider supplied.
fn format_address(feature: &GeocodingFeature) -> String {
    let mut components: Vec<&str> = Vec::new();

    if let Some(address) = feature.properties.address.as_deref() {
        if !address.is_empty() {
            components.push(address);
        }
    }

    for entry in &feature.context {
        if !entry.text.is_empty() {
            components.push(&entry.text);
        }
    }

    components.join(", ")
}
