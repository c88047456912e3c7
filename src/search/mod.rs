mod mapbox;

pub use mapbox::MapboxSearchClient;

use crate::error::Result;
use crate::models::{Coordinate, PointOfInterest};
use async_trait::async_trait;
use std::sync::Arc;

/// Free-text POI lookup against a mapping-data provider.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    async fn search(
        &self,
        query: &str,
        near: Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<PointOfInterest>>;

    /// Category lookup funnels through the same text-search contract.
    async fn search_by_category(
        &self,
        category: &str,
        near: Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<PointOfInterest>> {
        self.search(category, near, radius_meters).await
    }
}

/// Search service wrapping a [`SearchGateway`]. Provider failures degrade to
/// an empty result list; callers cannot tell "no results" and "provider
/// down" apart at this boundary.
pub struct PoiSearch {
    gateway: Arc<dyn SearchGateway>,
}

impl PoiSearch {
    pub fn new(gateway: Arc<dyn SearchGateway>) -> Self {
        PoiSearch { gateway }
    }

    pub async fn search(
        &self,
        query: &str,
        near: Coordinate,
        radius_meters: f64,
    ) -> Vec<PointOfInterest> {
        match self.gateway.search(query, near, radius_meters).await {
            Ok(pois) => {
                tracing::debug!(query, count = pois.len(), "search returned results");
                pois
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "search failed, returning empty results");
                Vec::new()
            }
        }
    }

    pub async fn search_by_category(
        &self,
        category: &str,
        near: Coordinate,
        radius_meters: f64,
    ) -> Vec<PointOfInterest> {
        match self
            .gateway
            .search_by_category(category, near, radius_meters)
            .await
        {
            Ok(pois) => pois,
            Err(e) => {
                tracing::warn!(category, error = %e, "category search failed, returning empty results");
                Vec::new()
            }
        }
    }
}
