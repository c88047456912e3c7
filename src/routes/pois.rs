use crate::error::{AppError, Result};
use crate::models::{Coordinate, PointOfInterest};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters for POI search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Free-text query; mutually exclusive with `category`.
    pub q: Option<String>,
    /// Category tag, routed through the same text search.
    pub category: Option<String>,
    /// Center latitude; both lat and lng must be given, or neither (the
    /// configured location provider is used then).
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Search radius in meters.
    pub radius_m: Option<f64>,
}

/// Response for POI searches
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub pois: Vec<PointOfInterest>,
    pub count: usize,
}

/// GET /pois/search - find POIs near a location
pub async fn search_pois(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let near = match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => {
            Coordinate::new(lat, lng).map_err(AppError::InvalidRequest)?
        }
        (None, None) => state.location.current().await.ok_or_else(|| {
            AppError::Precondition("no current location available".to_string())
        })?,
        _ => {
            return Err(AppError::InvalidRequest(
                "lat and lng must be provided together".to_string(),
            ))
        }
    };

    let radius_m = params.radius_m.unwrap_or(state.default_search_radius_m);
    if !(1.0..=100_000.0).contains(&radius_m) {
        return Err(AppError::InvalidRequest(
            "radius_m must be between 1 and 100000".to_string(),
        ));
    }

    let pois = match (params.q.as_deref(), params.category.as_deref()) {
        (Some(q), None) => state.search.search(q, near, radius_m).await,
        (None, Some(category)) => state.search.search_by_category(category, near, radius_m).await,
        _ => {
            return Err(AppError::InvalidRequest(
                "exactly one of q or category is required".to_string(),
            ))
        }
    };

    tracing::info!(count = pois.len(), "POI search returned {} results", pois.len());

    let count = pois.len();
    Ok(Json(SearchResponse { pois, count }))
}

/// Body for saving a POI
#[derive(Debug, Deserialize)]
pub struct SavePoiRequest {
    pub name: String,
    pub category: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
}

/// POST /pois - persist a point of interest
pub async fn save_poi(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SavePoiRequest>,
) -> Result<(StatusCode, Json<PointOfInterest>)> {
    if req.name.trim().is_empty() {
        return Err(AppError::InvalidRequest("name must not be empty".to_string()));
    }

    let coordinate = Coordinate::new(req.lat, req.lng).map_err(AppError::InvalidRequest)?;

    let mut poi = PointOfInterest::new(req.name, req.category, coordinate, req.address);
    poi.description = req.description;

    state.poi_store.insert(&poi).await?;
    Ok((StatusCode::CREATED, Json(poi)))
}

/// GET /pois - list persisted points of interest, newest first
pub async fn list_pois(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SearchResponse>> {
    let pois = state.poi_store.list().await?;
    let count = pois.len();
    Ok(Json(SearchResponse { pois, count }))
}
