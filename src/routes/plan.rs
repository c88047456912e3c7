use crate::directions::Segment;
use crate::error::{AppError, Result};
use crate::models::route::{
    OptimizeRequest, OptimizeResponse, PreviewRequest, RouteListResponse, SaveRouteRequest,
};
use crate::models::{PointOfInterest, RouteWaypoint, SavedRoute};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// POST /routes/optimize - order the selected stops and resolve each leg.
/// With fewer than 2 waypoints nothing happens and the current working list
/// comes back unchanged.
pub async fn optimize_route(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>> {
    req.validate().map_err(AppError::InvalidRequest)?;

    let mut planner = state.planner.lock().await;
    let waypoints = planner.optimize(&req.waypoints, req.mode).await?.to_vec();
    let (total_distance, estimated_duration) = planner.summary();

    Ok(Json(OptimizeResponse {
        waypoints,
        total_distance,
        estimated_duration,
    }))
}

/// POST /routes/preview - resolve a single origin/destination pair
pub async fn preview_route(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<Segment>> {
    req.validate().map_err(AppError::InvalidRequest)?;

    let mut planner = state.planner.lock().await;
    let segment = planner.resolve_route(req.from, req.to, req.mode).await?;
    Ok(Json(segment))
}

/// POST /routes - persist the working list as a named route
pub async fn save_route(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveRouteRequest>,
) -> Result<(StatusCode, Json<SavedRoute>)> {
    let mut planner = state.planner.lock().await;
    let route = planner.save(&req.name, req.mode).await?;
    Ok((StatusCode::CREATED, Json(route)))
}

/// GET /routes - cached saved routes, most recently modified first
pub async fn list_routes(State(state): State<Arc<AppState>>) -> Result<Json<RouteListResponse>> {
    let planner = state.planner.lock().await;
    let routes = planner.saved_routes().to_vec();
    let count = routes.len();
    Ok(Json(RouteListResponse { routes, count }))
}

#[derive(Debug, Serialize)]
pub struct LoadRouteResponse {
    pub waypoints: Vec<RouteWaypoint>,
    /// The waypoints as selectable POIs, so the loaded route can be edited
    /// like a fresh selection.
    pub pois: Vec<PointOfInterest>,
}

/// POST /routes/{id}/load - make a saved route the working list
pub async fn load_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<LoadRouteResponse>> {
    let mut planner = state.planner.lock().await;

    let route = planner
        .saved_routes()
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("route {} not found", id)))?;

    let waypoints = planner.load(&route).to_vec();
    let pois = waypoints.iter().map(PointOfInterest::from_waypoint).collect();
    Ok(Json(LoadRouteResponse { waypoints, pois }))
}

/// DELETE /routes/{id} - remove a saved route and its waypoints
pub async fn delete_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let mut planner = state.planner.lock().await;
    planner.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
